//! Endpoint descriptor: URI parsing, validation, and producer/consumer
//! creation.
//!
//! ## Address syntax
//!
//! `docstore://<host>?operation=<op>&entityName=<name>&entityVersion=<ver>&request=<body>[&pollMode=<bool>][&pollIntervalMs=<u64>]`
//!
//! | Parameter        | Description                                      | Default  |
//! |------------------|--------------------------------------------------|----------|
//! | `operation`      | One of `insert`, `find`, `update`, `save`, `delete` | required |
//! | `entityName`     | Name of the target entity                        | required |
//! | `entityVersion`  | Version of the target entity                     | required |
//! | `request`        | JSON request body (query or document set)        | required |
//! | `pollMode`       | Poll on a timer instead of a single execution    | `false`  |
//! | `pollIntervalMs` | Poll timer interval in milliseconds              | `500`    |
//!
//! The `<host>` part selects the registered data client. `pollMode=true`
//! requires `operation=find`, since the polling consumer issues find-style
//! requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use docstore_client::{DataRequest, Operation};

use crate::consumers::{PollingConsumer, SingleShotConsumer};
use crate::dispatch::Dispatcher;
use crate::error::{ConnectorError, Result};
use crate::producer::DataProducer;
use crate::registry::ClientRegistry;
use crate::traits::Consumer;

/// URI scheme of docstore endpoints.
pub const URI_SCHEME: &str = "docstore";

/// Default poll timer interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Parsed endpoint configuration.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    host: String,
    operation: Operation,
    entity_name: String,
    entity_version: String,
    request_body: String,
    poll_mode: bool,
    poll_interval_ms: u64,
}

impl EndpointConfig {
    /// Parse an endpoint URI.
    pub fn parse_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(&format!("{}://", URI_SCHEME))
            .ok_or_else(|| {
                ConnectorError::ConfigError(format!(
                    "invalid endpoint URI '{}': expected scheme '{}://'",
                    uri, URI_SCHEME
                ))
            })?;

        let (host, query) = match rest.split_once('?') {
            Some((host, query)) => (host, query),
            None => (rest, ""),
        };

        if host.trim().is_empty() {
            return Err(ConnectorError::ConfigError(
                "endpoint URI is missing a host".to_string(),
            ));
        }

        let params = parse_query(query)?;
        Self::from_params(host, &params)
    }

    /// Build a config from a host and a parameter map.
    pub fn from_params(host: &str, params: &HashMap<String, String>) -> Result<Self> {
        let operation = required(params, "operation")?
            .parse::<Operation>()
            .map_err(|e| ConnectorError::ConfigError(e.to_string()))?;

        let entity_name = required(params, "entityName")?;
        let entity_version = required(params, "entityVersion")?;
        let request_body = required(params, "request")?;

        let poll_mode = params
            .get("pollMode")
            .map(|s| {
                s.parse::<bool>().map_err(|_| {
                    ConnectorError::ConfigError(format!(
                        "invalid pollMode '{}': expected 'true' or 'false'",
                        s
                    ))
                })
            })
            .transpose()?
            .unwrap_or(false);

        let poll_interval_ms = params
            .get("pollIntervalMs")
            .map(|s| {
                s.parse::<u64>().map_err(|e| {
                    ConnectorError::ConfigError(format!("invalid pollIntervalMs: {}", e))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        let config = Self {
            host: host.to_string(),
            operation,
            entity_name,
            entity_version,
            request_body,
            poll_mode,
            poll_interval_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the route-build invariants: required fields non-empty and
    /// poll mode only combined with the find operation.
    pub fn validate(&self) -> Result<()> {
        if self.entity_name.trim().is_empty() {
            return Err(ConnectorError::ConfigError(
                "'entityName' must not be empty".to_string(),
            ));
        }
        if self.entity_version.trim().is_empty() {
            return Err(ConnectorError::ConfigError(
                "'entityVersion' must not be empty".to_string(),
            ));
        }
        if self.request_body.trim().is_empty() {
            return Err(ConnectorError::ConfigError(
                "'request' must not be empty".to_string(),
            ));
        }
        if self.poll_mode && self.operation != Operation::Find {
            return Err(ConnectorError::ConfigError(format!(
                "pollMode requires operation=find, got operation={}",
                self.operation
            )));
        }
        Ok(())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn set_operation(&mut self, operation: Operation) {
        self.operation = operation;
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn set_entity_name(&mut self, entity_name: &str) {
        self.entity_name = entity_name.to_string();
    }

    pub fn entity_version(&self) -> &str {
        &self.entity_version
    }

    pub fn set_entity_version(&mut self, entity_version: &str) {
        self.entity_version = entity_version.to_string();
    }

    pub fn request_body(&self) -> &str {
        &self.request_body
    }

    pub fn set_request_body(&mut self, request_body: &str) {
        self.request_body = request_body.to_string();
    }

    pub fn poll_mode(&self) -> bool {
        self.poll_mode
    }

    pub fn set_poll_mode(&mut self, poll_mode: bool) {
        self.poll_mode = poll_mode;
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    pub fn set_poll_interval_ms(&mut self, poll_interval_ms: u64) {
        self.poll_interval_ms = poll_interval_ms;
    }

    /// The poll timer interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Rebuild the query-string form of an endpoint address from a request.
///
/// The version parameter is skipped when the request carries no version,
/// and `pollMode` is skipped when false. The request body is
/// percent-encoded so the result parses back with [`EndpointConfig::parse_uri`].
pub fn build_uri_query(request: &DataRequest, poll_mode: bool) -> String {
    let mut query = format!(
        "?operation={}&entityName={}",
        request.operation(),
        urlencoding::encode(&request.entity().name)
    );
    if let Some(version) = &request.entity().version {
        query.push_str("&entityVersion=");
        query.push_str(&urlencoding::encode(version));
    }
    if poll_mode {
        query.push_str("&pollMode=true");
    }
    query.push_str("&request=");
    query.push_str(&urlencoding::encode(&request.body().to_string()));
    query
}

/// An endpoint couples a parsed configuration with the client registry it
/// resolves against, and creates the producer or consumer for a route.
pub struct Endpoint {
    config: EndpointConfig,
    registry: Arc<ClientRegistry>,
}

impl Endpoint {
    /// Create an endpoint from an already-parsed config.
    pub fn new(config: EndpointConfig, registry: Arc<ClientRegistry>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, registry })
    }

    /// Create an endpoint by parsing `uri`.
    pub fn from_uri(uri: &str, registry: Arc<ClientRegistry>) -> Result<Self> {
        let config = EndpointConfig::parse_uri(uri)?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Create the producer for this endpoint.
    pub fn create_producer(&self) -> DataProducer {
        let name = format!("docstore-producer-{}", self.config.entity_name);
        DataProducer::new(&name, self.dispatcher())
    }

    /// Create the consumer for this endpoint: polling when `pollMode` is
    /// enabled, single-shot otherwise.
    pub fn create_consumer(&self) -> Arc<dyn Consumer> {
        if self.config.poll_mode {
            let name = format!("docstore-poller-{}", self.config.entity_name);
            Arc::new(PollingConsumer::new(&name, self.dispatcher()))
        } else {
            let name = format!("docstore-consumer-{}", self.config.entity_name);
            Arc::new(SingleShotConsumer::new(&name, self.dispatcher()))
        }
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.config.clone(), Arc::clone(&self.registry))
    }
}

/// Split a query string into decoded key-value pairs.
fn parse_query(query: &str) -> Result<HashMap<String, String>> {
    let mut params = HashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            ConnectorError::ConfigError(format!("malformed query parameter '{}'", pair))
        })?;
        params.insert(percent_decode(key)?, percent_decode(value)?);
    }
    Ok(params)
}

/// Decode a percent-encoded query component, treating `+` as space.
fn percent_decode(input: &str) -> Result<String> {
    let spaced = input.replace('+', "%20");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ConnectorError::ConfigError(format!("query parameter is not UTF-8: {}", e)))
}

/// Fetch a required, non-empty parameter.
fn required(params: &HashMap<String, String>, key: &str) -> Result<String> {
    let value = params
        .get(key)
        .ok_or_else(|| ConnectorError::ConfigError(format!("missing required '{}'", key)))?;
    if value.trim().is_empty() {
        return Err(ConnectorError::ConfigError(format!(
            "'{}' must not be empty",
            key
        )));
    }
    Ok(value.clone())
}
