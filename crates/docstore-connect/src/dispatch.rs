//! The shared dispatch path used by the producer and both consumers.
//!
//! Dispatch resolves the client from the registry, builds the request for
//! the configured operation, and invokes the client once. Request building
//! honors per-message overrides: `entityName` / `entityVersion` headers and
//! a non-empty message body replace the endpoint's configured defaults.

use std::sync::Arc;

use docstore_client::{DataClient, DataRequest, DataResponse, EntityRef};

use crate::endpoint::EndpointConfig;
use crate::error::{ConnectorError, Result};
use crate::message::{Message, HEADER_ENTITY_NAME, HEADER_ENTITY_VERSION};
use crate::registry::ClientRegistry;

/// Builds requests for one endpoint and invokes its registered client.
#[derive(Clone)]
pub struct Dispatcher {
    config: EndpointConfig,
    registry: Arc<ClientRegistry>,
}

impl Dispatcher {
    pub fn new(config: EndpointConfig, registry: Arc<ClientRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Resolve the client registered for the endpoint's host.
    fn resolve_client(&self) -> Result<Arc<dyn DataClient>> {
        self.registry
            .get(self.config.host())
            .ok_or_else(|| ConnectorError::ClientNotRegistered(self.config.host().to_string()))
    }

    /// Build the request for this endpoint, applying message overrides when
    /// a message is given. An empty entity version (configured or overridden)
    /// yields a request without a version.
    pub fn build_request(&self, message: Option<&Message>) -> Result<DataRequest> {
        let entity_name = message
            .and_then(|m| m.header(HEADER_ENTITY_NAME))
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.config.entity_name());

        let entity_version = message
            .and_then(|m| m.header(HEADER_ENTITY_VERSION))
            .unwrap_or_else(|| self.config.entity_version());

        let body = match message {
            Some(m) if !m.is_empty() => serde_json::from_slice(&m.body).map_err(|e| {
                ConnectorError::SerializationError(format!("invalid message body JSON: {}", e))
            })?,
            _ => serde_json::from_str(self.config.request_body()).map_err(|e| {
                ConnectorError::SerializationError(format!(
                    "invalid configured request JSON: {}",
                    e
                ))
            })?,
        };

        Ok(DataRequest::new(
            self.config.operation(),
            EntityRef::new(entity_name, entity_version),
            body,
        ))
    }

    /// Perform one dispatch: resolve, build, execute. The client's error
    /// propagates unchanged; there is no retry.
    pub async fn dispatch(&self, message: Option<&Message>) -> Result<DataResponse> {
        let client = self.resolve_client()?;
        let request = self.build_request(message)?;
        let response = client.execute(&request).await?;
        Ok(response)
    }
}
