//! The `DataClient` trait and its HTTP implementation.
//!
//! `DataClient` is the single seam between the adapter and the data
//! service: one `execute` call per dispatch, no retries, no error
//! wrapping. `HttpDataClient` speaks the service's REST layout, where
//! the operation and entity address the URL path and the JSON body
//! carries the document set or query.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::request::DataRequest;
use crate::response::DataResponse;

/// A client for a document data service.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Execute one request and return the service's reply verbatim.
    async fn execute(&self, request: &DataRequest) -> Result<DataResponse>;
}

/// HTTP implementation of [`DataClient`].
///
/// Requests are POSTed to `{base}/data/{operation}/{entityName}` or, when
/// the entity is version-pinned, `{base}/data/{operation}/{entityName}/{version}`.
pub struct HttpDataClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpDataClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            ClientError::Connection(format!("failed to build HTTP client: {}", e))
        })?;
        Ok(Self::with_http(base_url, http))
    }

    /// Create with an injected `reqwest` client (useful for testing and
    /// for sharing a connection pool).
    pub fn with_http(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// The configured service base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The URL a request resolves to.
    fn request_url(&self, request: &DataRequest) -> String {
        let entity = request.entity();
        match &entity.version {
            Some(version) => format!(
                "{}/data/{}/{}/{}",
                self.base_url,
                request.operation(),
                entity.name,
                version
            ),
            None => format!(
                "{}/data/{}/{}",
                self.base_url,
                request.operation(),
                entity.name
            ),
        }
    }
}

#[async_trait]
impl DataClient for HttpDataClient {
    async fn execute(&self, request: &DataRequest) -> Result<DataResponse> {
        let url = self.request_url(request);

        let response = self
            .http
            .post(&url)
            .json(request.body())
            .send()
            .await
            .map_err(|e| ClientError::Connection(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = response.json().await.map_err(|e| {
            ClientError::Serialization(format!("invalid JSON in service reply: {}", e))
        })?;

        Ok(DataResponse::new(raw))
    }
}
