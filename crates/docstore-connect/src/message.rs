//! The routing framework's message envelope as this adapter sees it.

use std::collections::HashMap;

use bytes::Bytes;

/// Header the adapter reads for a per-message entity name override.
pub const HEADER_ENTITY_NAME: &str = "entityName";

/// Header the adapter reads for a per-message entity version override.
pub const HEADER_ENTITY_VERSION: &str = "entityVersion";

/// A routed message: string headers plus an opaque byte payload.
///
/// An empty body means the message carries no payload, and dispatch falls
/// back to the endpoint's configured request body.
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// String-valued headers.
    pub headers: HashMap<String, String>,
    /// Message payload.
    pub body: Bytes,
}

impl Message {
    /// Create a message with the given body and no headers.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create a message with no payload.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style header insertion.
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// Look up a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|s| s.as_str())
    }

    /// Replace the message body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Whether the message carries no payload.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
