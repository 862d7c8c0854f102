//! Registry mapping hostnames to configured data clients.
//!
//! Deployment-time setup code registers one client per data-service host
//! before any route starts; endpoints resolve their client from the
//! registry at dispatch time. The registry is an explicitly injected
//! dependency (shared via `Arc`), not process-global state.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use docstore_client::DataClient;

/// Hostname → client registry.
///
/// Writes are expected only during startup, before concurrent route
/// execution begins; reads may come from any route task afterwards.
pub struct ClientRegistry {
    clients: RwLock<HashMap<String, Arc<dyn DataClient>>>,
}

impl ClientRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Register `client` for `hostname`, overwriting any previous entry.
    pub fn register(&self, hostname: &str, client: Arc<dyn DataClient>) {
        let mut clients = self
            .clients
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        clients.insert(hostname.to_string(), client);
    }

    /// Look up the client registered for `hostname`.
    pub fn get(&self, hostname: &str) -> Option<Arc<dyn DataClient>> {
        let clients = self
            .clients
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        clients.get(hostname).cloned()
    }

    /// Whether a client is registered for `hostname`.
    pub fn contains(&self, hostname: &str) -> bool {
        self.get(hostname).is_some()
    }

    /// The registered hostnames.
    pub fn hostnames(&self) -> Vec<String> {
        let clients = self
            .clients
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        clients.keys().cloned().collect()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
