//! Single-shot consumer: one request on route startup, then done.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing;

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::message::Message;
use crate::traits::Consumer;

/// Performs exactly one dispatch over its lifetime and publishes the whole
/// reply as one message. After the first tick it reports complete, and the
/// route runtime stops the route.
pub struct SingleShotConsumer {
    name: String,
    dispatcher: Dispatcher,
    fired: AtomicBool,
}

impl SingleShotConsumer {
    pub fn new(name: &str, dispatcher: Dispatcher) -> Self {
        Self {
            name: name.to_string(),
            dispatcher,
            fired: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Consumer for SingleShotConsumer {
    async fn start(&self) -> Result<()> {
        tracing::info!(
            consumer = %self.name,
            entity = %self.dispatcher.config().entity_name(),
            operation = %self.dispatcher.config().operation(),
            "single-shot consumer started"
        );
        Ok(())
    }

    async fn poll(&self) -> Result<Vec<Message>> {
        // The swap claims the one-and-only execution; later ticks see true
        // and never reach the client, however long the route stays started.
        if self.fired.swap(true, Ordering::SeqCst) {
            return Ok(Vec::new());
        }

        let response = self.dispatcher.dispatch(None).await?;
        let body = serde_json::to_vec(response.raw())?;

        tracing::debug!(consumer = %self.name, "single-shot request executed");
        Ok(vec![Message::new(body)])
    }

    async fn stop(&self) -> Result<()> {
        tracing::info!(consumer = %self.name, "single-shot consumer stopped");
        Ok(())
    }

    fn is_complete(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
