//! Polling consumer: a recurring find request, one message per record.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing;

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::message::Message;
use crate::traits::Consumer;

/// Performs the endpoint's find request on every tick and splits the
/// result set into one message per record.
///
/// At most one poll is in flight: if a tick fires while the previous poll
/// is still outstanding, the tick performs no remote call and returns no
/// messages. A failed tick clears the flag too, so the next scheduled tick
/// proceeds normally.
pub struct PollingConsumer {
    name: String,
    dispatcher: Dispatcher,
    in_flight: AtomicBool,
}

impl PollingConsumer {
    pub fn new(name: &str, dispatcher: Dispatcher) -> Self {
        Self {
            name: name.to_string(),
            dispatcher,
            in_flight: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Consumer for PollingConsumer {
    async fn start(&self) -> Result<()> {
        tracing::info!(
            consumer = %self.name,
            entity = %self.dispatcher.config().entity_name(),
            interval_ms = self.dispatcher.config().poll_interval_ms(),
            "polling consumer started"
        );
        Ok(())
    }

    async fn poll(&self) -> Result<Vec<Message>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(consumer = %self.name, "previous poll still in flight, skipping tick");
            return Ok(Vec::new());
        }

        let result = self.dispatcher.dispatch(None).await;
        self.in_flight.store(false, Ordering::SeqCst);

        let response = result?;
        let records = response.records();
        let mut messages = Vec::with_capacity(records.len());
        for record in records {
            messages.push(Message::new(serde_json::to_vec(&record)?));
        }

        tracing::debug!(
            consumer = %self.name,
            records = messages.len(),
            "poll tick completed"
        );
        Ok(messages)
    }

    async fn stop(&self) -> Result<()> {
        tracing::info!(consumer = %self.name, "polling consumer stopped");
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
