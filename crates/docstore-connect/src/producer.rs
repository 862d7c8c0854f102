//! Producer for docstore endpoints.

use async_trait::async_trait;
use tracing;

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::message::Message;
use crate::traits::Producer;

/// Sends an outgoing message to the data service and writes the raw reply
/// back into the message body.
pub struct DataProducer {
    name: String,
    dispatcher: Dispatcher,
}

impl DataProducer {
    pub fn new(name: &str, dispatcher: Dispatcher) -> Self {
        Self {
            name: name.to_string(),
            dispatcher,
        }
    }
}

#[async_trait]
impl Producer for DataProducer {
    async fn process(&self, message: &mut Message) -> Result<()> {
        let response = self.dispatcher.dispatch(Some(message)).await?;
        let body = serde_json::to_vec(response.raw())?;
        message.set_body(body);

        tracing::debug!(
            producer = %self.name,
            entity = %self.dispatcher.config().entity_name(),
            "wrote data service reply to message"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
