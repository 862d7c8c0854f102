//! Producer and consumer traits of the routing framework's capability set.
//!
//! A producer translates an outgoing message into a data-service request
//! and writes the reply back onto the message. A consumer is driven by the
//! route runtime's timer and returns the messages each tick produced.
//!
//! Consumers take `&self`: the framework may drive a shared consumer from
//! its scheduling tasks, so per-consumer state (the single-shot guard, the
//! polling in-flight flag) is atomic interior state.

use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;

/// Trait implemented by message producers.
#[async_trait]
pub trait Producer: Send + Sync {
    /// Process one outgoing message: perform the remote call and write the
    /// reply into the message body.
    async fn process(&self, message: &mut Message) -> Result<()>;

    /// Return the unique name of this producer instance.
    fn name(&self) -> &str;
}

/// Trait implemented by message consumers.
#[async_trait]
pub trait Consumer: Send + Sync {
    /// Called once when the route starts.
    async fn start(&self) -> Result<()>;

    /// Perform one tick of work, returning zero or more messages to route.
    async fn poll(&self) -> Result<Vec<Message>>;

    /// Called once when the route stops.
    async fn stop(&self) -> Result<()>;

    /// Whether this consumer has finished all the work it will ever do.
    /// The route runtime stops the route once this returns true.
    fn is_complete(&self) -> bool {
        false
    }

    /// Return the unique name of this consumer instance.
    fn name(&self) -> &str;
}
