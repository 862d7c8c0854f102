//! Docstore Connect - routing adapter for document data services
//!
//! Lets a message-routing application send and receive data-access
//! requests (insert, find, update, save, delete) against a document data
//! service, addressed through a URI-style endpoint descriptor.
//!
//! ## Architecture
//!
//! - **Endpoint**: parses `docstore://host?...` addresses and creates the
//!   producer or consumer for a route.
//! - **Registry**: hostname → configured [`docstore_client::DataClient`],
//!   populated at startup and injected into endpoints.
//! - **Dispatch**: one shared path that builds the typed request and
//!   invokes the client, used by the producer and both consumers.
//! - **Producer**: sends an outgoing message as a request, writes the
//!   reply back onto the message.
//! - **Consumers**: a single-shot consumer that executes once on route
//!   startup, and a polling consumer that issues a find per timer tick
//!   and emits one message per matched record.
//! - **Runtime**: drives consumers on a timer as background tasks.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docstore_connect::{ClientRegistry, Endpoint, RouteRuntime};
//! use docstore_client::HttpDataClient;
//!
//! let registry = Arc::new(ClientRegistry::new());
//! registry.register("docstore-prod", Arc::new(HttpDataClient::new("https://docstore.prod")?));
//!
//! let endpoint = Endpoint::from_uri(
//!     "docstore://docstore-prod?operation=find&entityName=Country\
//!      &entityVersion=1.0.0&request=%7B%22query%22%3A%7B%7D%7D&pollMode=true",
//!     registry,
//! )?;
//!
//! let mut runtime = RouteRuntime::new();
//! runtime
//!     .start_route(
//!         "countries",
//!         endpoint.create_consumer(),
//!         endpoint.config().poll_interval(),
//!         Box::new(|message| Box::pin(async move {
//!             println!("record: {:?}", message.body);
//!             Ok(())
//!         })),
//!     )
//!     .await?;
//! ```

pub mod consumers;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod producer;
pub mod registry;
pub mod runtime;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use consumers::{PollingConsumer, SingleShotConsumer};
pub use dispatch::Dispatcher;
pub use endpoint::{build_uri_query, Endpoint, EndpointConfig, DEFAULT_POLL_INTERVAL_MS, URI_SCHEME};
pub use error::{ConnectorError, Result};
pub use message::{Message, HEADER_ENTITY_NAME, HEADER_ENTITY_VERSION};
pub use producer::DataProducer;
pub use registry::ClientRegistry;
pub use runtime::{MessageHandlerFn, RouteRuntime, RouteState};
pub use traits::{Consumer, Producer};
