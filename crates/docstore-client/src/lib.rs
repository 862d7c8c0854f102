//! Docstore Client - typed access to a document data service
//!
//! This crate provides the request/response model and transport for talking
//! to a document-oriented data service. Entities are named, versioned
//! schemas; requests are one of five operations (insert, find, update,
//! save, delete) carrying a JSON body.
//!
//! # Examples
//!
//! ```ignore
//! use docstore_client::{DataClient, DataRequest, EntityRef, HttpDataClient};
//!
//! let client = HttpDataClient::new("https://docstore.example.com")?;
//!
//! let request = DataRequest::find(
//!     EntityRef::new("Country", "1.0.0"),
//!     serde_json::json!({"query": {"field": "iso2Code", "op": "=", "rvalue": "CA"}}),
//! );
//!
//! let response = client.execute(&request).await?;
//! for record in response.records() {
//!     println!("matched: {}", record);
//! }
//! ```

pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::{DataClient, HttpDataClient};
pub use error::{ClientError, Result};
pub use request::{DataRequest, EntityRef, Operation, UnknownOperation};
pub use response::DataResponse;
