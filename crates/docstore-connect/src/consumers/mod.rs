//! Consumer implementations.
//!
//! A docstore route consumes in one of two modes: a single-shot request on
//! route startup, or a recurring find poll that emits one message per
//! matched record.

pub mod polling;
pub mod single_shot;

pub use polling::PollingConsumer;
pub use single_shot::SingleShotConsumer;
