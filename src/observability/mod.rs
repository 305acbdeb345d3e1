//! Observability module
//!
//! Logging and the structured event stream for conformance runs.

pub mod events;
pub mod logging;

pub use events::{Event, EventEmitter};
pub use logging::{ColorChoice, LogFormat, init_logging};
