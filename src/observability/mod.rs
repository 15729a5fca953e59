//! # Observability
//!
//! Structured logging for server lifecycle and request events.

pub mod logger;

pub use logger::{Logger, Severity};
