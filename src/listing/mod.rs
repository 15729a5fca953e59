//! # List Query Building
//!
//! Generic list endpoint machinery: query-string parsing into an immutable
//! filter spec, and the builder that runs the resulting query and produces
//! the paginated result envelope.

pub mod builder;
pub mod params;

pub use builder::{run, ListEnvelope, Page, Pagination};
pub use params::{ListParams, DEFAULT_LIMIT, DEFAULT_PAGE, RESERVED_KEYS};
