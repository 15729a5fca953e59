//! # Document Store
//!
//! The queryable-collection capability consumed by the rest of the server.
//! Collections hold JSON documents; queries are built as values and executed
//! once. `MemoryStore` is the single-node implementation.

pub mod document;
pub mod errors;
pub mod filter;
pub mod memory;
pub mod query;

pub use document::{CREATED_AT_FIELD, ID_FIELD};
pub use errors::{StoreError, StoreResult};
pub use filter::{compare_json_values, FilterCondition, FilterOperator, FilterSpec};
pub use memory::MemoryStore;
pub use query::{Populate, Query, SortKey};

use serde_json::Value;

/// Collection operations every store implementation provides
pub trait CollectionStore: Send + Sync {
    /// Insert a document, stamping `id` and `created_at`; returns the stored
    /// document
    fn insert(&self, collection: &str, doc: Value) -> StoreResult<Value>;

    /// Fetch a single document by id
    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Merge `changes` into the document with the given id; returns the
    /// updated document, or None if it does not exist
    fn update(&self, collection: &str, id: &str, changes: &Value) -> StoreResult<Option<Value>>;

    /// Delete a document by id; returns whether anything was removed
    fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Delete every document matching the filter; returns how many
    fn delete_where(&self, collection: &str, filter: &FilterSpec) -> StoreResult<usize>;

    /// Count documents matching the filter
    fn count(&self, collection: &str, filter: &FilterSpec) -> StoreResult<usize>;

    /// Execute a configured query
    fn execute(&self, query: &Query) -> StoreResult<Vec<Value>>;

    /// Drop a whole collection; returns how many documents it held
    fn clear(&self, collection: &str) -> StoreResult<usize>;

    /// Begin a query restricted by the given filter
    fn find(&self, collection: &str, filter: FilterSpec) -> Query {
        Query::new(collection, filter)
    }
}
