//! # Document Helpers
//!
//! Documents are plain JSON objects. The store stamps an `id` and a
//! `created_at` timestamp on insert; everything else is caller-defined.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};

/// Identifier field present on every stored document
pub const ID_FIELD: &str = "id";

/// Creation timestamp field stamped on insert (RFC 3339)
pub const CREATED_AT_FIELD: &str = "created_at";

/// Stamp a new document with an id and creation time, returning the id.
///
/// Existing `id`/`created_at` values are preserved (the seeder imports
/// fixture documents with fixed ids).
pub fn stamp_new(doc: &mut Value) -> StoreResult<String> {
    let obj = doc.as_object_mut().ok_or(StoreError::NotAnObject)?;

    let id = match obj.get(ID_FIELD).and_then(Value::as_str) {
        Some(existing) => existing.to_string(),
        None => {
            let id = Uuid::new_v4().to_string();
            obj.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    };

    if !obj.contains_key(CREATED_AT_FIELD) {
        obj.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
    }

    Ok(id)
}

/// Get a document's id, if present
pub fn doc_id(doc: &Value) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

/// Merge the fields of `changes` into `doc`.
///
/// `id` and `created_at` are immutable and silently skipped.
pub fn merge_fields(doc: &mut Value, changes: &Value) -> StoreResult<()> {
    let target = doc.as_object_mut().ok_or(StoreError::NotAnObject)?;
    let source = changes.as_object().ok_or(StoreError::NotAnObject)?;

    for (key, value) in source {
        if key == ID_FIELD || key == CREATED_AT_FIELD {
            continue;
        }
        target.insert(key.clone(), value.clone());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stamp_assigns_id_and_created_at() {
        let mut doc = json!({"name": "Devworks"});
        let id = stamp_new(&mut doc).unwrap();

        assert_eq!(doc_id(&doc), Some(id.as_str()));
        assert!(doc.get(CREATED_AT_FIELD).is_some());
    }

    #[test]
    fn test_stamp_preserves_existing_id() {
        let mut doc = json!({"id": "fixed-id", "name": "Devworks"});
        let id = stamp_new(&mut doc).unwrap();

        assert_eq!(id, "fixed-id");
    }

    #[test]
    fn test_stamp_rejects_non_objects() {
        let mut doc = json!("not an object");
        assert!(matches!(stamp_new(&mut doc), Err(StoreError::NotAnObject)));
    }

    #[test]
    fn test_merge_skips_immutable_fields() {
        let mut doc = json!({"id": "a", "created_at": "t0", "name": "old"});
        let changes = json!({"id": "b", "created_at": "t1", "name": "new"});

        merge_fields(&mut doc, &changes).unwrap();

        assert_eq!(doc["id"], "a");
        assert_eq!(doc["created_at"], "t0");
        assert_eq!(doc["name"], "new");
    }
}
