//! # In-Memory Collection Store
//!
//! Single-node store keeping every collection as a vector of JSON documents
//! behind one `RwLock`. Insertion order is preserved, which keeps repeated
//! identical queries deterministic.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::document::{self, ID_FIELD};
use super::errors::{StoreError, StoreResult};
use super::filter::{compare_json_values, FilterSpec};
use super::query::{Populate, Query};
use super::CollectionStore;

/// In-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<String, Vec<Value>>>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<Value>>>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    /// Sort documents by the query's sort keys, first key wins ties last
    fn apply_sort(docs: &mut [Value], query: &Query) {
        if query.sort.is_empty() {
            return;
        }

        docs.sort_by(|a, b| {
            for key in &query.sort {
                let va = a.get(&key.field).unwrap_or(&Value::Null);
                let vb = b.get(&key.field).unwrap_or(&Value::Null);

                let mut cmp = compare_json_values(va, vb);
                if key.descending {
                    cmp = cmp.reverse();
                }
                if cmp != std::cmp::Ordering::Equal {
                    return cmp;
                }
            }
            std::cmp::Ordering::Equal
        });
    }

    /// Project a document to the named fields.
    ///
    /// The id field and the populated field (when present) are always
    /// retained so callers can address the document and see its relation.
    fn project(doc: Value, fields: &[String], keep: Option<&str>) -> Value {
        match doc {
            Value::Object(obj) => {
                let filtered: serde_json::Map<String, Value> = obj
                    .into_iter()
                    .filter(|(k, _)| {
                        k == ID_FIELD || fields.iter().any(|f| f == k) || keep == Some(k.as_str())
                    })
                    .collect();
                Value::Object(filtered)
            }
            other => other,
        }
    }

    /// Resolve a relation expansion against the locked collection map
    fn resolve_populate(
        collections: &HashMap<String, Vec<Value>>,
        doc: &mut Value,
        populate: &Populate,
    ) {
        match populate {
            Populate::Reference {
                field,
                collection,
                select,
            } => {
                let Some(ref_id) = doc.get(field).and_then(Value::as_str).map(str::to_string)
                else {
                    return;
                };

                let resolved = collections
                    .get(collection)
                    .and_then(|docs| {
                        docs.iter()
                            .find(|d| document::doc_id(d) == Some(ref_id.as_str()))
                    })
                    .cloned();

                // Unresolvable references keep the raw id in place
                if let Some(mut target) = resolved {
                    if let Some(fields) = select {
                        target = Self::project(target, fields, None);
                    }
                    if let Some(obj) = doc.as_object_mut() {
                        obj.insert(field.clone(), target);
                    }
                }
            }
            Populate::Children {
                field,
                collection,
                foreign_key,
            } => {
                let Some(parent_id) = document::doc_id(doc).map(str::to_string) else {
                    return;
                };

                let children: Vec<Value> = collections
                    .get(collection)
                    .map(|docs| {
                        docs.iter()
                            .filter(|d| {
                                d.get(foreign_key).and_then(Value::as_str)
                                    == Some(parent_id.as_str())
                            })
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();

                if let Some(obj) = doc.as_object_mut() {
                    obj.insert(field.clone(), Value::Array(children));
                }
            }
        }
    }
}

impl CollectionStore for MemoryStore {
    fn insert(&self, collection: &str, mut doc: Value) -> StoreResult<Value> {
        document::stamp_new(&mut doc)?;

        let mut collections = self.write()?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());

        Ok(doc)
    }

    fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| document::doc_id(d) == Some(id)))
            .cloned())
    }

    fn update(&self, collection: &str, id: &str, changes: &Value) -> StoreResult<Option<Value>> {
        let mut collections = self.write()?;

        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(doc) = docs.iter_mut().find(|d| document::doc_id(d) == Some(id)) else {
            return Ok(None);
        };

        document::merge_fields(doc, changes)?;
        Ok(Some(doc.clone()))
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut collections = self.write()?;

        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|d| document::doc_id(d) != Some(id));
        Ok(docs.len() < before)
    }

    fn delete_where(&self, collection: &str, filter: &FilterSpec) -> StoreResult<usize> {
        let mut collections = self.write()?;

        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        Ok(before - docs.len())
    }

    fn count(&self, collection: &str, filter: &FilterSpec) -> StoreResult<usize> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count())
            .unwrap_or(0))
    }

    fn execute(&self, query: &Query) -> StoreResult<Vec<Value>> {
        let collections = self.read()?;

        let mut results: Vec<Value> = collections
            .get(&query.collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| query.filter.matches(d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Self::apply_sort(&mut results, query);

        let mut results: Vec<Value> = match query.limit {
            Some(limit) => results.into_iter().skip(query.skip).take(limit).collect(),
            None => results.into_iter().skip(query.skip).collect(),
        };

        if let Some(populate) = &query.populate {
            for doc in &mut results {
                Self::resolve_populate(&collections, doc, populate);
            }
        }

        if let Some(fields) = &query.select {
            let keep = query.populate.as_ref().map(|p| match p {
                Populate::Reference { field, .. } => field.as_str(),
                Populate::Children { field, .. } => field.as_str(),
            });
            results = results
                .into_iter()
                .map(|doc| Self::project(doc, fields, keep))
                .collect();
        }

        Ok(results)
    }

    fn clear(&self, collection: &str) -> StoreResult<usize> {
        let mut collections = self.write()?;
        Ok(collections
            .remove(collection)
            .map(|docs| docs.len())
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::filter::{FilterCondition, FilterOperator};
    use crate::store::query::SortKey;
    use serde_json::json;

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        for (name, cost) in [("Devworks", 8000), ("ModernTech", 12000), ("Codemasters", 6000)] {
            store
                .insert("bootcamps", json!({"name": name, "average_cost": cost}))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_insert_stamps_id() {
        let store = MemoryStore::new();
        let doc = store.insert("bootcamps", json!({"name": "Devworks"})).unwrap();

        let id = document::doc_id(&doc).unwrap();
        let fetched = store.get("bootcamps", id).unwrap().unwrap();
        assert_eq!(fetched["name"], "Devworks");
    }

    #[test]
    fn test_update_merges_fields() {
        let store = seeded_store();
        let doc = store
            .execute(&Query::new(
                "bootcamps",
                FilterSpec::field_eq("name", json!("Devworks")),
            ))
            .unwrap()
            .remove(0);
        let id = document::doc_id(&doc).unwrap();

        let updated = store
            .update("bootcamps", id, &json!({"housing": true}))
            .unwrap()
            .unwrap();
        assert_eq!(updated["housing"], true);
        assert_eq!(updated["name"], "Devworks");
    }

    #[test]
    fn test_delete_where_removes_matches() {
        let store = seeded_store();
        let removed = store
            .delete_where(
                "bootcamps",
                &FilterSpec::new(vec![FilterCondition::new(
                    "average_cost",
                    FilterOperator::Gte,
                    json!(8000),
                )]),
            )
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.count("bootcamps", &FilterSpec::empty()).unwrap(), 1);
    }

    #[test]
    fn test_execute_filters_sorts_and_paginates() {
        let store = seeded_store();

        let query = Query::new(
            "bootcamps",
            FilterSpec::new(vec![FilterCondition::new(
                "average_cost",
                FilterOperator::Lte,
                json!(12000),
            )]),
        )
        .sort(vec![SortKey::asc("average_cost")])
        .skip(1)
        .limit(1);

        let results = store.execute(&query).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["name"], "Devworks");
    }

    #[test]
    fn test_execute_projection_retains_id() {
        let store = seeded_store();
        let query = Query::new("bootcamps", FilterSpec::empty())
            .select(vec!["name".to_string()]);

        let results = store.execute(&query).unwrap();
        for doc in results {
            let obj = doc.as_object().unwrap();
            assert!(obj.contains_key("id"));
            assert!(obj.contains_key("name"));
            assert!(!obj.contains_key("average_cost"));
        }
    }

    #[test]
    fn test_populate_children() {
        let store = seeded_store();
        let parent = store
            .execute(&Query::new(
                "bootcamps",
                FilterSpec::field_eq("name", json!("Devworks")),
            ))
            .unwrap()
            .remove(0);
        let parent_id = document::doc_id(&parent).unwrap();

        store
            .insert("courses", json!({"title": "Full Stack", "bootcamp": parent_id}))
            .unwrap();
        store
            .insert("courses", json!({"title": "UI/UX", "bootcamp": parent_id}))
            .unwrap();

        let query = Query::new(
            "bootcamps",
            FilterSpec::field_eq("name", json!("Devworks")),
        )
        .populate(Populate::children("courses", "courses", "bootcamp"));

        let results = store.execute(&query).unwrap();
        let courses = results[0]["courses"].as_array().unwrap();
        assert_eq!(courses.len(), 2);
    }

    #[test]
    fn test_populate_reference_with_select() {
        let store = seeded_store();
        let parent = store
            .execute(&Query::new(
                "bootcamps",
                FilterSpec::field_eq("name", json!("Devworks")),
            ))
            .unwrap()
            .remove(0);
        let parent_id = document::doc_id(&parent).unwrap();

        store
            .insert("courses", json!({"title": "Full Stack", "bootcamp": parent_id}))
            .unwrap();

        let query = Query::new("courses", FilterSpec::empty()).populate(
            Populate::reference_with_select(
                "bootcamp",
                "bootcamps",
                vec!["name".to_string()],
            ),
        );

        let results = store.execute(&query).unwrap();
        let embedded = &results[0]["bootcamp"];
        assert_eq!(embedded["name"], "Devworks");
        assert!(embedded.get("average_cost").is_none());
        assert!(embedded.get("id").is_some());
    }
}
