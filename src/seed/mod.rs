//! # Data Seeding
//!
//! Imports JSON fixtures into the store (and can destroy them again).
//! Expected files in the data directory: `bootcamps.json`, `courses.json`,
//! `users.json`, `reviews.json` — each a JSON array of documents. Missing
//! files are skipped.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::auth::crypto::hash_password;
use crate::models::aggregates::{recompute_average_cost, recompute_average_rating};
use crate::models::{bootcamp, course, review};
use crate::store::{CollectionStore, FilterSpec};

/// Result type for seeding
pub type SeedResult<T> = Result<T, SeedError>;

/// Seeder errors
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Could not read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Could not parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Fixture error: {0}")]
    Fixture(String),
}

/// Counts of imported documents per collection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub bootcamps: usize,
    pub courses: usize,
    pub users: usize,
    pub reviews: usize,
}

/// Import every fixture file found in the data directory.
///
/// User fixtures carry a plaintext `password` field; it is hashed into
/// `password_hash` on the way in and never stored raw. Derived bootcamp
/// aggregates are recomputed once all documents are in.
pub fn import_data<S>(store: &S, data_dir: &Path) -> SeedResult<SeedReport>
where
    S: CollectionStore + ?Sized,
{
    let mut report = SeedReport::default();

    for doc in load_fixture(data_dir, "users.json")? {
        let doc = prepare_user(doc)?;
        store
            .insert(crate::auth::user::COLLECTION, doc)
            .map_err(|e| SeedError::Store(e.to_string()))?;
        report.users += 1;
    }

    for doc in load_fixture(data_dir, "bootcamps.json")? {
        store
            .insert(bootcamp::COLLECTION, doc)
            .map_err(|e| SeedError::Store(e.to_string()))?;
        report.bootcamps += 1;
    }

    for doc in load_fixture(data_dir, "courses.json")? {
        store
            .insert(course::COLLECTION, doc)
            .map_err(|e| SeedError::Store(e.to_string()))?;
        report.courses += 1;
    }

    for doc in load_fixture(data_dir, "reviews.json")? {
        store
            .insert(review::COLLECTION, doc)
            .map_err(|e| SeedError::Store(e.to_string()))?;
        report.reviews += 1;
    }

    refresh_aggregates(store)?;

    Ok(report)
}

/// Drop every seeded collection
pub fn destroy_data<S>(store: &S) -> SeedResult<()>
where
    S: CollectionStore + ?Sized,
{
    for collection in [
        bootcamp::COLLECTION,
        course::COLLECTION,
        review::COLLECTION,
        crate::auth::user::COLLECTION,
    ] {
        store
            .clear(collection)
            .map_err(|e| SeedError::Store(e.to_string()))?;
    }
    Ok(())
}

/// Read one fixture file; a missing file yields an empty list
fn load_fixture(data_dir: &Path, name: &str) -> SeedResult<Vec<Value>> {
    let path = data_dir.join(name);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(&path).map_err(|e| SeedError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let parsed: Value = serde_json::from_str(&raw).map_err(|e| SeedError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    match parsed {
        Value::Array(docs) => Ok(docs),
        _ => Err(SeedError::Parse {
            path: path.display().to_string(),
            message: "expected a JSON array".to_string(),
        }),
    }
}

/// Replace a fixture user's plaintext password with its hash
fn prepare_user(mut doc: Value) -> SeedResult<Value> {
    let obj = doc
        .as_object_mut()
        .ok_or_else(|| SeedError::Fixture("user fixture must be an object".to_string()))?;

    let password = obj
        .remove("password")
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| SeedError::Fixture("user fixture needs a password".to_string()))?;

    let hash = hash_password(&password).map_err(|e| SeedError::Fixture(e.to_string()))?;
    obj.insert("password_hash".to_string(), Value::String(hash));

    Ok(doc)
}

/// Recompute derived bootcamp fields after a bulk import
fn refresh_aggregates<S>(store: &S) -> SeedResult<()>
where
    S: CollectionStore + ?Sized,
{
    let camps = store
        .execute(&store.find(bootcamp::COLLECTION, FilterSpec::empty()))
        .map_err(|e| SeedError::Store(e.to_string()))?;

    for camp in camps {
        if let Some(id) = camp.get("id").and_then(Value::as_str) {
            recompute_average_cost(store, id).map_err(|e| SeedError::Store(e.to_string()))?;
            recompute_average_rating(store, id).map_err(|e| SeedError::Store(e.to_string()))?;
        }
    }
    Ok(())
}
