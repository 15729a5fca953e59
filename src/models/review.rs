//! # Review Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{check_text, ModelResult, ValidationError};

/// Collection the reviews live in
pub const COLLECTION: &str = "reviews";

/// Field on a review referencing its bootcamp
pub const BOOTCAMP_FIELD: &str = "bootcamp";

/// Inbound review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPayload {
    pub title: String,
    pub text: String,
    pub rating: u8,
}

impl ReviewPayload {
    /// Validate the payload; ratings run 1 to 10
    pub fn validate(&self) -> ModelResult<()> {
        check_text("title", &self.title, 100)?;
        check_text("text", &self.text, 1000)?;

        if !(1..=10).contains(&self.rating) {
            return Err(ValidationError::new("rating", "must be between 1 and 10"));
        }

        Ok(())
    }

    /// Build the stored document, stamping the bootcamp reference and owner
    pub fn into_document(self, bootcamp_id: &str, owner_id: &str) -> Value {
        let mut doc = serde_json::to_value(&self).expect("payload serializes");

        let obj = doc.as_object_mut().expect("payload is an object");
        obj.insert(
            BOOTCAMP_FIELD.to_string(),
            Value::String(bootcamp_id.to_string()),
        );
        obj.insert("user".to_string(), Value::String(owner_id.to_string()));

        doc
    }
}

/// Whether a user has already reviewed a bootcamp (one review each)
pub fn already_reviewed<S>(
    store: &S,
    bootcamp_id: &str,
    user_id: &str,
) -> crate::store::StoreResult<bool>
where
    S: crate::store::CollectionStore + ?Sized,
{
    use crate::store::{FilterCondition, FilterSpec};

    let filter = FilterSpec::empty()
        .and(FilterCondition::eq(
            BOOTCAMP_FIELD,
            serde_json::json!(bootcamp_id),
        ))
        .and(FilterCondition::eq("user", serde_json::json!(user_id)));

    Ok(store.count(COLLECTION, &filter)? > 0)
}
