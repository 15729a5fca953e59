//! # Course Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{check_text, ModelResult, ValidationError};

/// Collection the courses live in
pub const COLLECTION: &str = "courses";

/// Field on a course referencing its bootcamp
pub const BOOTCAMP_FIELD: &str = "bootcamp";

/// Required skill level for a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

/// Inbound course payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePayload {
    pub title: String,
    pub description: String,
    pub weeks: u32,
    pub tuition: f64,
    pub minimum_skill: MinimumSkill,
    #[serde(default)]
    pub scholarship_available: bool,
}

impl CoursePayload {
    /// Validate the payload
    pub fn validate(&self) -> ModelResult<()> {
        check_text("title", &self.title, 100)?;
        check_text("description", &self.description, 500)?;

        if self.weeks == 0 {
            return Err(ValidationError::new("weeks", "must be at least 1"));
        }
        if self.tuition < 0.0 {
            return Err(ValidationError::new("tuition", "must not be negative"));
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

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CoursePayload {
        CoursePayload {
            title: "Full Stack Web Development".to_string(),
            description: "Twelve weeks of everything".to_string(),
            weeks: 12,
            tuition: 10000.0,
            minimum_skill: MinimumSkill::Intermediate,
            scholarship_available: true,
        }
    }

    #[test]
    fn test_valid_payload() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn test_zero_weeks_rejected() {
        let mut p = payload();
        p.weeks = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_negative_tuition_rejected() {
        let mut p = payload();
        p.tuition = -1.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_into_document_stamps_references() {
        let doc = payload().into_document("camp-1", "user-1");

        assert_eq!(doc["bootcamp"], "camp-1");
        assert_eq!(doc["user"], "user-1");
        assert_eq!(doc["minimum_skill"], "intermediate");
    }
}
