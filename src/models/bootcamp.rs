//! # Bootcamp Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{check_text, ModelResult, ValidationError};

/// Collection the bootcamps live in
pub const COLLECTION: &str = "bootcamps";

/// Career tracks a bootcamp can teach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Career {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "UI/UX")]
    UiUx,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Business")]
    Business,
    #[serde(rename = "Other")]
    Other,
}

/// A geocoded point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
}

/// Inbound bootcamp payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootcampPayload {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: String,
    pub careers: Vec<Career>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

impl BootcampPayload {
    /// Validate the payload
    pub fn validate(&self) -> ModelResult<()> {
        check_text("name", &self.name, 50)?;
        check_text("description", &self.description, 500)?;
        check_text("address", &self.address, 200)?;

        if let Some(website) = &self.website {
            if !website.starts_with("http://") && !website.starts_with("https://") {
                return Err(ValidationError::new(
                    "website",
                    "must be an http or https URL",
                ));
            }
        }
        if let Some(phone) = &self.phone {
            if phone.len() > 20 {
                return Err(ValidationError::new(
                    "phone",
                    "must be at most 20 characters",
                ));
            }
        }
        if let Some(email) = &self.email {
            if !looks_like_email(email) {
                return Err(ValidationError::new("email", "must be a valid email"));
            }
        }
        if self.careers.is_empty() {
            return Err(ValidationError::new("careers", "at least one is required"));
        }

        Ok(())
    }

    /// Build the stored document, stamping the derived slug and the owner
    pub fn into_document(self, owner_id: &str) -> Value {
        let slug = slugify(&self.name);
        let mut doc = serde_json::to_value(&self).expect("payload serializes");

        let obj = doc.as_object_mut().expect("payload is an object");
        obj.insert("slug".to_string(), Value::String(slug));
        obj.insert("user".to_string(), Value::String(owner_id.to_string()));
        obj.insert("photo".to_string(), Value::String("no-photo.jpg".to_string()));

        doc
    }
}

/// Loose shape check; real address verification is the mail provider's job
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Whether a user already owns a bootcamp (publishers get one each)
pub fn has_published<S>(store: &S, user_id: &str) -> crate::store::StoreResult<bool>
where
    S: crate::store::CollectionStore + ?Sized,
{
    let owned = store.count(
        COLLECTION,
        &crate::store::FilterSpec::field_eq("user", serde_json::json!(user_id)),
    )?;
    Ok(owned > 0)
}

/// Delete a bootcamp together with its courses and reviews
pub fn cascade_delete<S>(store: &S, bootcamp_id: &str) -> crate::store::StoreResult<bool>
where
    S: crate::store::CollectionStore + ?Sized,
{
    use crate::store::FilterSpec;

    let reference = serde_json::json!(bootcamp_id);
    store.delete_where(
        super::course::COLLECTION,
        &FilterSpec::field_eq(super::course::BOOTCAMP_FIELD, reference.clone()),
    )?;
    store.delete_where(
        super::review::COLLECTION,
        &FilterSpec::field_eq(super::review::BOOTCAMP_FIELD, reference),
    )?;

    store.delete(COLLECTION, bootcamp_id)
}

/// Derive a URL-safe slug from a name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> BootcampPayload {
        BootcampPayload {
            name: "Devworks Bootcamp".to_string(),
            description: "Full stack training".to_string(),
            website: Some("https://devworks.com".to_string()),
            phone: Some("(111) 111-1111".to_string()),
            email: Some("enroll@devworks.com".to_string()),
            address: "233 Bay State Rd Boston MA 02215".to_string(),
            careers: vec![Career::WebDevelopment, Career::UiUx],
            location: None,
            housing: true,
            job_assistance: true,
            job_guarantee: false,
            accept_gi: true,
        }
    }

    #[test]
    fn test_valid_payload() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn test_name_length_cap() {
        let mut p = payload();
        p.name = "x".repeat(51);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_website_must_be_http() {
        let mut p = payload();
        p.website = Some("ftp://devworks.com".to_string());
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_careers_required() {
        let mut p = payload();
        p.careers.clear();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_into_document_stamps_slug_owner_and_photo() {
        let doc = payload().into_document("user-1");

        assert_eq!(doc["slug"], "devworks-bootcamp");
        assert_eq!(doc["user"], "user-1");
        assert_eq!(doc["photo"], "no-photo.jpg");
        assert_eq!(doc["careers"], json!(["Web Development", "UI/UX"]));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Devworks Bootcamp"), "devworks-bootcamp");
        assert_eq!(slugify("UI/UX & Design!"), "ui-ux-design");
        assert_eq!(slugify("  spaced  "), "spaced");
    }
}
