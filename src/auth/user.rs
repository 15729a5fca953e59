//! # User Model
//!
//! Users are stored as documents in the `users` collection. The password
//! hash and reset-token fields never leave the server; `scrub` strips them
//! before a document is serialized into a response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{AuthError, AuthResult};

/// Collection the users live in
pub const COLLECTION: &str = "users";

/// Fields that must never appear in a response body
pub const PRIVATE_FIELDS: [&str; 3] = [
    "password_hash",
    "reset_password_token",
    "reset_password_expire",
];

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can review bootcamps
    User,
    /// Can own one bootcamp and its courses
    Publisher,
    /// Full access, bypasses ownership checks
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

/// A stored user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub password_hash: String,
    #[serde(default)]
    pub reset_password_token: Option<String>,
    /// Reset token expiry (Unix epoch seconds)
    #[serde(default)]
    pub reset_password_expire: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Deserialize the typed view of a stored document
    pub fn from_document(doc: &Value) -> AuthResult<Self> {
        serde_json::from_value(doc.clone())
            .map_err(|e| AuthError::StorageError(format!("malformed user document: {}", e)))
    }

    /// The user's document without server-only fields
    pub fn public_json(&self) -> Value {
        let mut doc = serde_json::to_value(self).expect("user serializes");
        scrub(&mut doc);
        doc
    }
}

/// Remove server-only fields from a user document in place
pub fn scrub(doc: &mut Value) {
    if let Some(obj) = doc.as_object_mut() {
        for field in PRIVATE_FIELDS {
            obj.remove(field);
        }
    }
}

// ==================
// Request Types
// ==================

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update request (name and/or email)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDetailsRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Password change request
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Password reset initiation request
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Password reset completion request
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_value(Role::Publisher).unwrap(), "publisher");
        let role: Role = serde_json::from_value(json!("admin")).unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_register_request_defaults_to_user_role() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "name": "John",
            "email": "john@example.com",
            "password": "secret123"
        }))
        .unwrap();
        assert_eq!(req.role, Role::User);
    }

    #[test]
    fn test_public_json_omits_private_fields() {
        let user = User {
            id: "u1".to_string(),
            name: "John".to_string(),
            email: "john@example.com".to_string(),
            role: Role::User,
            password_hash: "hash".to_string(),
            reset_password_token: Some("token-hash".to_string()),
            reset_password_expire: Some(0),
            created_at: None,
        };

        let public = user.public_json();
        let obj = public.as_object().unwrap();
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("reset_password_token"));
        assert!(!obj.contains_key("reset_password_expire"));
        assert_eq!(obj["email"], "john@example.com");
    }

    #[test]
    fn test_from_document() {
        let doc = json!({
            "id": "u1",
            "name": "John",
            "email": "john@example.com",
            "role": "publisher",
            "password_hash": "hash"
        });

        let user = User::from_document(&doc).unwrap();
        assert_eq!(user.role, Role::Publisher);
        assert!(user.reset_password_token.is_none());
    }
}
