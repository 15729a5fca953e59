//! # Auth Service
//!
//! Registration, login and account management over the document store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{json, Value};

use crate::store::{CollectionStore, FilterSpec, StoreError};

use super::crypto::{self, PasswordPolicy};
use super::email::{EmailSender, EmailTemplate};
use super::errors::{AuthError, AuthResult};
use super::jwt::{JwtManager, TokenResponse};
use super::user::{
    self, LoginRequest, RegisterRequest, Role, UpdateDetailsRequest, UpdatePasswordRequest, User,
};

/// How long a password reset token stays valid
const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Auth service combining store, hashing, tokens and email
pub struct AuthService {
    store: Arc<dyn CollectionStore>,
    jwt: JwtManager,
    policy: PasswordPolicy,
    emails: Arc<dyn EmailSender>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CollectionStore>,
        jwt: JwtManager,
        policy: PasswordPolicy,
        emails: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            store,
            jwt,
            policy,
            emails,
        }
    }

    /// Register a new account and issue a token.
    ///
    /// The admin role is never self-assignable; admin accounts are created
    /// through the admin user management endpoints.
    pub fn register(&self, request: RegisterRequest) -> AuthResult<(Value, TokenResponse)> {
        if request.role == Role::Admin {
            return Err(AuthError::RoleNotAllowed(Role::Admin.as_str().to_string()));
        }

        let user = self.insert_user(request)?;
        let token = self.jwt.generate_token(&user)?;

        Ok((user.public_json(), TokenResponse::new(token)))
    }

    /// Verify credentials and issue a token
    pub fn login(&self, request: LoginRequest) -> AuthResult<TokenResponse> {
        let user = self
            .find_by_email(&request.email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !crypto::verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt.generate_token(&user)?;
        Ok(TokenResponse::new(token))
    }

    /// The authenticated user's own record
    pub fn me(&self, user_id: &str) -> AuthResult<Value> {
        let user = self
            .find_by_id(user_id)?
            .ok_or(AuthError::AuthenticationRequired)?;
        Ok(user.public_json())
    }

    /// Update the authenticated user's name and/or email
    pub fn update_details(
        &self,
        user_id: &str,
        request: UpdateDetailsRequest,
    ) -> AuthResult<Value> {
        let mut changes = serde_json::Map::new();

        if let Some(name) = request.name {
            changes.insert("name".to_string(), Value::String(name));
        }
        if let Some(email) = request.email {
            if let Some(existing) = self.find_by_email(&email)? {
                if existing.id != user_id {
                    return Err(AuthError::EmailAlreadyExists);
                }
            }
            changes.insert("email".to_string(), Value::String(email));
        }

        let updated = self
            .store
            .update(user::COLLECTION, user_id, &Value::Object(changes))
            .map_err(storage_err)?
            .ok_or(AuthError::AuthenticationRequired)?;

        let user = User::from_document(&updated)?;
        Ok(user.public_json())
    }

    /// Change the authenticated user's password, verifying the current one
    pub fn update_password(
        &self,
        user_id: &str,
        request: UpdatePasswordRequest,
    ) -> AuthResult<TokenResponse> {
        let user = self
            .find_by_id(user_id)?
            .ok_or(AuthError::AuthenticationRequired)?;

        if !crypto::verify_password(&request.current_password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.policy.validate(&request.new_password)?;
        let password_hash = crypto::hash_password(&request.new_password)?;

        self.store
            .update(
                user::COLLECTION,
                user_id,
                &json!({ "password_hash": password_hash }),
            )
            .map_err(storage_err)?;

        // Notification only; a failed email must not fail the change
        let _ = self.emails.send(EmailTemplate::PasswordChanged {
            user_email: user.email.clone(),
        });

        let token = self.jwt.generate_token(&user)?;
        Ok(TokenResponse::new(token))
    }

    /// Start the password reset flow.
    ///
    /// Stores the hash of a one-shot token on the user and emails the raw
    /// token; the raw value never touches the store.
    pub fn forgot_password(&self, email: &str) -> AuthResult<()> {
        let user = self.find_by_email(email)?.ok_or(AuthError::UnknownEmail)?;

        let raw_token = crypto::generate_token();
        let token_hash = crypto::hash_token(&raw_token);
        let expires = (Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES)).timestamp();

        self.store
            .update(
                user::COLLECTION,
                &user.id,
                &json!({
                    "reset_password_token": token_hash,
                    "reset_password_expire": expires,
                }),
            )
            .map_err(storage_err)?;

        let sent = self.emails.send(EmailTemplate::PasswordReset {
            token: raw_token,
            user_email: user.email.clone(),
        });

        // A failed send leaves no usable token behind
        if let Err(e) = sent {
            self.store
                .update(
                    user::COLLECTION,
                    &user.id,
                    &json!({
                        "reset_password_token": Value::Null,
                        "reset_password_expire": Value::Null,
                    }),
                )
                .map_err(storage_err)?;
            return Err(e);
        }

        Ok(())
    }

    /// Complete the password reset flow with the raw token from the email
    pub fn reset_password(&self, raw_token: &str, new_password: &str) -> AuthResult<TokenResponse> {
        let token_hash = crypto::hash_token(raw_token);
        let now = Utc::now().timestamp();

        let docs = self
            .store
            .execute(&self.store.find(user::COLLECTION, FilterSpec::empty()))
            .map_err(storage_err)?;

        let user = docs
            .iter()
            .filter_map(|doc| User::from_document(doc).ok())
            .find(|u| {
                u.reset_password_token
                    .as_deref()
                    .is_some_and(|stored| crypto::secure_compare(stored, &token_hash))
                    && u.reset_password_expire.is_some_and(|exp| exp > now)
            })
            .ok_or(AuthError::InvalidResetToken)?;

        self.policy.validate(new_password)?;
        let password_hash = crypto::hash_password(new_password)?;

        self.store
            .update(
                user::COLLECTION,
                &user.id,
                &json!({
                    "password_hash": password_hash,
                    "reset_password_token": Value::Null,
                    "reset_password_expire": Value::Null,
                }),
            )
            .map_err(storage_err)?;

        let token = self.jwt.generate_token(&user)?;
        Ok(TokenResponse::new(token))
    }

    // ==================
    // Admin user management
    // ==================

    /// Create a user with any role (admin endpoints only)
    pub fn create_user(&self, request: RegisterRequest) -> AuthResult<Value> {
        let user = self.insert_user(request)?;
        Ok(user.public_json())
    }

    /// Apply an admin update to a user; a `password` field is hashed, the
    /// rest merged as-is
    pub fn admin_update_user(&self, user_id: &str, mut changes: Value) -> AuthResult<Value> {
        let obj = changes
            .as_object_mut()
            .ok_or_else(|| AuthError::StorageError("update body must be an object".to_string()))?;

        if let Some(password) = obj.remove("password") {
            let raw = password.as_str().ok_or(AuthError::WeakPassword(
                "Password must be a string".to_string(),
            ))?;
            self.policy.validate(raw)?;
            obj.insert(
                "password_hash".to_string(),
                Value::String(crypto::hash_password(raw)?),
            );
        }
        if let Some(email) = obj.get("email").and_then(Value::as_str) {
            if let Some(existing) = self.find_by_email(email)? {
                if existing.id != user_id {
                    return Err(AuthError::EmailAlreadyExists);
                }
            }
        }

        let updated = self
            .store
            .update(user::COLLECTION, user_id, &changes)
            .map_err(storage_err)?
            .ok_or_else(|| AuthError::StorageError(format!("no user {}", user_id)))?;

        let user = User::from_document(&updated)?;
        Ok(user.public_json())
    }

    /// Look a user up by id
    pub fn find_by_id(&self, user_id: &str) -> AuthResult<Option<User>> {
        self.store
            .get(user::COLLECTION, user_id)
            .map_err(storage_err)?
            .as_ref()
            .map(User::from_document)
            .transpose()
    }

    /// Look a user up by email
    pub fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let filter = FilterSpec::field_eq("email", json!(email));
        let docs = self
            .store
            .execute(&self.store.find(user::COLLECTION, filter))
            .map_err(storage_err)?;

        docs.first().map(User::from_document).transpose()
    }

    /// Validate a bearer token into its claims
    pub fn validate_token(&self, token: &str) -> AuthResult<super::jwt::JwtClaims> {
        self.jwt.validate_token(token)
    }

    fn insert_user(&self, request: RegisterRequest) -> AuthResult<User> {
        self.policy.validate(&request.password)?;

        if self.find_by_email(&request.email)?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = crypto::hash_password(&request.password)?;
        let doc = json!({
            "name": request.name,
            "email": request.email,
            "role": request.role,
            "password_hash": password_hash,
        });

        let stored = self
            .store
            .insert(user::COLLECTION, doc)
            .map_err(storage_err)?;
        User::from_document(&stored)
    }
}

fn storage_err(e: StoreError) -> AuthError {
    AuthError::StorageError(e.to_string())
}
