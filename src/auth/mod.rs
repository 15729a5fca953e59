//! # Authentication & Authorization
//!
//! Argon2id password hashing, stateless JWT access tokens, role-based
//! authorization, and the password reset flow.

pub mod crypto;
pub mod email;
pub mod errors;
pub mod jwt;
pub mod service;
pub mod user;

pub use crypto::PasswordPolicy;
pub use email::{EmailConfig, EmailSender, EmailTemplate, MockEmailSender, SmtpEmailSender};
pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtClaims, JwtConfig, JwtManager, TokenResponse};
pub use service::AuthService;
pub use user::{Role, User};

/// Check that a role is one of the allowed set
pub fn authorize(role: Role, allowed: &[Role]) -> AuthResult<()> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AuthError::RoleNotAllowed(role.as_str().to_string()))
    }
}

/// Check resource ownership: owners and admins pass, everyone else fails
pub fn require_owner(role: Role, user_id: &str, owner_id: &str) -> AuthResult<()> {
    if role == Role::Admin || user_id == owner_id {
        Ok(())
    } else {
        Err(AuthError::NotOwner)
    }
}
