//! # Auth Errors
//!
//! Error types for authentication and authorization.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================

    /// Wrong email or password (generic - don't leak which)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email already registered
    #[error("Email already registered")]
    EmailAlreadyExists,

    /// No account for the given email (password reset flow)
    #[error("There is no user with that email")]
    UnknownEmail,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    // ==================
    // Token Errors
    // ==================

    /// JWT token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Password reset token is invalid or expired
    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    // ==================
    // Authorization Errors
    // ==================

    /// User must be authenticated
    #[error("Not authorized to access this route")]
    AuthenticationRequired,

    /// Authenticated but the role is not allowed here
    #[error("User role '{0}' is not authorized to access this route")]
    RoleNotAllowed(String),

    /// Authenticated but does not own the resource
    #[error("Not authorized to modify this resource")]
    NotOwner,

    // ==================
    // Internal Errors
    // ==================

    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,

    /// Email dispatch failed
    #[error("Email could not be sent: {0}")]
    EmailError(String),

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            AuthError::WeakPassword(_) => 400,
            AuthError::MalformedToken => 400,
            AuthError::InvalidResetToken => 400,

            // 401 Unauthorized
            AuthError::InvalidCredentials => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidSignature => 401,
            AuthError::AuthenticationRequired => 401,
            AuthError::NotOwner => 401,

            // 403 Forbidden
            AuthError::RoleNotAllowed(_) => 403,

            // 404 Not Found
            AuthError::UnknownEmail => 404,

            // 409 Conflict
            AuthError::EmailAlreadyExists => 409,

            // 500 Internal Server Error
            AuthError::HashingFailed => 500,
            AuthError::TokenGenerationFailed => 500,
            AuthError::EmailError(_) => 500,
            AuthError::StorageError(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(
            AuthError::RoleNotAllowed("user".to_string()).status_code(),
            403
        );
        assert_eq!(AuthError::EmailAlreadyExists.status_code(), 409);
        assert_eq!(AuthError::HashingFailed.status_code(), 500);
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        let err = AuthError::InvalidCredentials;
        assert!(!err.to_string().contains("password"));
        assert!(!err.to_string().contains("email"));
    }
}
