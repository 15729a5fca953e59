//! Auth Flow Tests
//!
//! Register/login/token round trips, role rules and the password reset flow
//! against the in-memory store.

use std::sync::Arc;

use campdir::auth::user::{LoginRequest, RegisterRequest, UpdateDetailsRequest};
use campdir::auth::{
    authorize, require_owner, AuthError, AuthService, EmailTemplate, JwtConfig, JwtManager,
    MockEmailSender, PasswordPolicy, Role,
};
use campdir::store::MemoryStore;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (AuthService, Arc<MockEmailSender>) {
    let emails = Arc::new(MockEmailSender::new());
    let service = AuthService::new(
        Arc::new(MemoryStore::new()),
        JwtManager::new(JwtConfig::default()),
        PasswordPolicy::default(),
        emails.clone(),
    );
    (service, emails)
}

fn register(service: &AuthService, email: &str, role: Role) -> String {
    let (user, _token) = service
        .register(RegisterRequest {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            role,
        })
        .unwrap();
    user["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Token Round Trips
// =============================================================================

/// A register token authenticates as the registered user.
#[test]
fn test_register_token_round_trip() {
    let (service, _) = setup();

    let (user, token) = service
        .register(RegisterRequest {
            name: "John".to_string(),
            email: "john@example.com".to_string(),
            password: "secret123".to_string(),
            role: Role::Publisher,
        })
        .unwrap();

    let claims = service.validate_token(&token.token).unwrap();
    assert_eq!(claims.sub, user["id"].as_str().unwrap());
    assert_eq!(claims.role, Role::Publisher);
}

/// Login issues a usable token; wrong credentials stay generic.
#[test]
fn test_login() {
    let (service, _) = setup();
    register(&service, "john@example.com", Role::User);

    let token = service
        .login(LoginRequest {
            email: "john@example.com".to_string(),
            password: "secret123".to_string(),
        })
        .unwrap();
    assert!(service.validate_token(&token.token).is_ok());

    for (email, password) in [
        ("john@example.com", "wrong"),
        ("nobody@example.com", "secret123"),
    ] {
        let err = service
            .login(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}

// =============================================================================
// Role & Ownership Rules
// =============================================================================

/// Nobody registers themselves as admin.
#[test]
fn test_admin_not_self_assignable() {
    let (service, _) = setup();

    let result = service.register(RegisterRequest {
        name: "Mallory".to_string(),
        email: "mallory@example.com".to_string(),
        password: "secret123".to_string(),
        role: Role::Admin,
    });
    assert!(matches!(result, Err(AuthError::RoleNotAllowed(_))));
}

/// Role checks allow listed roles only; ownership admits owners and admins.
#[test]
fn test_authorize_and_ownership() {
    assert!(authorize(Role::Publisher, &[Role::Publisher, Role::Admin]).is_ok());
    assert!(matches!(
        authorize(Role::User, &[Role::Publisher, Role::Admin]),
        Err(AuthError::RoleNotAllowed(_))
    ));

    assert!(require_owner(Role::Publisher, "u1", "u1").is_ok());
    assert!(require_owner(Role::Admin, "someone-else", "u1").is_ok());
    assert!(matches!(
        require_owner(Role::Publisher, "u2", "u1"),
        Err(AuthError::NotOwner)
    ));
}

/// The profile returned by `me` never carries credential material.
#[test]
fn test_me_is_scrubbed() {
    let (service, _) = setup();
    let id = register(&service, "john@example.com", Role::User);

    let profile = service.me(&id).unwrap();
    let obj = profile.as_object().unwrap();
    assert!(!obj.contains_key("password_hash"));
    assert!(!obj.contains_key("reset_password_token"));
    assert_eq!(obj["email"], "john@example.com");
}

// =============================================================================
// Account Management
// =============================================================================

/// Email updates reject addresses already registered to someone else.
#[test]
fn test_update_details_email_uniqueness() {
    let (service, _) = setup();
    let id = register(&service, "john@example.com", Role::User);
    register(&service, "taken@example.com", Role::User);

    let err = service
        .update_details(
            &id,
            UpdateDetailsRequest {
                name: None,
                email: Some("taken@example.com".to_string()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailAlreadyExists));

    // Re-asserting your own email is fine
    assert!(service
        .update_details(
            &id,
            UpdateDetailsRequest {
                name: Some("Johnny".to_string()),
                email: Some("john@example.com".to_string()),
            },
        )
        .is_ok());
}

// =============================================================================
// Password Reset Flow
// =============================================================================

/// Full forgot/reset round trip: email carries the raw token, the stored
/// side only ever sees the hash, and the token is one-shot.
#[test]
fn test_password_reset_flow() {
    let (service, emails) = setup();
    register(&service, "john@example.com", Role::User);

    service.forgot_password("john@example.com").unwrap();

    let raw_token = match &emails.sent.read().unwrap()[0] {
        EmailTemplate::PasswordReset { token, .. } => token.clone(),
        other => panic!("unexpected template: {:?}", other),
    };

    service.reset_password(&raw_token, "new-password").unwrap();

    assert!(service
        .login(LoginRequest {
            email: "john@example.com".to_string(),
            password: "new-password".to_string(),
        })
        .is_ok());

    assert!(matches!(
        service.reset_password(&raw_token, "again"),
        Err(AuthError::InvalidResetToken)
    ));
}

/// A bogus reset token never matches.
#[test]
fn test_reset_with_unknown_token() {
    let (service, _) = setup();
    register(&service, "john@example.com", Role::User);

    assert!(matches!(
        service.reset_password("made-up-token", "whatever1"),
        Err(AuthError::InvalidResetToken)
    ));
}
