///! Integration test for JWT issuing and validation.
///!
///! Tokens are minted locally with the same HS256 secret the server uses and
///! checked through `JwtKeys::validate_token`. No running server or database
///! is needed.
///!
///! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use std::time::Duration;
use uuid::Uuid;

use vinexpert_backend::auth::jwt::{Claims, JwtKeys};
use vinexpert_backend::models::users::{Model as User, Roles};

/// A fake secret for testing.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn keys() -> JwtKeys {
    JwtKeys::new(TEST_SECRET, Duration::from_secs(24 * 3600))
}

fn user(role: Roles) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Alice Martin".to_string(),
        email: "alice@example.com".to_string(),
        password: "pbkdf2:sha256:260000$c2FsdA$aGFzaA".to_string(),
        role,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// Helper: mint a JWT signed with HS256 using `secret`.
fn mint_token(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

#[test]
fn test_issued_token_round_trips() {
    let alice = user(Roles::Admin);
    let token = keys().issue(&alice).expect("Token should be issued");

    let claims = keys().validate_token(&token).expect("Token should be valid");

    assert_eq!(claims.user_id().unwrap(), alice.id);
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.role, Roles::Admin);
    assert_eq!(claims.exp - claims.iat, 24 * 3600);
}

#[test]
fn test_expired_token_is_rejected() {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "expired@example.com".to_string(),
        role: Roles::Client,
        exp: now - 300, // well past the 60s default leeway
        iat: now - 3600,
    };

    let result = keys().validate_token(&mint_token(&claims, TEST_SECRET));
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "bob@example.com".to_string(),
        role: Roles::Client,
        exp: now + 3600,
        iat: now,
    };

    let token = mint_token(&claims, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx");

    let result = keys().validate_token(&token);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[test]
fn test_garbage_token_is_rejected() {
    assert!(keys().validate_token("not.a.valid.jwt").is_err());
}

#[test]
fn test_non_uuid_subject_is_reported() {
    let claims = Claims {
        sub: "42".to_string(),
        email: "legacy@example.com".to_string(),
        role: Roles::Client,
        exp: 0,
        iat: 0,
    };

    assert!(claims.user_id().is_err());
}
