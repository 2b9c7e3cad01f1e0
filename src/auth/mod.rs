pub mod cookies;
pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::types::Role;

/// Session token claims: who the account is and what they may do.
/// The role rides inside the token so the gate never needs a database
/// round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(account_id: Uuid, email: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        let session_days = config::config().security.session_days;
        let exp = (now + Duration::days(session_days as i64)).timestamp();

        Self {
            sub: account_id,
            email: email.into(),
            role,
            iat: now.timestamp(),
            exp,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Session secret is not configured")]
    MissingSecret,

    #[error("Failed to sign session token: {0}")]
    Signing(String),

    #[error("Invalid or expired session token")]
    InvalidToken,
}

/// Sign a session token with the configured secret.
pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    sign_with_secret(claims, secret)
}

/// Verify a session token and return its claims. Expiry is checked by
/// the library; any failure collapses into `InvalidToken`.
pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    verify_with_secret(token, secret)
}

fn sign_with_secret(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::Signing(e.to_string()))
}

fn verify_with_secret(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_round_trip_through_a_token() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, "secretary@example.com", Role::Secretary);

        let token = sign_with_secret(&claims, "test-secret").unwrap();
        let decoded = verify_with_secret(&token, "test-secret").unwrap();

        assert_eq!(decoded.sub, id);
        assert_eq!(decoded.email, "secretary@example.com");
        assert_eq!(decoded.role, Role::Secretary);
        assert_eq!(decoded.exp, claims.exp);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "a@example.com", Role::Viewer);
        let token = sign_with_secret(&claims, "secret-one").unwrap();

        assert!(matches!(
            verify_with_secret(&token, "secret-two"),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "old@example.com".to_string(),
            role: Role::Admin,
            iat: now - 600,
            // Past the default decode leeway
            exp: now - 300,
        };

        let token = sign_with_secret(&claims, "test-secret").unwrap();
        assert!(matches!(
            verify_with_secret(&token, "test-secret"),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "a@example.com", Role::Viewer);
        let mut token = sign_with_secret(&claims, "test-secret").unwrap();
        token.push('x');

        assert!(verify_with_secret(&token, "test-secret").is_err());
    }
}
