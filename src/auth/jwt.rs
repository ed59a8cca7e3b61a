//! JWT issue and validation.

use crate::models::Role;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fixed token lifetime. There is no refresh or revocation.
pub const TOKEN_TTL_HOURS: i64 = 24;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Signs and verifies identity tokens with the process-wide HS256 secret.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
        }
    }

    pub fn issue(&self, user_id: i64, username: &str, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, username, role, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: i64,
        username: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            id: user_id,
            username: username.to_string(),
            role,
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::new(ALGORITHM), &claims, &self.keys.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Signature and algorithm are checked first, then expiry against `now`
    /// (expired once `now >= exp`, no leeway).
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-jwt-secret-min-32-chars!!!!";

    #[test]
    fn issued_token_verifies_with_same_identity() {
        let tokens = TokenService::new(SECRET);
        let token = tokens.issue(42, "bob", Role::User).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.username, "bob");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn token_expires_after_window() {
        let tokens = TokenService::new(SECRET);
        let issued = Utc::now() - Duration::hours(25);
        let token = tokens.issue_at(1, "bob", Role::User, issued).unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_expires_exactly_at_exp() {
        let tokens = TokenService::new(SECRET);
        let issued = Utc::now();
        let token = tokens.issue_at(1, "bob", Role::User, issued).unwrap();
        let at_exp = issued + Duration::hours(TOKEN_TTL_HOURS);
        assert_eq!(tokens.verify_at(&token, at_exp), Err(TokenError::Expired));
        let just_before = at_exp - Duration::seconds(1);
        assert!(tokens.verify_at(&token, just_before).is_ok());
    }

    #[test]
    fn other_secret_is_invalid_signature() {
        let ours = TokenService::new(SECRET);
        let theirs = TokenService::new("another-secret-that-is-long-enough!!");
        let token = theirs.issue(1, "mallory", Role::Admin).unwrap();
        assert_eq!(ours.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let tokens = TokenService::new(SECRET);
        let now = Utc::now();
        let claims = Claims {
            id: 1,
            username: "mallory".into(),
            role: Role::Admin,
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = TokenService::new(SECRET);
        assert_eq!(tokens.verify("not.a.jwt"), Err(TokenError::Malformed));
        assert_eq!(tokens.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn two_issues_differ_but_share_identity() {
        let tokens = TokenService::new(SECRET);
        let now = Utc::now();
        let t1 = tokens.issue_at(7, "bob", Role::User, now).unwrap();
        let t2 = tokens
            .issue_at(7, "bob", Role::User, now + Duration::seconds(1))
            .unwrap();
        assert_ne!(t1, t2);
        let (c1, c2) = (tokens.verify(&t1).unwrap(), tokens.verify(&t2).unwrap());
        assert_eq!((c1.id, c1.username, c1.role), (c2.id, c2.username, c2.role));
    }
}
