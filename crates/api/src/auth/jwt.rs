//! Access and refresh tokens.
//!
//! Access tokens are short-lived HS256 JWTs carrying the account id and role.
//! Refresh tokens are opaque; the server keeps only their SHA-256 digest in
//! `user_sessions`.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rallypoint_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::env_or;

/// Payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account id.
    pub sub: DbId,
    /// Account role (`"user"`, `"enterprise"` or `"admin"`).
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required), `JWT_ACCESS_EXPIRY_MINS` (15) and
    /// `JWT_REFRESH_EXPIRY_DAYS` (7).
    ///
    /// # Panics
    ///
    /// On a missing or empty secret, or a lifetime that is not an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set to a non-empty value");

        Self {
            secret,
            access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", 15),
            refresh_token_expiry_days: env_or("JWT_REFRESH_EXPIRY_DAYS", 7),
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// When a refresh token issued now stops being accepted.
    pub fn refresh_expires_at(&self) -> Timestamp {
        Utc::now() + Duration::days(self.refresh_token_expiry_days)
    }

    /// Sign an access token for an account.
    pub fn issue(&self, user_id: DbId, role: &str) -> Result<String, JwtError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role: role.to_owned(),
            exp: iat + self.access_ttl_secs(),
            iat,
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key())
    }

    /// Check signature and expiry, returning the claims of a valid token.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key(), &Validation::default()).map(|t| t.claims)
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// A freshly minted refresh token.
#[derive(Debug)]
pub struct RefreshToken {
    /// Returned to the client once.
    pub plaintext: String,
    /// Stored in `user_sessions.refresh_token_hash`.
    pub hash: String,
}

impl RefreshToken {
    pub fn generate() -> Self {
        let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let hash = Self::digest(&plaintext);
        Self { plaintext, hash }
    }

    /// Hex SHA-256 of a presented token, for lookup.
    pub fn digest(token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let config = config("rallypoint-test-secret");
        let token = config.issue(7, "enterprise").unwrap();

        let claims = config.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, "enterprise");
        assert_eq!(claims.exp - claims.iat, config.access_ttl_secs());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config("rallypoint-test-secret");
        // Well past the default 60-second leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "user".to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::default(), &claims, &config.encoding_key()).unwrap();

        assert!(config.verify(&token).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = config("alpha").issue(1, "user").unwrap();
        assert!(config("bravo").verify(&token).is_err());
    }

    #[test]
    fn refresh_tokens_are_unique_and_hash_stably() {
        let a = RefreshToken::generate();
        let b = RefreshToken::generate();
        assert_ne!(a.plaintext, b.plaintext);
        assert_eq!(RefreshToken::digest(&a.plaintext), a.hash);
        assert_eq!(a.hash.len(), 64);
    }

    #[test]
    fn refresh_expiry_is_in_the_future() {
        let expires = config("s").refresh_expires_at();
        assert!(expires > Utc::now() + Duration::days(6));
    }
}
