//! Self-contained signed session tokens.
//!
//! HS256 JWTs built with `jsonwebtoken`. The claims carry the identity plus
//! `iat`/`exp` in unix seconds. There is no server-side session table and no
//! revocation: a token stays valid until `exp` as long as the signing secret is
//! unchanged.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::principal::Identity;

/// Seven days.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Process-wide signing secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSecret(Vec<u8>);

impl SessionSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self { Self(bytes.into()) }
    pub fn as_bytes(&self) -> &[u8] { &self.0 }
}

impl std::fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionSecret(<{} bytes redacted>)", self.0.len())
    }
}

#[derive(Debug, Error)]
#[error("session token could not be signed: {0}")]
pub struct TokenError(#[from] jsonwebtoken::errors::Error);

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: i64,
    username: String,
    is_admin: bool,
    iat: i64,
    exp: i64,
}

/// Why a token was rejected. Only ever logged; callers see `None`.
#[derive(Debug)]
enum Rejection {
    Signature,
    Algorithm,
    Malformed(#[allow(dead_code)] ErrorKind),
    Expired,
}

impl From<jsonwebtoken::errors::Error> for Rejection {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.into_kind() {
            ErrorKind::InvalidSignature => Rejection::Signature,
            ErrorKind::InvalidAlgorithm => Rejection::Algorithm,
            kind => Rejection::Malformed(kind),
        }
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    secret: SessionSecret,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: SessionSecret) -> Self {
        // Expiry is checked against the caller's clock in `decode`, strictly `now < exp`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            secret,
            validation,
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (unix seconds).
    pub fn issue_at(&self, identity: &Identity, now: i64) -> Result<String, TokenError> {
        let claims = Claims {
            user_id: identity.user_id,
            username: identity.username.clone(),
            is_admin: identity.is_admin,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = identity.user_id, exp = claims.exp, "session token issued");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Option<Identity> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as if the current time were `now`. Malformed, forged and
    /// expired tokens all come back as `None`.
    pub fn verify_at(&self, token: &str, now: i64) -> Option<Identity> {
        match self.decode(token, now) {
            Ok(identity) => Some(identity),
            Err(reason) => {
                debug!(?reason, "session token rejected");
                None
            }
        }
    }

    fn decode(&self, token: &str, now: i64) -> Result<Identity, Rejection> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?.claims;
        if now >= claims.exp {
            return Err(Rejection::Expired);
        }
        Ok(Identity { user_id: claims.user_id, username: claims.username, is_admin: claims.is_admin })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").field("secret", &self.secret).field("ttl_secs", &TOKEN_TTL_SECS).finish()
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod token_tests;
