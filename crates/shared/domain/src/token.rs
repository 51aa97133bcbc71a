//! Bearer token entity and issuer.
//!
//! A token key is an opaque capability: 256 bits from the OS RNG, never
//! derived from the user or any public data. Validity is a pure function of
//! the stored expiry and the current time.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_TOKEN_LIFETIME_DAYS, MAX_TOKEN_LIFETIME_DAYS, TOKEN_KEY_BYTES};
use crate::error::{DomainError, DomainResult};

/// Bearer token domain entity. Never mutated after issue.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub id: Uuid,
    pub key: String,
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// Keys are bearer secrets
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("id", &self.id)
            .field("key", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Token {
    /// True while `now` is strictly before the expiry.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Issues tokens with a fixed lifetime.
#[derive(Debug, Clone, Copy)]
pub struct TokenIssuer {
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer whose tokens live for `lifetime_days`.
    ///
    /// Non-positive values fall back to the 8 week default; values above
    /// `MAX_TOKEN_LIFETIME_DAYS` are clamped to it.
    pub fn new(lifetime_days: i64) -> Self {
        let days = if lifetime_days > 0 {
            lifetime_days.min(MAX_TOKEN_LIFETIME_DAYS)
        } else {
            DEFAULT_TOKEN_LIFETIME_DAYS
        };

        let lifetime = Duration::try_days(days)
            .unwrap_or_else(|| Duration::weeks(DEFAULT_TOKEN_LIFETIME_DAYS / 7));
        Self { lifetime }
    }

    /// Token lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `user_id` starting now.
    pub fn issue(&self, user_id: Uuid) -> DomainResult<Token> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token for `user_id` as of `now`.
    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> DomainResult<Token> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| DomainError::internal("Token expiry out of range"))?;

        Ok(Token {
            id: Uuid::new_v4(),
            key: generate_key()?,
            user_id,
            issued_at: now,
            expires_at,
        })
    }

    /// Check a token against `now`. Pure; no side effects.
    pub fn is_valid(&self, token: &Token, now: DateTime<Utc>) -> bool {
        token.is_valid(now)
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_LIFETIME_DAYS)
    }
}

/// Generate a URL-safe random token key.
fn generate_key() -> DomainResult<String> {
    let mut bytes = [0u8; TOKEN_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| DomainError::internal(format!("Token key generation failed: {}", e)))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Token as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResponse {
    /// Opaque bearer token
    #[cfg_attr(feature = "openapi", schema(example = "Q2hhbmdlIG1lIGlmIHlvdSB3YW50IHRvIGJ1dCBrZWVwIGl0IHNlY3JldA"))]
    pub token: String,
    /// Owning user identifier
    pub user_id: Uuid,
    /// Expiry as unix seconds
    #[cfg_attr(feature = "openapi", schema(example = 1735689600))]
    pub expires_at: i64,
}

impl From<Token> for TokenResponse {
    fn from(token: Token) -> Self {
        Self {
            token: token.key,
            user_id: token.user_id,
            expires_at: token.expires_at.timestamp(),
        }
    }
}

impl From<&Token> for TokenResponse {
    fn from(token: &Token) -> Self {
        Self {
            token: token.key.clone(),
            user_id: token.user_id,
            expires_at: token.expires_at.timestamp(),
        }
    }
}
