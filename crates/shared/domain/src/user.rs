//! User domain entity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::password::Password;

/// User domain entity. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id from an already hashed password.
    pub fn new(username: impl Into<String>, password: Password) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password.into_string(),
            created_at: Utc::now(),
        }
    }

    /// The stored hash as a verifiable value object.
    pub fn password(&self) -> Password {
        Password::from_hash(self.password_hash.as_str())
    }
}
