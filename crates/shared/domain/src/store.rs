//! Credential store contract.
//!
//! Persistence engines implement this; the identity logic depends only on
//! the trait. Implementations own username and token-key uniqueness and must
//! enforce it atomically: of two concurrent inserts with the same unique
//! value, exactly one fails with [`StoreError::Conflict`].
//!
//! [`StoreError::Conflict`]: crate::error::StoreError::Conflict

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::token::Token;
use crate::user::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Persistence for users and tokens. Insert and lookup only.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persist a new user. `Conflict` if the username is taken.
    async fn add_user(&self, user: User) -> StoreResult<()>;

    /// Persist a new token. `Conflict` if the key is taken.
    async fn add_token(&self, token: Token) -> StoreResult<()>;

    /// Look up a user by exact username. `NotFound` if absent.
    async fn get_user_by_username(&self, username: &str) -> StoreResult<User>;

    /// Look up a token by exact key. `NotFound` if absent.
    async fn get_token_by_key(&self, key: &str) -> StoreResult<Token>;
}
