//! In-process credential store.
//!
//! Backs `serve --in-memory` and the test suites. Check-and-insert happens
//! under a single lock, so concurrent duplicates resolve to one winner.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use domain::{CredentialStore, StoreError, StoreResult, Token, User, ENTITY_TOKEN, ENTITY_USER};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    tokens: HashMap<String, Token>,
}

/// CredentialStore held entirely in memory. Contents die with the process.
#[derive(Default)]
pub struct MemoryCredentialStore {
    tables: Mutex<Tables>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.tables.lock().map(|t| t.users.len()).unwrap_or(0)
    }

    /// Number of stored tokens.
    pub fn token_count(&self) -> usize {
        self.tables.lock().map(|t| t.tokens.len()).unwrap_or(0)
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::backend("credential store lock poisoned"))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn add_user(&self, user: User) -> StoreResult<()> {
        let mut tables = self.tables()?;
        if tables.users.contains_key(&user.username) {
            return Err(StoreError::Conflict(ENTITY_USER.to_string()));
        }
        tables.users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn add_token(&self, token: Token) -> StoreResult<()> {
        let mut tables = self.tables()?;
        if tables.tokens.contains_key(&token.key) {
            return Err(StoreError::Conflict(ENTITY_TOKEN.to_string()));
        }
        tables.tokens.insert(token.key.clone(), token);
        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        self.tables()?
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(ENTITY_USER.to_string()))
    }

    async fn get_token_by_key(&self, key: &str) -> StoreResult<Token> {
        self.tables()?
            .tokens
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(ENTITY_TOKEN.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain::{Password, TokenIssuer};
    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn user(username: &str) -> User {
        User::new(username, Password::from_hash("$argon2id$stub"))
    }

    #[tokio::test]
    async fn test_add_and_get_user() {
        let store = MemoryCredentialStore::new();
        let alice = user("alice");

        assert_ok!(store.add_user(alice.clone()).await);

        assert_eq!(store.get_user_by_username("alice").await.unwrap(), alice);
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_usernames_are_exact_match() {
        let store = MemoryCredentialStore::new();
        assert_ok!(store.add_user(user("alice")).await);

        assert_err!(store.get_user_by_username("Alice").await);
        assert_err!(store.get_user_by_username("alice ").await);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryCredentialStore::new();
        assert_ok!(store.add_user(user("alice")).await);

        let err = store.add_user(user("alice")).await.unwrap_err();

        assert_eq!(err, StoreError::Conflict(ENTITY_USER.to_string()));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_lookups_are_not_found() {
        let store = MemoryCredentialStore::new();

        assert_eq!(
            store.get_user_by_username("ghost").await.unwrap_err(),
            StoreError::NotFound(ENTITY_USER.to_string())
        );
        assert_eq!(
            store.get_token_by_key("ghost").await.unwrap_err(),
            StoreError::NotFound(ENTITY_TOKEN.to_string())
        );
    }

    #[tokio::test]
    async fn test_tokens_by_key_and_duplicate_key_conflicts() {
        let store = MemoryCredentialStore::new();
        let token = TokenIssuer::default().issue(uuid::Uuid::new_v4()).unwrap();

        assert_ok!(store.add_token(token.clone()).await);
        assert_eq!(store.get_token_by_key(&token.key).await.unwrap(), token);

        let err = store.add_token(token).await.unwrap_err();
        assert_eq!(err, StoreError::Conflict(ENTITY_TOKEN.to_string()));
        assert_eq!(store.token_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_inserts_have_one_winner() {
        let store = Arc::new(MemoryCredentialStore::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.add_user(user("alice")).await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(StoreError::Conflict(_)) => conflicts += 1,
                Err(e) => panic!("unexpected error: {:?}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(store.user_count(), 1);
    }
}
