//! Identity service - registration, login and token validation.
//!
//! Composes the Password value object, the TokenIssuer and an injected
//! CredentialStore. Hashing and key generation are explicit steps taken here
//! before anything is handed to the store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use domain::{
    CredentialStore, DomainError, DomainResult, Password, StoreError, Token, TokenIssuer, User,
    ENTITY_TOKEN, MIN_USERNAME_LENGTH,
};

/// Verified against when the username is unknown, so a miss costs the same
/// Argon2 work as a wrong password.
static DUMMY_PASSWORD: Lazy<Password> = Lazy::new(|| {
    Password::new("identity-service-timing-equaliser")
        .unwrap_or_else(|_| Password::from_hash(String::new()))
});

/// Identity service trait for dependency injection.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Register a new user. No token is issued.
    async fn register(&self, username: String, password: String) -> DomainResult<User>;

    /// Check credentials and issue a fresh bearer token
    async fn login(&self, username: String, password: String) -> DomainResult<Token>;

    /// Look up a token and confirm it has not expired
    async fn validate_token(&self, key: &str) -> DomainResult<Token>;
}

/// Concrete implementation of IdentityService over a credential store.
pub struct IdentityManager {
    store: Arc<dyn CredentialStore>,
    issuer: TokenIssuer,
}

impl IdentityManager {
    /// Create new identity service instance
    pub fn new(store: Arc<dyn CredentialStore>, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }
}

/// Reject absent username or password.
fn validate_credentials(username: &str, password: &str) -> DomainResult<()> {
    if username.trim().len() < MIN_USERNAME_LENGTH {
        return Err(DomainError::validation("Username is required"));
    }
    if password.is_empty() {
        return Err(DomainError::validation("Password is required"));
    }
    Ok(())
}

#[async_trait]
impl IdentityService for IdentityManager {
    async fn register(&self, username: String, password: String) -> DomainResult<User> {
        validate_credentials(&username, &password)?;

        let user = User::new(username, Password::new(&password)?);
        self.store.add_user(user.clone()).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, username: String, password: String) -> DomainResult<Token> {
        validate_credentials(&username, &password)?;

        let user = match self.store.get_user_by_username(&username).await {
            Ok(user) => Some(user),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        let user = match user {
            Some(user) if user.password().verify(&password) => user,
            Some(_) => {
                warn!("Login rejected");
                return Err(DomainError::InvalidCredentials);
            }
            None => {
                DUMMY_PASSWORD.verify(&password);
                warn!("Login rejected");
                return Err(DomainError::InvalidCredentials);
            }
        };

        let token = self.issuer.issue(user.id)?;
        self.store
            .add_token(token.clone())
            .await
            .map_err(|e| DomainError::internal(format!("Failed to persist token: {}", e)))?;

        info!(user_id = %user.id, token_id = %token.id, "Token issued");
        Ok(token)
    }

    async fn validate_token(&self, key: &str) -> DomainResult<Token> {
        if key.is_empty() {
            return Err(DomainError::not_found(ENTITY_TOKEN));
        }

        let token = self.store.get_token_by_key(key).await?;
        debug!(token_id = %token.id, "Token found");

        if !self.issuer.is_valid(&token, Utc::now()) {
            warn!(token_id = %token.id, user_id = %token.user_id, "Expired token presented");
            return Err(DomainError::TokenExpired);
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use domain::{MockCredentialStore, ENTITY_USER};
    use uuid::Uuid;

    use super::*;

    fn manager(store: MockCredentialStore) -> IdentityManager {
        IdentityManager::new(Arc::new(store), TokenIssuer::default())
    }

    fn registered_user(username: &str, password: &str) -> User {
        User::new(username, Password::new(password).unwrap())
    }

    fn stored_token(user_id: Uuid, expires_in: Duration) -> Token {
        let now = Utc::now();
        Token {
            id: Uuid::new_v4(),
            key: "stored-key".to_string(),
            user_id,
            issued_at: now - Duration::days(56) + expires_in,
            expires_at: now + expires_in,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_before_store() {
        let mut store = MockCredentialStore::new();
        store
            .expect_add_user()
            .withf(|user| {
                user.username == "alice"
                    && user.password_hash != "s3cret"
                    && user.password().verify("s3cret")
            })
            .times(1)
            .returning(|_| Ok(()));

        let user = manager(store)
            .register("alice".into(), "s3cret".into())
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "s3cret");
    }

    #[tokio::test]
    async fn test_register_rejects_missing_fields() {
        let mut store = MockCredentialStore::new();
        store.expect_add_user().never();
        let service = manager(store);

        for (username, password) in [("", "s3cret"), ("   ", "s3cret"), ("alice", "")] {
            let err = service
                .register(username.into(), password.into())
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{:?}", err);
        }
    }

    #[tokio::test]
    async fn test_register_propagates_conflict() {
        let mut store = MockCredentialStore::new();
        store
            .expect_add_user()
            .returning(|_| Err(StoreError::Conflict(ENTITY_USER.to_string())));

        let err = manager(store)
            .register("alice".into(), "s3cret".into())
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::Conflict(ENTITY_USER.to_string()));
    }

    #[tokio::test]
    async fn test_register_store_failure_is_internal() {
        let mut store = MockCredentialStore::new();
        store
            .expect_add_user()
            .returning(|_| Err(StoreError::backend("connection reset")));

        let err = manager(store)
            .register("alice".into(), "s3cret".into())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn test_login_issues_and_persists_token() {
        let user = registered_user("alice", "s3cret");
        let user_id = user.id;

        let mut store = MockCredentialStore::new();
        store
            .expect_get_user_by_username()
            .withf(|username| username == "alice")
            .returning(move |_| Ok(user.clone()));
        store
            .expect_add_token()
            .withf(move |token| token.user_id == user_id)
            .times(1)
            .returning(|_| Ok(()));

        let before = Utc::now();
        let token = manager(store)
            .login("alice".into(), "s3cret".into())
            .await
            .unwrap();

        assert_eq!(token.user_id, user_id);
        assert!(!token.key.is_empty());
        assert!(token.issued_at >= before);
        assert_eq!(token.expires_at - token.issued_at, Duration::days(56));
    }

    #[tokio::test]
    async fn test_login_unknown_user_and_wrong_password_are_indistinguishable() {
        let user = registered_user("alice", "s3cret");

        let mut store = MockCredentialStore::new();
        store
            .expect_get_user_by_username()
            .returning(move |username| {
                if username == "alice" {
                    Ok(user.clone())
                } else {
                    Err(StoreError::NotFound(ENTITY_USER.to_string()))
                }
            });
        store.expect_add_token().never();
        let service = manager(store);

        let wrong_password = service
            .login("alice".into(), "wrong".into())
            .await
            .unwrap_err();
        let unknown_user = service
            .login("mallory".into(), "s3cret".into())
            .await
            .unwrap_err();

        assert_eq!(wrong_password, DomainError::InvalidCredentials);
        assert_eq!(unknown_user, wrong_password);
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_login_rejects_missing_fields() {
        let mut store = MockCredentialStore::new();
        store.expect_get_user_by_username().never();

        let err = manager(store)
            .login("alice".into(), "".into())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_lookup_failure_is_internal() {
        let mut store = MockCredentialStore::new();
        store
            .expect_get_user_by_username()
            .returning(|_| Err(StoreError::backend("timeout")));

        let err = manager(store)
            .login("alice".into(), "s3cret".into())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn test_login_token_persist_failure_is_internal() {
        let user = registered_user("alice", "s3cret");

        let mut store = MockCredentialStore::new();
        store
            .expect_get_user_by_username()
            .returning(move |_| Ok(user.clone()));
        store
            .expect_add_token()
            .returning(|_| Err(StoreError::Conflict(ENTITY_TOKEN.to_string())));

        let err = manager(store)
            .login("alice".into(), "s3cret".into())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn test_validate_unknown_key_is_not_found() {
        let mut store = MockCredentialStore::new();
        store
            .expect_get_token_by_key()
            .returning(|_| Err(StoreError::NotFound(ENTITY_TOKEN.to_string())));

        let err = manager(store).validate_token("missing").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_validate_empty_key_skips_store() {
        let mut store = MockCredentialStore::new();
        store.expect_get_token_by_key().never();

        let err = manager(store).validate_token("").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_validate_lapsed_key_is_expired() {
        let token = stored_token(Uuid::new_v4(), Duration::seconds(-1));

        let mut store = MockCredentialStore::new();
        store
            .expect_get_token_by_key()
            .returning(move |_| Ok(token.clone()));

        let err = manager(store).validate_token("stored-key").await.unwrap_err();

        assert_eq!(err, DomainError::TokenExpired);
    }

    #[tokio::test]
    async fn test_validate_live_key_returns_token() {
        let token = stored_token(Uuid::new_v4(), Duration::hours(1));
        let expected = token.clone();

        let mut store = MockCredentialStore::new();
        store
            .expect_get_token_by_key()
            .withf(|key| key == "stored-key")
            .returning(move |_| Ok(token.clone()));

        let found = manager(store).validate_token("stored-key").await.unwrap();

        assert_eq!(found, expected);
    }
}
