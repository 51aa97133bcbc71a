//! SeaORM-backed credential store.
//!
//! Uniqueness of usernames and token keys is enforced by unique indexes; the
//! driver's unique-violation error is translated to `StoreError::Conflict`.

use async_trait::async_trait;
use sea_orm::sqlx::{self, error::ErrorKind};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, RuntimeErr, SqlErr,
};
use tracing::debug;

use super::entities::token::{self, ActiveModel as TokenActiveModel, Entity as TokenEntity};
use super::entities::user::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use domain::{CredentialStore, StoreError, StoreResult, Token, User, ENTITY_TOKEN, ENTITY_USER};

/// Concrete implementation of CredentialStore over a SeaORM connection
pub struct SqlCredentialStore {
    db: DatabaseConnection,
}

impl SqlCredentialStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

const UNIQUE_VIOLATION: &str = "23505";

/// True for a unique-constraint violation, by driver classification or by
/// SQLSTATE 23505.
fn is_unique_violation(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }

    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db_err)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db_err))) => {
            matches!(db_err.kind(), ErrorKind::UniqueViolation)
                || db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
        }
        _ => false,
    }
}

/// Map an insert failure, recognising unique-constraint violations.
fn insert_error(err: DbErr, entity: &str) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Conflict(entity.to_string())
    } else {
        StoreError::backend(err.to_string())
    }
}

fn query_error(err: DbErr) -> StoreError {
    StoreError::backend(err.to_string())
}

#[async_trait]
impl CredentialStore for SqlCredentialStore {
    async fn add_user(&self, user: User) -> StoreResult<()> {
        UserEntity::insert(UserActiveModel::from(user))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| insert_error(e, ENTITY_USER))?;
        Ok(())
    }

    async fn add_token(&self, token: Token) -> StoreResult<()> {
        TokenEntity::insert(TokenActiveModel::from(token))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| insert_error(e, ENTITY_TOKEN))?;
        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        debug!("Looking up user by username");
        UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_error)?
            .map(User::from)
            .ok_or_else(|| StoreError::NotFound(ENTITY_USER.to_string()))
    }

    async fn get_token_by_key(&self, key: &str) -> StoreResult<Token> {
        TokenEntity::find()
            .filter(token::Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(query_error)?
            .map(Token::from)
            .ok_or_else(|| StoreError::NotFound(ENTITY_TOKEN.to_string()))
    }
}
