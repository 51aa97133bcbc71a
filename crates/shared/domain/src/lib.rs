//! Domain layer - Core identity entities, value objects and ports.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! password hashing, token issue and expiry, and the credential store
//! contract that persistence engines implement.

pub mod constants;
pub mod error;
pub mod password;
pub mod store;
pub mod token;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult, StoreError, StoreResult};
pub use password::Password;
pub use store::CredentialStore;
pub use token::{Token, TokenIssuer, TokenResponse};
pub use user::User;

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockCredentialStore;
