//! Application state for dependency injection.

use std::sync::Arc;

use crate::infra::Database;
use crate::service::IdentityService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityService>,
    /// `None` when serving from the in-memory store.
    pub database: Option<Database>,
}

impl AppState {
    /// Create new app state.
    pub fn new(identity: Arc<dyn IdentityService>, database: Option<Database>) -> Self {
        Self { identity, database }
    }
}
