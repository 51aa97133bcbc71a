//! Identity business logic.

mod identity_service;

pub use identity_service::{IdentityManager, IdentityService};
