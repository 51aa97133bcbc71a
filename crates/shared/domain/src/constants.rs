//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum username length requirement
pub const MIN_USERNAME_LENGTH: usize = 1;

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 1;

// =============================================================================
// Tokens
// =============================================================================

/// Default bearer token lifetime in days (8 weeks)
pub const DEFAULT_TOKEN_LIFETIME_DAYS: i64 = 56;

/// Longest configurable token lifetime in days (10 years)
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 3_650;

/// Seconds per day (for token expiration calculation)
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Random bytes behind each token key (256 bits)
pub const TOKEN_KEY_BYTES: usize = 32;

// =============================================================================
// Entity names (used in error messages)
// =============================================================================

/// User entity name
pub const ENTITY_USER: &str = "User";

/// Token entity name
pub const ENTITY_TOKEN: &str = "Token";
