//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::api::handlers::auth_handler::{LoginRequest, MessageResponse, RegisterRequest};
use domain::TokenResponse;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::auth_handler::register,
        crate::api::handlers::auth_handler::login,
        crate::api::handlers::auth_handler::validate_token,
    ),
    components(schemas(RegisterRequest, LoginRequest, MessageResponse, TokenResponse)),
    tags(
        (name = "Authentication", description = "Registration, login and token validation"),
    )
)]
pub struct ApiDoc;
