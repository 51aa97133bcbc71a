//! JSON body extractor with field validation.
//!
//! Every rejection, whether a malformed body, a missing field or a failed
//! `#[validate]` rule, becomes `AppError::Validation` (HTTP 400).

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

const FALLBACK_MESSAGE: &str = "Validation failed";

/// Deserialized and validated request body.
pub struct ValidatedJson<T>(pub T);

/// Message of the alphabetically first failing field.
///
/// `field_errors` is a hash map, so fields are ordered by name to keep the
/// reported message stable when several fields fail at once.
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .and_then(|(_, errors)| errors.first())
        .and_then(|error| error.message.as_ref())
        .map(|message| message.to_string())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::validation(first_message(&errors)))?;

        Ok(ValidatedJson(value))
    }
}
