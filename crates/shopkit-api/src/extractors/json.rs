//! JSON body extractor that runs `validator` rules before the handler.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use validator::Validate;

use shopkit_core::error::AppError;

use crate::error::{ApiError, validation_response};

/// Like [`Json`], but rejects malformed or invalid bodies with the 400
/// error envelope.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ApiError::from(AppError::validation(rejection.body_text())).into_response()
            })?;
        value.validate().map_err(|errors| validation_response(&errors))?;
        Ok(ValidatedJson(value))
    }
}
