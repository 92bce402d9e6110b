//! Request extractors.
//!
//! [`JsonBody`] replaces `axum::Json` for tab payloads. An empty body
//! deserializes to `T::default()`, so a bodiless `DELETE` reports the missing
//! field (`tab ID required`) instead of a content-type error. Malformed JSON
//! is rejected as an [`AppError`] with status 400.

use crate::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON request body whose rejections render as [`AppError`].
///
/// # Example
///
/// ```ignore
/// async fn handler(JsonBody(request): JsonBody<CreateTabRequest>) -> StatusCode {
///     StatusCode::CREATED
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {e}")))
    }
}
