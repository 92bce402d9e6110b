//! Error types for web handlers.
//!
//! [`AppError`] bridges [`TabError`] and HTTP responses. Every failure is
//! rendered as a JSON body `{ "code": ..., "message": ... }`.
//!
//! | `TabError`   | Status | Code                    |
//! |--------------|--------|-------------------------|
//! | `Validation` | 400    | `BAD_REQUEST`           |
//! | `NotFound`   | 400    | `NOT_FOUND`             |
//! | `Conflict`   | 409    | `CONFLICT`              |
//! | `Write`      | 400    | `INVALID_TAB_DATA`      |
//! | `Read`       | 500    | `INTERNAL_SERVER_ERROR` |
//!
//! A missing tab answers 400, not 404: clients of this API already branch on
//! 400 for "no such tab".

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use tabs_core::TabError;

/// Message returned when the store rejects a write.
pub const INVALID_TAB_DATA: &str = "Invalid tab data received";

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<Vec<TabWithUsername>>, AppError> {
///     let tabs = state.service.list().await?;
///     Ok(Json(tabs))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Attach the underlying cause, logged but never sent to the client.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Create a 400 error for a tab (or tab list) that does not exist.
    #[must_use]
    pub fn not_found_as_bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "NOT_FOUND")
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message, "CONFLICT")
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// HTTP status this error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match (&self.source, self.status.is_server_error()) {
            (Some(source), true) => tracing::error!(
                status = %self.status,
                code = self.code,
                error = %source,
                "Internal server error"
            ),
            (Some(source), false) => tracing::warn!(
                status = %self.status,
                code = self.code,
                error = %source,
                "Request rejected"
            ),
            (None, true) => tracing::error!(
                status = %self.status,
                code = self.code,
                message = %self.message,
                "Internal server error"
            ),
            (None, false) => {}
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<TabError> for AppError {
    fn from(err: TabError) -> Self {
        match err {
            TabError::Validation(message) => Self::bad_request(message),
            TabError::NotFound(message) => Self::not_found_as_bad_request(message),
            TabError::Conflict(message) => Self::conflict(message),
            TabError::Write(source) => {
                Self::new(StatusCode::BAD_REQUEST, INVALID_TAB_DATA, "INVALID_TAB_DATA")
                    .with_source(source.into())
            }
            TabError::Read(source) => {
                Self::internal("An internal error occurred").with_source(source.into())
            }
        }
    }
}
