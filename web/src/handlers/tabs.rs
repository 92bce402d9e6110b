//! Tab CRUD endpoints, all mounted on the collection path.
//!
//! | Method   | Success                                            |
//! |----------|----------------------------------------------------|
//! | `GET`    | 200, array of tabs with `username`                 |
//! | `POST`   | 201, `{"message": "New tab created"}`              |
//! | `PATCH`  | 200, JSON string `"'<title>' updated"`             |
//! | `DELETE` | 200, JSON string `"tab '<title>' with ID <id> deleted"` |
//!
//! Ids travel in the body, not the path.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabs_core::TabWithUsername;
use tabs_core::service::{CreateTab, UpdateTab, parse_tab_id};

/// Body of `POST /tabs`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTabRequest {
    /// Owner id, a UUID string
    pub user: Option<String>,
    /// Title, unique across tabs
    pub title: Option<String>,
    /// Body text
    pub text: Option<String>,
}

/// Body of `PATCH /tabs`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTabRequest {
    /// Tab id
    pub id: Option<String>,
    /// Owner id
    pub user: Option<String>,
    /// Title
    pub title: Option<String>,
    /// Body text
    pub text: Option<String>,
    /// Must be a JSON boolean; anything else counts as missing.
    pub completed: Option<Value>,
}

/// Body of `DELETE /tabs`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTabRequest {
    /// Tab id
    pub id: Option<String>,
}

/// Confirmation body for a created tab.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// `GET /tabs`: every tab in ticket order, with its owner's username.
///
/// # Errors
///
/// - 400 `No tabs found` when there are none
/// - 500 when the store cannot be read
pub async fn list_tabs(
    State(state): State<AppState>,
) -> Result<Json<Vec<TabWithUsername>>, AppError> {
    let tabs = state.service.list().await?;
    Ok(Json(tabs))
}

/// `POST /tabs`: create a tab.
///
/// `user` must be a UUID string.
///
/// # Errors
///
/// - 400 `All fields are required` (or a malformed user id)
/// - 409 `Duplicate tab title`
/// - 400 `Invalid tab data received` when the write fails
pub async fn create_tab(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateTabRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let command = CreateTab::parse(request.user, request.title, request.text)?;
    state.service.create(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "New tab created".to_string(),
        }),
    ))
}

/// `PATCH /tabs`: replace a tab's mutable fields.
///
/// # Errors
///
/// - 400 `All fields are required` (or a malformed id)
/// - 400 `tab not found`
/// - 409 `Duplicate tab title`
pub async fn update_tab(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateTabRequest>,
) -> Result<Json<String>, AppError> {
    let completed = request.completed.as_ref().and_then(Value::as_bool);
    let command = UpdateTab::parse(
        request.id,
        request.user,
        request.title,
        request.text,
        completed,
    )?;

    let tab = state.service.update(command).await?;
    Ok(Json(format!("'{}' updated", tab.title)))
}

/// `DELETE /tabs`: remove a tab.
///
/// # Errors
///
/// - 400 `tab ID required` (or a malformed id)
/// - 400 `tab not found`
pub async fn delete_tab(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<DeleteTabRequest>,
) -> Result<Json<String>, AppError> {
    let id = parse_tab_id(request.id)?;
    let tab = state.service.delete(id).await?;
    Ok(Json(format!("tab '{}' with ID {} deleted", tab.title, tab.id)))
}
