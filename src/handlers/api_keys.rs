//! API key record HTTP handlers.
//!
//! This module implements the record endpoints:
//! - GET /records - List all records, newest first
//! - GET /records/{id} - Get record by ID
//! - POST /records - Create record
//! - PUT /records/{id} - Update name and key
//! - DELETE /records/{id} - Delete record
//!
//! `/records/` (empty id) is routed to the same handlers and rejected with 400.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    error::AppError,
    models::api_key::{ApiKeyPayload, ApiKeyRecord},
    services::api_key_service,
    state::AppState,
};

/// Response body for a completed delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Unwrap the `{id}` path segment.
///
/// A missing segment (`/records/`) or one that fails to decode is reported
/// the same way as a placeholder id.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::warn!(reason = %rejection.body_text(), "Rejected unusable API key id");
            Err(AppError::InvalidRequest {
                message: "API key ID is required".to_string(),
                details: Some(rejection.body_text()),
            })
        }
    }
}

/// Unwrap a JSON body, reporting parse failures in the service's error shape.
fn json_body(body: Result<Json<ApiKeyPayload>, JsonRejection>) -> Result<ApiKeyPayload, AppError> {
    match body {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => Err(AppError::InvalidRequest {
            message: "Invalid request body".to_string(),
            details: Some(rejection.body_text()),
        }),
    }
}

/// List all API keys.
///
/// # Response
///
/// - **Success (200 OK)**: array of records, newest first (may be empty)
/// - **Error (500)**: store failure
pub async fn list_api_keys(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApiKeyRecord>>, AppError> {
    let records = api_key_service::list_api_keys(state.store.as_ref()).await?;

    Ok(Json(records))
}

/// Get a single API key.
///
/// # Response
///
/// - **Success (200 OK)**: the record
/// - **Error (400)**: placeholder or malformed id
/// - **Error (404)**: no record with this id
/// - **Error (500)**: store failure
pub async fn get_api_key(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiKeyRecord>, AppError> {
    let id = path_id(path)?;
    let record = api_key_service::get_api_key(state.store.as_ref(), &id).await?;

    Ok(Json(record))
}

/// Create a new API key.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "production",
///   "key": "sk_live_abc123"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the stored record with generated `id` and `createdAt`
/// - **Error (400)**: missing `name` or `key`
/// - **Error (500)**: store failure, with `details`
pub async fn create_api_key(
    State(state): State<AppState>,
    body: Result<Json<ApiKeyPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(body)?;
    let record = api_key_service::create_api_key(state.store.as_ref(), payload).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Replace the name and key of an existing API key.
///
/// # Response
///
/// - **Success (200 OK)**: the updated record
/// - **Error (400)**: placeholder or malformed id, missing fields
/// - **Error (404)**: no record with this id
/// - **Error (500)**: store failure, with `details`
pub async fn update_api_key(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<ApiKeyPayload>, JsonRejection>,
) -> Result<Json<ApiKeyRecord>, AppError> {
    // The id is checked before the body is looked at
    let id = path_id(path)?;
    api_key_service::validate_id(&id)?;
    let payload = json_body(body)?;
    let record = api_key_service::update_api_key(state.store.as_ref(), &id, payload).await?;

    Ok(Json(record))
}

/// Delete an API key.
///
/// Returns 200 `{"success": true}` whether or not a row existed.
pub async fn delete_api_key(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = path_id(path)?;
    api_key_service::delete_api_key(state.store.as_ref(), &id).await?;

    Ok(Json(DeleteResponse { success: true }))
}
