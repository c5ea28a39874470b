//! API key record service.
//!
//! Validates caller input before anything reaches the store, then maps store
//! outcomes (found, absent, malformed id, persistence failure) onto `AppError`.
//! HTTP handlers are thin adapters over these functions.

use crate::{
    error::AppError,
    models::api_key::{ApiKeyPayload, ApiKeyRecord},
    store::ApiKeyStore,
};

/// Values that show up in place of a real id when a path parameter fails to bind.
const SENTINEL_IDS: &[&str] = &["undefined", "null", "[id]", "{id}", ":id"];

/// Reject empty and sentinel ids before they are forwarded to the store.
pub fn validate_id(id: &str) -> Result<&str, AppError> {
    let trimmed = id.trim();

    if trimmed.is_empty() || SENTINEL_IDS.contains(&trimmed) {
        tracing::warn!(id, "Rejected placeholder API key id");
        return Err(AppError::invalid_request("API key ID is required"));
    }

    Ok(id)
}

pub async fn list_api_keys(store: &dyn ApiKeyStore) -> Result<Vec<ApiKeyRecord>, AppError> {
    store
        .list_all()
        .await
        .map_err(AppError::from_store("Failed to fetch API keys"))
}

pub async fn get_api_key(store: &dyn ApiKeyStore, id: &str) -> Result<ApiKeyRecord, AppError> {
    let id = validate_id(id)?;

    store
        .get_by_id(id)
        .await
        .map_err(AppError::from_store("Failed to fetch API key"))?
        .ok_or(AppError::NotFound)
}

pub async fn create_api_key(
    store: &dyn ApiKeyStore,
    payload: ApiKeyPayload,
) -> Result<ApiKeyRecord, AppError> {
    let fields = payload
        .into_fields()
        .ok_or_else(|| AppError::invalid_request("Name and key are required"))?;

    let record = store
        .create(&fields.name, &fields.key)
        .await
        .map_err(AppError::from_store_with_details("Failed to create API key"))?;

    tracing::info!(id = %record.id, name = %record.name, "API key created");

    Ok(record)
}

pub async fn update_api_key(
    store: &dyn ApiKeyStore,
    id: &str,
    payload: ApiKeyPayload,
) -> Result<ApiKeyRecord, AppError> {
    let id = validate_id(id)?;
    let fields = payload
        .into_fields()
        .ok_or_else(|| AppError::invalid_request("Name and key are required"))?;

    let record = store
        .update(id, &fields.name, &fields.key)
        .await
        .map_err(AppError::from_store_with_details("Failed to update API key"))?
        .ok_or(AppError::NotFound)?;

    tracing::info!(id = %record.id, "API key updated");

    Ok(record)
}

/// Delete is idempotent: an id with no matching row still succeeds.
pub async fn delete_api_key(store: &dyn ApiKeyStore, id: &str) -> Result<(), AppError> {
    let id = validate_id(id)?;

    store
        .delete_by_id(id)
        .await
        .map_err(AppError::from_store_with_details("Failed to delete API key"))?;

    tracing::info!(id, "API key deleted");

    Ok(())
}
