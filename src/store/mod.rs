//! Record store for API keys.
//!
//! The store is the only component that addresses the `api_keys` table. It
//! translates lifecycle operations into persistence calls and reports
//! outcomes as `Option` (absent vs. found) or `StoreError`.
//!
//! Ids are accepted as raw strings. Parsing them is the store's job because
//! the identifier format is a property of the backing table.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::api_key::ApiKeyRecord;

pub mod memory;
pub mod postgres;

pub use memory::MemoryApiKeyStore;
pub use postgres::PgApiKeyStore;

/// PostgreSQL `invalid_text_representation`, raised when a value cannot be cast to the column type.
const PG_INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Failures reported by a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The id is not in the format the backing table uses.
    #[error("malformed API key id: {0}")]
    MalformedId(String),

    /// The backing table rejected or failed the operation.
    #[error("{0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let invalid_format = err
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == PG_INVALID_TEXT_REPRESENTATION);

        if invalid_format {
            StoreError::MalformedId(err.to_string())
        } else {
            StoreError::Database(err)
        }
    }
}

/// Lifecycle operations over the `api_keys` table.
///
/// Implementations hold no request-scoped state; every call is a single
/// independent exchange with the backend.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// All records, newest first. An empty table is not an error.
    async fn list_all(&self) -> Result<Vec<ApiKeyRecord>, StoreError>;

    /// The record with this id, or `None` when no row matches.
    async fn get_by_id(&self, id: &str) -> Result<Option<ApiKeyRecord>, StoreError>;

    /// Insert a record; `id` and `created_at` are assigned here.
    async fn create(&self, name: &str, key: &str) -> Result<ApiKeyRecord, StoreError>;

    /// Overwrite `name` and `key`, preserving `id` and `created_at`.
    async fn update(
        &self,
        id: &str,
        name: &str,
        key: &str,
    ) -> Result<Option<ApiKeyRecord>, StoreError>;

    /// Remove the record if it exists. Deleting an unknown id succeeds.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Parse a raw id into the table's identifier type.
pub fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))
}
