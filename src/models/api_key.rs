//! API-key record models.
//!
//! - `ApiKeyRow`: a row of the `api_keys` table
//! - `ApiKeyRecord`: the shape returned to API clients
//! - `ApiKeyPayload`: request body for create and update

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table with columns:
/// - `id`: Unique identifier (UUID), generated by the database
/// - `name`: Display label
/// - `key`: The key material, stored verbatim
/// - `created_at`: When the record was inserted
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ApiKeyRow {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
}

/// API key record as returned by every endpoint.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "production",
///   "key": "sk_live_abc123",
///   "createdAt": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRecord {
    pub id: Uuid,
    pub name: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
}

/// Field-for-field copy; only the timestamp is exposed under a new name.
impl From<ApiKeyRow> for ApiKeyRecord {
    fn from(row: ApiKeyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            key: row.key,
            created_at: row.created_at,
        }
    }
}

/// Request body for creating or updating an API key.
///
/// Both fields are optional at the deserialization level so that a missing
/// field is reported as `Name and key are required` instead of a generic
/// JSON error.
///
/// ```json
/// {
///   "name": "production",
///   "key": "sk_live_abc123"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeyPayload {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub key: Option<String>,
}

/// A payload whose `name` and `key` are both present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyFields {
    pub name: String,
    pub key: String,
}

impl ApiKeyPayload {
    /// Returns the fields only when both are present and non-empty.
    pub fn into_fields(self) -> Option<ApiKeyFields> {
        match (self.name, self.key) {
            (Some(name), Some(key)) if !name.is_empty() && !key.is_empty() => {
                Some(ApiKeyFields { name, key })
            }
            _ => None,
        }
    }
}
