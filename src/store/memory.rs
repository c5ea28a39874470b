//! In-process record store.
//!
//! Selected with `STORE_BACKEND=memory` for running the service without a
//! database. Contents are lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ApiKeyStore, StoreError, parse_id};
use crate::models::api_key::{ApiKeyRecord, ApiKeyRow};

/// Rows kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryApiKeyStore {
    rows: RwLock<Vec<ApiKeyRow>>,
}

impl MemoryApiKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyStore for MemoryApiKeyStore {
    async fn list_all(&self) -> Result<Vec<ApiKeyRecord>, StoreError> {
        let rows = self.rows.read().await;

        // Reverse first so the stable sort keeps later inserts ahead on equal timestamps
        let mut records: Vec<ApiKeyRecord> = rows.iter().rev().cloned().map(Into::into).collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ApiKeyRecord>, StoreError> {
        let id = parse_id(id)?;
        let rows = self.rows.read().await;

        Ok(rows.iter().find(|row| row.id == id).cloned().map(Into::into))
    }

    async fn create(&self, name: &str, key: &str) -> Result<ApiKeyRecord, StoreError> {
        let row = ApiKeyRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            key: key.to_string(),
            created_at: Utc::now(),
        };

        self.rows.write().await.push(row.clone());

        Ok(row.into())
    }

    async fn update(
        &self,
        id: &str,
        name: &str,
        key: &str,
    ) -> Result<Option<ApiKeyRecord>, StoreError> {
        let id = parse_id(id)?;
        let mut rows = self.rows.write().await;

        Ok(rows.iter_mut().find(|row| row.id == id).map(|row| {
            row.name = name.to_string();
            row.key = key.to_string();
            row.clone().into()
        }))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;
        self.rows.write().await.retain(|row| row.id != id);

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
