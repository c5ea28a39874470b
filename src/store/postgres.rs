//! PostgreSQL-backed record store.

use async_trait::async_trait;

use super::{ApiKeyStore, StoreError, parse_id};
use crate::{
    db::DbPool,
    models::api_key::{ApiKeyRecord, ApiKeyRow},
};

/// Record store over the `api_keys` table.
///
/// The pool is injected at construction; cloning the store shares the pool.
#[derive(Debug, Clone)]
pub struct PgApiKeyStore {
    pool: DbPool,
}

impl PgApiKeyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Number of rows in `api_keys`.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM api_keys")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Up to `limit` records, newest first.
    pub async fn sample(&self, limit: i64) -> Result<Vec<ApiKeyRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, name, key, created_at
            FROM api_keys
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ApiKeyStore for PgApiKeyStore {
    async fn list_all(&self) -> Result<Vec<ApiKeyRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, name, key, created_at
            FROM api_keys
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ApiKeyRecord>, StoreError> {
        let id = parse_id(id)?;

        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, name, key, created_at
            FROM api_keys
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, name: &str, key: &str) -> Result<ApiKeyRecord, StoreError> {
        // id and created_at come from column defaults
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            INSERT INTO api_keys (name, key)
            VALUES ($1, $2)
            RETURNING id, name, key, created_at
            "#,
        )
        .bind(name)
        .bind(key)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = %row.id, "API key record inserted");

        Ok(row.into())
    }

    async fn update(
        &self,
        id: &str,
        name: &str,
        key: &str,
    ) -> Result<Option<ApiKeyRecord>, StoreError> {
        let id = parse_id(id)?;

        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            UPDATE api_keys
            SET name = $2, key = $3
            WHERE id = $1
            RETURNING id, name, key, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;

        let deleted = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!(%id, deleted, "API key delete executed");

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// These run against the database in `DATABASE_URL` and return early when
/// it is not configured.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, db};

    async fn test_store() -> Option<PgApiKeyStore> {
        let config = Config::from_env().ok()?;
        let Ok(url) = config.database_url() else {
            eprintln!("DATABASE_URL not set, skipping PostgreSQL store test");
            return None;
        };

        let pool = db::create_pool(url, 2).await.unwrap();
        db::run_migrations(&pool).await.unwrap();

        Some(PgApiKeyStore::new(pool))
    }

    #[tokio::test]
    async fn record_lifecycle_against_postgres() {
        let Some(store) = test_store().await else {
            return;
        };

        let created = store.create("pg-lifecycle", "sk_abc").await.unwrap();
        let id = created.id.to_string();

        let fetched = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let updated = store
            .update(&id, "pg-lifecycle-2", "sk_def")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "pg-lifecycle-2");
        assert_eq!(updated.key, "sk_def");
        assert_eq!(updated.created_at, created.created_at);

        store.delete_by_id(&id).await.unwrap();
        assert!(store.get_by_id(&id).await.unwrap().is_none());
        assert!(store.update(&id, "n", "k").await.unwrap().is_none());

        // Second delete of the same id still succeeds
        store.delete_by_id(&id).await.unwrap();
    }

    #[tokio::test]
    async fn list_orders_newest_first_against_postgres() {
        let Some(store) = test_store().await else {
            return;
        };

        let older = store.create("pg-older", "k1").await.unwrap();
        let newer = store.create("pg-newer", "k2").await.unwrap();

        let listed = store.list_all().await.unwrap();
        let position = |id: uuid::Uuid| listed.iter().position(|r| r.id == id).unwrap();
        assert!(position(newer.id) < position(older.id));

        assert!(store.count().await.unwrap() >= 2);
        assert_eq!(store.sample(1).await.unwrap().len(), 1);

        store.delete_by_id(&older.id.to_string()).await.unwrap();
        store.delete_by_id(&newer.id.to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_uuid_text_maps_to_malformed_id() {
        let Some(store) = test_store().await else {
            return;
        };

        assert!(matches!(
            store.get_by_id("not-a-uuid").await,
            Err(StoreError::MalformedId(_))
        ));

        // Cast failure inside PostgreSQL reports 22P02
        let err = sqlx::query("SELECT $1::text::uuid")
            .bind("not-a-uuid")
            .fetch_one(store.pool())
            .await
            .map_err(StoreError::from)
            .unwrap_err();
        assert!(matches!(err, StoreError::MalformedId(_)));
    }
}
