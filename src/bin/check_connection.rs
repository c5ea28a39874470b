//! Connectivity check for the `api_keys` table.
//!
//! Connects with `DATABASE_URL`, counts the rows in `api_keys` and reads a
//! few of them. Exits non-zero when anything fails.
//!
//! ```text
//! cargo run --bin check-connection
//! ```

use anyhow::{Context, bail};
use api_key_admin::{
    config::Config,
    db,
    store::{PgApiKeyStore, StoreError},
};

/// PostgreSQL `undefined_table`.
const PG_UNDEFINED_TABLE: &str = "42P01";

const SAMPLE_LIMIT: i64 = 5;

fn is_missing_table(err: &StoreError) -> bool {
    match err {
        StoreError::Database(source) => source
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == PG_UNDEFINED_TABLE),
        StoreError::MalformedId(_) => false,
    }
}

/// Count and sample the table, printing what was found.
async fn check(store: &PgApiKeyStore) -> anyhow::Result<()> {
    let count = match store.count().await {
        Ok(count) => count,
        Err(err) if is_missing_table(&err) => bail!(
            "Table 'api_keys' does not exist. \
             Run the server once to apply migrations, or apply migrations/ manually."
        ),
        Err(err) => return Err(err).context("Connection test failed"),
    };

    println!("Connection successful, table 'api_keys' exists.");
    println!("Current API key count: {count}");

    let records = store
        .sample(SAMPLE_LIMIT)
        .await
        .context("Query test failed")?;

    println!("Query test successful, read {} API key(s):", records.len());
    for record in records {
        println!("  {}  {}  {}", record.id, record.created_at, record.name);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let database_url = config.database_url()?;

    println!("Testing database connection...");

    let pool = db::create_pool(database_url, 1).await?;
    let store = PgApiKeyStore::new(pool);

    let result = check(&store).await;
    store.pool().close().await;

    result
}
