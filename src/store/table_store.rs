//! # Table Store
//!
//! Generic CRUD against the single table bound to an API key.
//!
//! Every table has the fixed schema `(id INTEGER PRIMARY KEY, data TEXT)`
//! and is created lazily the first time a key touches it.
//!
//! ## Invariants
//! - Statement text only ever interpolates a registry-approved [`TableName`]
//! - All data values are bound parameters
//! - No state is cached between calls; the database owns every row

use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::auth::TableName;

use super::errors::{StoreError, StoreResult};

/// One stored row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Row {
    pub id: i64,
    pub data: Option<String>,
}

/// Result of a fetch-all
#[derive(Debug, Clone)]
pub struct FetchAll {
    pub rows: Vec<Row>,
    /// True when the probe failed and the table was created by this call
    pub created: bool,
    /// Time spent in the final select
    pub duration: Duration,
}

/// SQLite-backed store for key-bound tables
#[derive(Debug, Clone)]
pub struct TableStore {
    pool: SqlitePool,
}

impl TableStore {
    /// Open (creating if missing) the database file at `path`
    pub async fn open(path: impl AsRef<Path>, max_connections: u32) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Directory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(opts)
            .await?;

        tracing::info!(path = %path.display(), max_connections, "table store opened");

        Ok(Self { pool })
    }

    /// Private in-memory database, mainly for tests
    pub async fn in_memory() -> StoreResult<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // Each connection to :memory: is its own database, so pin to one
        // connection and never recycle it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;

        Ok(Self { pool })
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Return every row of `table`, creating the table if it does not exist.
    ///
    /// A failed probe is taken to mean the table is missing; the failure is
    /// logged and swallowed. The final select is not guarded: its errors go
    /// to the caller.
    pub async fn fetch_all(&self, table: &TableName) -> StoreResult<FetchAll> {
        let probe = format!("SELECT * FROM {} LIMIT 1", table.quoted());
        let created = match sqlx::query(&probe).fetch_optional(&self.pool).await {
            Ok(_) => false,
            Err(e) => {
                tracing::warn!(table = %table, error = %e, "table probe failed, creating table");
                self.ensure_table(table).await?;
                true
            }
        };

        let started = Instant::now();
        let select = format!("SELECT * FROM {}", table.quoted());
        let rows = sqlx::query_as::<_, Row>(&select)
            .fetch_all(&self.pool)
            .await?;

        Ok(FetchAll {
            rows,
            created,
            duration: started.elapsed(),
        })
    }

    /// Insert `data` as a new row, returning the assigned id.
    ///
    /// The conflict clause only fires if a caller-supplied id collides; ids
    /// are always auto-assigned here, so every call inserts.
    pub async fn upsert(&self, table: &TableName, data: &str) -> StoreResult<i64> {
        self.ensure_table(table).await?;

        let sql = format!(
            "INSERT INTO {} (data) VALUES (?1) ON CONFLICT (id) DO UPDATE SET data = excluded.data",
            table.quoted()
        );
        let result = sqlx::query(&sql).bind(data).execute(&self.pool).await?;

        Ok(result.last_insert_rowid())
    }

    /// Delete the row with `id`, returning the number of rows removed
    pub async fn delete(&self, table: &TableName, id: i64) -> StoreResult<u64> {
        self.ensure_table(table).await?;

        let sql = format!("DELETE FROM {} WHERE id = ?1", table.quoted());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Create `table` with the fixed schema if absent
    pub async fn ensure_table(&self, table: &TableName) -> StoreResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY, data TEXT)",
            table.quoted()
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Whether `table` currently exists
    pub async fn table_exists(&self, table: &str) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ApiKeyEntry, KeyRegistry};

    fn notes() -> TableName {
        KeyRegistry::from_entries(vec![ApiKeyEntry::new("abc", "notes")])
            .unwrap()
            .lookup("abc")
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_all_creates_missing_table() {
        let store = TableStore::in_memory().await.unwrap();
        let table = notes();

        assert!(!store.table_exists("notes").await.unwrap());

        let result = store.fetch_all(&table).await.unwrap();
        assert!(result.created);
        assert!(result.rows.is_empty());
        assert!(store.table_exists("notes").await.unwrap());

        let again = store.fetch_all(&table).await.unwrap();
        assert!(!again.created);
    }

    #[tokio::test]
    async fn test_upsert_always_inserts() {
        let store = TableStore::in_memory().await.unwrap();
        let table = notes();

        let first = store.upsert(&table, "hello").await.unwrap();
        let second = store.upsert(&table, "hello").await.unwrap();
        assert_ne!(first, second);

        let rows = store.fetch_all(&table).await.unwrap().rows;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.data.as_deref() == Some("hello")));
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let store = TableStore::in_memory().await.unwrap();
        let table = notes();

        let keep = store.upsert(&table, "keep").await.unwrap();
        let gone = store.upsert(&table, "gone").await.unwrap();

        assert_eq!(store.delete(&table, gone).await.unwrap(), 1);
        assert_eq!(store.delete(&table, gone).await.unwrap(), 0);

        let rows = store.fetch_all(&table).await.unwrap().rows;
        assert_eq!(
            rows,
            vec![Row {
                id: keep,
                data: Some("keep".to_string())
            }]
        );
    }

    #[tokio::test]
    async fn test_data_is_bound_not_interpolated() {
        let store = TableStore::in_memory().await.unwrap();
        let table = notes();

        let payload = "'); DROP TABLE notes; --";
        store.upsert(&table, payload).await.unwrap();

        let rows = store.fetch_all(&table).await.unwrap().rows;
        assert_eq!(rows[0].data.as_deref(), Some(payload));
    }
}
