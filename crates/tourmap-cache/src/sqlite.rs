//! SQLite-based cache backend.

use async_trait::async_trait;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use tourmap_core::{CacheBackend, Result, TourError};
use tracing::{debug, instrument};

/// SQLite-based backend for listing results.
///
/// This backend stores entries in a SQLite database file, providing persistence
/// across application restarts. An optional quota caps the total size of stored
/// values in bytes; writes beyond it, and writes the database itself refuses for
/// lack of space, fail with [`TourError::CacheFull`].
#[derive(Debug)]
pub struct SqliteCache {
    conn: Mutex<Connection>,
    quota_bytes: Option<usize>,
}

fn cache_err(e: impl std::fmt::Display) -> TourError {
    TourError::Cache(e.to_string())
}

impl SqliteCache {
    /// Create a new SQLite backend at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(cache_err)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite backend.
    ///
    /// Useful for testing; data is lost when the backend is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(cache_err)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let cache = Self {
            conn: Mutex::new(conn),
            quota_bytes: None,
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Limit the total size of stored values to `quota_bytes`.
    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(cache_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(cache_err)?;

        // Files written by older builds carry an unused `written_at NOT NULL` column.
        let stale: bool = conn
            .query_row(
                "SELECT EXISTS (SELECT 1 FROM pragma_table_info('kv_store') WHERE name = 'written_at')",
                [],
                |row| row.get(0),
            )
            .map_err(cache_err)?;
        if stale {
            conn.execute("ALTER TABLE kv_store DROP COLUMN written_at", [])
                .map_err(cache_err)?;
            debug!("Dropped legacy written_at column");
        }

        debug!("SQLite cache schema initialized");
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for SqliteCache {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().map_err(cache_err)?;

        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(cache_err)
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(cache_err)?;
        let tx = conn.unchecked_transaction().map_err(cache_err)?;

        if let Some(quota) = self.quota_bytes {
            let others: i64 = tx
                .query_row(
                    "SELECT COALESCE(SUM(LENGTH(CAST(value AS BLOB))), 0)
                     FROM kv_store WHERE key != ?1",
                    params![key],
                    |row| row.get(0),
                )
                .map_err(cache_err)?;
            let needed = usize::try_from(others).unwrap_or(0) + value.len();
            if needed > quota {
                return Err(TourError::CacheFull { needed, quota });
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::DiskFull) => TourError::CacheFull {
                needed: value.len(),
                quota: self.quota_bytes.unwrap_or(0),
            },
            _ => cache_err(e),
        })?;

        tx.commit().map_err(cache_err)?;
        debug!("Stored cache value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let conn = self.conn.lock().map_err(cache_err)?;
        let deleted = conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(cache_err)?;
        Ok(deleted > 0)
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock().map_err(cache_err)?;
        let mut stmt = conn
            .prepare("SELECT key FROM kv_store WHERE substr(key, 1, ?2) = ?1 ORDER BY key")
            .map_err(cache_err)?;

        let prefix_len = i64::try_from(prefix.chars().count()).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![prefix, prefix_len], |row| row.get::<_, String>(0))
            .map_err(cache_err)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(cache_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheStore, CacheWrite};
    use std::sync::Arc;
    use tourmap_core::{BusinessRecord, Category, Contact};

    #[tokio::test]
    async fn test_sqlite_cache_initialization() {
        let cache = SqliteCache::in_memory();
        assert!(cache.is_ok());
    }

    #[test]
    fn test_sqlite_table_holds_only_key_and_value() {
        let cache = SqliteCache::in_memory().unwrap();
        let conn = cache.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM pragma_table_info('kv_store') ORDER BY cid")
            .unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(columns, vec!["key", "value"]);
    }

    #[tokio::test]
    async fn test_sqlite_upgrades_table_with_written_at() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                written_at TEXT NOT NULL
            )",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO kv_store VALUES ('map_cache_old', 'kept', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let cache = SqliteCache::from_connection(conn).unwrap();
        cache.write("map_cache_new", "fresh").await.unwrap();
        assert_eq!(
            cache.read("map_cache_old").await.unwrap().as_deref(),
            Some("kept")
        );
        assert_eq!(
            cache.read("map_cache_new").await.unwrap().as_deref(),
            Some("fresh")
        );
    }

    #[tokio::test]
    async fn test_sqlite_backend_round_trip() {
        let cache = SqliteCache::in_memory().unwrap();

        // Initially no data
        assert!(cache.read("map_cache_a").await.unwrap().is_none());

        cache.write("map_cache_a", "one").await.unwrap();
        cache.write("map_cache_a", "two").await.unwrap();
        assert_eq!(
            cache.read("map_cache_a").await.unwrap().as_deref(),
            Some("two")
        );

        assert!(cache.remove("map_cache_a").await.unwrap());
        assert!(cache.read("map_cache_a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_keys_treat_prefix_literally() {
        let cache = SqliteCache::in_memory().unwrap();
        cache.write("map_cache_1", "a").await.unwrap();
        cache.write("mapXcacheX2", "b").await.unwrap();
        cache.write("map_generator_preferences", "c").await.unwrap();

        let keys = cache.keys("map_cache_").await.unwrap();
        assert_eq!(keys, vec!["map_cache_1"]);
    }

    #[tokio::test]
    async fn test_sqlite_quota_rejects_oversized_write() {
        let cache = SqliteCache::in_memory().unwrap().with_quota(8);
        cache.write("k1", "12345").await.unwrap();

        let err = cache.write("k2", "12345").await.unwrap_err();
        assert!(err.is_cache_full());
        assert!(cache.read("k2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_store_keeps_thai_text() {
        let store = CacheStore::new(Arc::new(SqliteCache::in_memory().unwrap()));
        let mut record = BusinessRecord::new(7, Category::Accommodation).with_contact(Contact {
            website: Some("homestay.example".to_string()),
            ..Default::default()
        });
        record.name_th = Some("บ้านพักริมน้ำ".to_string());

        assert_eq!(
            store.put("map_cache_thai", &[record.clone()]).await,
            CacheWrite::Stored
        );
        let cached = store.get("map_cache_thai").await.unwrap();
        assert_eq!(cached, vec![record]);
    }

    #[tokio::test]
    async fn test_sqlite_persists_across_connections() {
        let dir = std::env::temp_dir().join(format!("tourmap-cache-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cache.sqlite3");
        let _ = std::fs::remove_file(&path);

        {
            let cache = SqliteCache::new(&path).unwrap();
            cache.write("map_cache_p", "persisted").await.unwrap();
        }

        let cache = SqliteCache::new(&path).unwrap();
        assert_eq!(
            cache.read("map_cache_p").await.unwrap().as_deref(),
            Some("persisted")
        );

        drop(cache);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
