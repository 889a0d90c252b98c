//! SQLite-backed region lookup over the `factors_by_countries` table.

use async_trait::async_trait;
use offset_types::Region;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::{RegionLookup, StoreError};

/// Region lookup backed by a SQLite database file.
///
/// The connection is shared behind a mutex; queries run on the blocking pool
/// so they can be awaited (and timed out) like any other collaborator call.
#[derive(Clone)]
pub struct SqliteRegionLookup {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRegionLookup {
    /// Open an existing database.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Backend(format!("failed to open {}: {e}", path.display())))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create the factors table if it does not exist.
    pub fn migrate(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS factors_by_countries (
                country TEXT PRIMARY KEY,
                coefficient REAL NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Insert or replace the coefficient for a region.
    pub fn put_coefficient(&self, region: &Region, coefficient: f64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO factors_by_countries (country, coefficient) VALUES (?1, ?2)",
            params![region.as_str(), coefficient],
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }

    fn query(conn: &Connection, region: &str) -> Result<f64, StoreError> {
        let value: Option<Value> = conn
            .query_row(
                "SELECT coefficient FROM factors_by_countries WHERE country = ?1",
                params![region],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            None => Err(StoreError::NotFound(region.to_string())),
            Some(value) => coefficient_from_value(region, value),
        }
    }
}

/// Coefficients may have been written as REAL, INTEGER or numeric TEXT.
fn coefficient_from_value(region: &str, value: Value) -> Result<f64, StoreError> {
    match value {
        Value::Real(f) => Ok(f),
        Value::Integer(i) => Ok(i as f64),
        Value::Text(s) => s.trim().parse::<f64>().map_err(|e| {
            StoreError::Corruption(format!("coefficient for {region} is not numeric: {s:?} ({e})"))
        }),
        Value::Null => Err(StoreError::Corruption(format!("coefficient for {region} is NULL"))),
        Value::Blob(_) => Err(StoreError::Corruption(format!("coefficient for {region} is a blob"))),
    }
}

#[async_trait]
impl RegionLookup for SqliteRegionLookup {
    async fn coefficient_for(&self, region: &Region) -> Result<f64, StoreError> {
        let conn = Arc::clone(&self.conn);
        let key = region.as_str().to_string();
        let coefficient = tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
            Self::query(&conn, &key)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("lookup task failed: {e}")))??;

        debug!(region = %region, coefficient, "region coefficient read");
        Ok(coefficient)
    }
}
