#![forbid(unsafe_code)]
//! SQLite persistence for Motus.
//!
//! One connection per [`Store`], versioned schema applied on open, foreign
//! keys enforced. JSON-array columns (`concerns`, `recommended_exercises`,
//! `raw_model_output`) are TEXT holding valid JSON; encoding and decoding
//! happen inside this crate so callers only see structured values.

mod athletes;
mod rehab;
mod rewrites;
mod schema;
mod screens;
mod users;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json column held invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("timestamp column held invalid value: {0}")]
    Timestamp(String),
    #[error("io error: {0}")]
    Io(String),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database file, applying migrations as needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), StoreError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(SCHEMA_VERSION_TABLE)?;
        let current = self.schema_version()?;
        if current < CURRENT_VERSION {
            self.migrate(current)?;
        }
        Ok(())
    }

    fn schema_version(&self) -> Result<i32, StoreError> {
        let version = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )?;
        Ok(version)
    }

    fn migrate(&self, from_version: i32) -> Result<(), StoreError> {
        if from_version < 1 {
            self.conn.execute_batch(SCHEMA)?;
            self.conn.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![CURRENT_VERSION, Utc::now().to_rfc3339()],
            )?;
            tracing::info!(version = CURRENT_VERSION, "database schema applied");
        }
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Cheap readiness probe: the connection can still run a query.
    pub fn healthcheck(&self) -> Result<(), StoreError> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

/// Surface unique/foreign-key violations as their own variant so handlers can
/// answer with a client error instead of a masked 500.
pub(crate) fn map_constraint(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(code, msg)
            if code.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Constraint(
                msg.clone()
                    .unwrap_or_else(|| "constraint violation".to_string()),
            )
        }
        _ => StoreError::Sqlite(e),
    }
}

/// Wrap a domain-level conversion failure so it can cross a rusqlite row
/// closure boundary.
pub(crate) fn conv_err(e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

pub(crate) fn ts_to_sql(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn ts_from_sql(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Timestamp(format!("{raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_applies_schema() {
        let store = Store::open_in_memory().expect("open");
        assert_eq!(store.schema_version().expect("version"), CURRENT_VERSION);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/motus.sqlite");
        let store = Store::open(&path).expect("open on disk");
        assert_eq!(store.schema_version().expect("version"), CURRENT_VERSION);
        assert!(path.exists());
    }

    #[test]
    fn reopen_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("motus.sqlite");
        drop(Store::open(&path).expect("first open"));
        let store = Store::open(&path).expect("second open");
        assert_eq!(store.schema_version().expect("version"), CURRENT_VERSION);
    }

    #[test]
    fn timestamp_round_trip() {
        let now = Utc::now();
        let back = ts_from_sql(&ts_to_sql(&now)).expect("parse");
        assert_eq!(now.timestamp_millis(), back.timestamp_millis());
    }
}
