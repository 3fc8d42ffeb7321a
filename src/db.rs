//! `SQLite` storage engine for the matrix collections.
//!
//! This module owns the physical schema: three collections (`tasks`,
//! `history`, `analytics`) with their indices, created idempotently on
//! first open. Each store struct clones the [`Database`] handle and opens
//! a short-lived connection per operation; every statement is its own
//! atomic unit scoped to the single collection it touches. There is no
//! multi-collection transaction primitive.

use crate::error::{Error, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Collection name constants for consistent usage across the codebase.
pub mod collections {
    /// Task records, keyed by id.
    pub const TASKS: &str = "tasks";
    /// Append-only ledger entries, keyed by id.
    pub const HISTORY: &str = "history";
    /// Per-day usage counters, keyed by calendar date.
    pub const ANALYTICS: &str = "analytics";
}

/// Handle to the `SQLite` database file.
///
/// Each operation opens a new connection to the database file. This
/// avoids thread safety issues and is acceptable for the low frequency
/// of a personal task tool.
#[derive(Debug, Clone)]
pub struct Database {
    /// Path to the database file.
    db_path: PathBuf,
}

impl Database {
    /// Open (or create) the database at the given path and initialize
    /// the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] if the database cannot be opened
    /// or its schema cannot be created.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db = Self { db_path: db_path.as_ref().to_path_buf() };
        db.init_schema()?;
        Ok(db)
    }

    /// Open the database at the default data-directory location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] if the home directory cannot be
    /// determined or the database cannot be initialized.
    pub fn at_default_path() -> Result<Self> {
        let db_path = crate::paths::db_path()
            .ok_or_else(|| Error::Unavailable("home directory not found".to_string()))?;
        Self::new(db_path)
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the database.
    pub(crate) fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Unavailable(e.to_string()))?;
        }
        let conn = Connection::open(&self.db_path)
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        // WAL mode so readers are not blocked by a writer
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        Ok(conn)
    }

    /// Initialize the database schema.
    ///
    /// Idempotent: re-opening an existing database preserves its data.
    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute_batch(
            r"
            -- Task records, one row per live task
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                quadrant INTEGER NOT NULL CHECK (quadrant BETWEEN 1 AND 4),
                priority TEXT NOT NULL DEFAULT 'medium'
                    CHECK (priority IN ('high', 'medium', 'low')),
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'completed')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                completed_at TEXT
            );

            -- Append-only ledger of task mutations
            CREATE TABLE IF NOT EXISTS history (
                id TEXT PRIMARY KEY,
                action TEXT NOT NULL
                    CHECK (action IN ('create', 'update', 'delete', 'move')),
                description TEXT NOT NULL,
                task_data TEXT,
                timestamp TEXT NOT NULL,
                user TEXT NOT NULL
            );

            -- One counter row per calendar day
            CREATE TABLE IF NOT EXISTS analytics (
                date TEXT PRIMARY KEY,
                tasks_created INTEGER NOT NULL DEFAULT 0,
                tasks_completed INTEGER NOT NULL DEFAULT 0,
                tasks_deleted INTEGER NOT NULL DEFAULT 0,
                tasks_moved INTEGER NOT NULL DEFAULT 0
            );

            -- Indexes for quadrant-scoped and chronological queries
            CREATE INDEX IF NOT EXISTS idx_tasks_quadrant ON tasks(quadrant);
            CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
            CREATE INDEX IF NOT EXISTS idx_history_timestamp ON history(timestamp);
            CREATE INDEX IF NOT EXISTS idx_history_action ON history(action);
            ",
        )?;

        Ok(())
    }

    /// Delete every row in a collection.
    pub(crate) fn clear(&self, collection: &'static str) -> Result<()> {
        let conn = self.open()?;
        conn.execute(&format!("DELETE FROM {collection}"), [])?;
        Ok(())
    }

    /// Count the rows in a collection.
    pub(crate) fn count(&self, collection: &'static str) -> Result<u64> {
        let conn = self.open()?;
        let count: u64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {collection}"), [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Map a primary-key constraint violation to [`Error::Conflict`].
///
/// Any other failure stays a generic database error.
pub(crate) fn conflict_on_key(
    err: rusqlite::Error,
    collection: &'static str,
    key: &str,
) -> Error {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::Conflict { collection, key: key.to_string() }
        }
        _ => Error::Database(err),
    }
}

/// Current timestamp as RFC 3339 with microsecond precision.
///
/// Microseconds keep rapid consecutive writes ordered when sorted as
/// strings.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_new_creates_database_file() {
        let (_dir, db) = create_test_db();
        assert!(db.db_path().exists());
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::new(&path).unwrap();
        let conn = db.open().unwrap();
        conn.execute(
            "INSERT INTO tasks (id, name, quadrant, priority, status, created_at, updated_at)
             VALUES ('t-1', 'keep me', 1, 'medium', 'pending', '2024', '2024')",
            [],
        )
        .unwrap();
        drop(conn);

        // Re-opening must not recreate the tables
        let db = Database::new(&path).unwrap();
        assert_eq!(db.count(collections::TASKS).unwrap(), 1);
    }

    #[test]
    fn test_clear_empties_only_the_named_collection() {
        let (_dir, db) = create_test_db();
        let conn = db.open().unwrap();
        conn.execute(
            "INSERT INTO history (id, action, description, timestamp, user)
             VALUES ('e-1', 'create', 'x', '2024', 'me')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO tasks (id, name, quadrant, priority, status, created_at, updated_at)
             VALUES ('t-1', 'survivor', 2, 'low', 'pending', '2024', '2024')",
            [],
        )
        .unwrap();
        drop(conn);

        db.clear(collections::HISTORY).unwrap();
        assert_eq!(db.count(collections::HISTORY).unwrap(), 0);
        assert_eq!(db.count(collections::TASKS).unwrap(), 1);
    }

    #[test]
    fn test_quadrant_check_constraint() {
        let (_dir, db) = create_test_db();
        let conn = db.open().unwrap();
        let result = conn.execute(
            "INSERT INTO tasks (id, name, quadrant, priority, status, created_at, updated_at)
             VALUES ('t-1', 'bad', 5, 'medium', 'pending', '2024', '2024')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_conflict_on_key_maps_constraint_violations() {
        let (_dir, db) = create_test_db();
        let conn = db.open().unwrap();
        let insert = "INSERT INTO history (id, action, description, timestamp, user)
                      VALUES ('dup', 'create', 'x', '2024', 'me')";
        conn.execute(insert, []).unwrap();

        let err = conn.execute(insert, []).unwrap_err();
        match conflict_on_key(err, collections::HISTORY, "dup") {
            Error::Conflict { collection, key } => {
                assert_eq!(collection, "history");
                assert_eq!(key, "dup");
            }
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_conflict_on_key_passes_through_other_errors() {
        let err = rusqlite::Error::InvalidQuery;
        assert!(matches!(
            conflict_on_key(err, collections::TASKS, "t-1"),
            Error::Database(_)
        ));
    }

    #[test]
    fn test_now_timestamp_is_rfc3339() {
        let ts = now_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
