//! Path utilities for determining data storage locations.
//!
//! All data lives in `~/.eisenhower/`: the `SQLite` database, the
//! settings file, and the optional operations log.

use std::path::PathBuf;

/// The base directory name for eisenhower data.
const DATA_DIR_NAME: &str = ".eisenhower";

/// The database filename.
pub const DATABASE_FILENAME: &str = "matrix.sqlite3";

/// The operations log filename.
pub const OPERATIONS_LOG_FILENAME: &str = "operations.jsonl";

/// Get the base data directory.
///
/// Returns `~/.eisenhower/` or `None` if the home directory cannot be
/// determined.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Get the default database path.
///
/// Returns `~/.eisenhower/matrix.sqlite3` or `None` if the home directory
/// cannot be determined.
#[must_use]
pub fn db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(DATABASE_FILENAME))
}
