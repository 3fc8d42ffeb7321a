//! Error types for `eisenhower`.

/// Errors that can occur in the persistence core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The storage engine could not be opened or initialized.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A `SQLite` operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An insert collided with an existing primary key.
    #[error("{collection} already contains key '{key}'")]
    Conflict {
        /// The collection that rejected the insert.
        collection: &'static str,
        /// The colliding primary key.
        key: String,
    },

    /// An operation required a record that is absent.
    #[error("no record '{key}' in {collection}")]
    NotFound {
        /// The collection that was searched.
        collection: &'static str,
        /// The missing primary key.
        key: String,
    },

    /// A task was given an empty name.
    #[error("task name must not be empty")]
    EmptyName,
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
