//! Append-only ledger of task mutations.
//!
//! Every mutation of the task set is recorded as an immutable entry
//! carrying a deep snapshot of the task at the moment of the action.
//! Entries are never updated or deleted individually; the only
//! destructive operation is a bulk [`HistoryLedger::clear`].

use crate::db::{self, collections, Database};
use crate::error::Result;
use crate::tasks::id;
use crate::tasks::models::Task;
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// The kind of mutation a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// A task was created.
    Create,
    /// A task's fields were changed (including completion).
    Update,
    /// A task was deleted.
    Delete,
    /// A task was moved to another quadrant.
    Move,
}

impl Action {
    /// Parse an action from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid action.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> std::result::Result<Self, InvalidAction> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "move" => Ok(Self::Move),
            _ => Err(InvalidAction(s.to_string())),
        }
    }

    /// Get the string representation of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Move => "move",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid action string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAction(pub String);

impl std::fmt::Display for InvalidAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid action: '{}' (must be one of: create, update, delete, move)", self.0)
    }
}

impl std::error::Error for InvalidAction {}

/// An immutable entry in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The kind of mutation recorded.
    pub action: Action,
    /// Human-readable summary, e.g. "Task created: Pay taxes".
    pub description: String,
    /// Deep snapshot of the task at the moment of the action, if any.
    pub task_data: Option<Task>,
    /// RFC 3339 timestamp when the entry was appended.
    pub timestamp: String,
    /// Actor label the entry was stamped with.
    pub user: String,
}

/// Store owning the `history` collection.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    db: Database,
    user: String,
}

impl HistoryLedger {
    /// Create a ledger over the given database handle, stamping entries
    /// with the given actor label.
    pub fn new(db: Database, user: impl Into<String>) -> Self {
        Self { db, user: user.into() }
    }

    /// Append an entry recording a mutation.
    ///
    /// The snapshot is serialized at append time, so later mutations of
    /// the task can never retroactively change the stored entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be stored.
    pub fn append(
        &self,
        action: Action,
        description: &str,
        snapshot: Option<&Task>,
    ) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            id: id::entry_id(),
            action,
            description: description.to_string(),
            task_data: snapshot.cloned(),
            timestamp: db::now_timestamp(),
            user: self.user.clone(),
        };

        let task_json = match &entry.task_data {
            Some(task) => Some(serde_json::to_string(task)?),
            None => None,
        };

        let conn = self.db.open()?;
        conn.execute(
            "INSERT INTO history (id, action, description, task_data, timestamp, user)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &entry.id,
                entry.action.as_str(),
                &entry.description,
                &task_json,
                &entry.timestamp,
                &entry.user,
            ],
        )
        .map_err(|e| db::conflict_on_key(e, collections::HISTORY, &entry.id))?;

        Ok(entry)
    }

    /// Up to `limit` entries, most recent first.
    ///
    /// Implemented as a reverse scan over the timestamp index; the row id
    /// breaks ties between entries written in the same microsecond.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    #[allow(clippy::cast_possible_wrap)]
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let conn = self.db.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, action, description, task_data, timestamp, user
             FROM history ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, action_str, description, task_json, timestamp, user) = row?;
            entries.push(HistoryEntry {
                id,
                action: Action::from_str(&action_str).unwrap_or(Action::Update),
                description,
                task_data: task_json.as_deref().map(serde_json::from_str).transpose()?,
                timestamp,
                user,
            });
        }

        Ok(entries)
    }

    /// Irreversibly delete all entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<()> {
        self.db.clear(collections::HISTORY)
    }
}
