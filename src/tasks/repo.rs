//! Task repository over the storage engine.

use crate::db::{self, collections, Database};
use crate::error::{Error, Result};
use crate::tasks::models::{Priority, Quadrant, Status, Task};
use rusqlite::{params, OptionalExtension, Row};

/// Columns selected for every task query, in `parse_task` order.
const TASK_COLUMNS: &str =
    "id, name, description, quadrant, priority, status, created_at, updated_at, completed_at";

/// Repository owning the `tasks` collection.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    db: Database,
}

impl TaskRepository {
    /// Create a repository over the given database handle.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Parse a task from a row.
    fn parse_task(row: &Row) -> rusqlite::Result<Task> {
        let quadrant_val: u8 = row.get(3)?;
        let priority_str: String = row.get(4)?;
        let status_str: String = row.get(5)?;

        Ok(Task {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            quadrant: Quadrant::from_u8(quadrant_val).unwrap_or(Quadrant::DoFirst),
            priority: Priority::from_str(&priority_str).unwrap_or_default(),
            status: Status::from_str(&status_str).unwrap_or_default(),
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
            completed_at: row.get(8)?,
        })
    }

    /// Insert a new task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if a task with the same id already
    /// exists.
    pub fn insert(&self, task: &Task) -> Result<()> {
        let conn = self.db.open()?;
        conn.execute(
            "INSERT INTO tasks (id, name, description, quadrant, priority, status,
                                created_at, updated_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &task.id,
                &task.name,
                &task.description,
                task.quadrant.as_u8(),
                task.priority.as_str(),
                task.status.as_str(),
                &task.created_at,
                &task.updated_at,
                &task.completed_at,
            ],
        )
        .map_err(|e| db::conflict_on_key(e, collections::TASKS, &task.id))?;
        Ok(())
    }

    /// Insert or replace a task by id. Never fails on absence.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn upsert(&self, task: &Task) -> Result<()> {
        let conn = self.db.open()?;
        conn.execute(
            "INSERT OR REPLACE INTO tasks (id, name, description, quadrant, priority, status,
                                           created_at, updated_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &task.id,
                &task.name,
                &task.description,
                task.quadrant.as_u8(),
                task.priority.as_str(),
                task.status.as_str(),
                &task.created_at,
                &task.updated_at,
                &task.completed_at,
            ],
        )?;
        Ok(())
    }

    /// Get a task by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: &str) -> Result<Option<Task>> {
        let conn = self.db.open()?;
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                Self::parse_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Get a task by id, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no task has the given id.
    pub fn require(&self, id: &str) -> Result<Task> {
        self.get(id)?.ok_or_else(|| Error::NotFound {
            collection: collections::TASKS,
            key: id.to_string(),
        })
    }

    /// Remove a task by id, returning the removed record.
    ///
    /// The task is fetched first so callers get the pre-deletion snapshot
    /// for the audit message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no task has the given id.
    pub fn remove(&self, id: &str) -> Result<Task> {
        let task = self.require(id)?;
        let conn = self.db.open()?;
        conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(task)
    }

    /// All tasks, unordered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all(&self) -> Result<Vec<Task>> {
        let conn = self.db.open()?;
        let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks"))?;
        let tasks = stmt.query_map([], Self::parse_task)?.flatten().collect();
        Ok(tasks)
    }

    /// Tasks in the given quadrant, unordered, via the quadrant index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn by_quadrant(&self, quadrant: Quadrant) -> Result<Vec<Task>> {
        let conn = self.db.open()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE quadrant = ?1"))?;
        let tasks =
            stmt.query_map(params![quadrant.as_u8()], Self::parse_task)?.flatten().collect();
        Ok(tasks)
    }
}
