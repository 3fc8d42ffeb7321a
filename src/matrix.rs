//! Composite task operations and their side-effect ordering.
//!
//! [`Matrix`] is the surface a front end talks to. Every mutation runs
//! its steps in a fixed order: task write first, then the ledger append,
//! then (for create/complete/delete/move) the analytics bump. Each step
//! is its own single-collection transaction; the sequence as a whole is
//! NOT atomic. A failure mid-sequence leaves the earlier steps committed
//! and the remaining side effects lost; callers that care must retry
//! the whole operation.

use crate::config::Settings;
use crate::db::{self, Database};
use crate::error::{Error, Result};
use crate::history::{Action, HistoryEntry, HistoryLedger};
use crate::oplog;
use crate::stats::{ActionKind, Analytics, DailyStats};
use crate::tasks::id;
use crate::tasks::models::{NewTask, Quadrant, Status, Task};
use crate::tasks::repo::TaskRepository;
use std::path::{Path, PathBuf};

/// The task store: repository, ledger, and analytics behind one handle.
#[derive(Debug, Clone)]
pub struct Matrix {
    tasks: TaskRepository,
    history: HistoryLedger,
    stats: Analytics,
    /// Directory the operations log is written to, when enabled.
    oplog_dir: Option<PathBuf>,
}

impl Matrix {
    /// Build a store over an initialized database with the given
    /// settings.
    #[must_use]
    pub fn new(db: Database, settings: &Settings) -> Self {
        let oplog_dir = settings
            .debug_logging
            .then(|| db.db_path().parent().map(Path::to_path_buf))
            .flatten();
        Self {
            tasks: TaskRepository::new(db.clone()),
            history: HistoryLedger::new(db.clone(), settings.actor.clone()),
            stats: Analytics::new(db),
            oplog_dir,
        }
    }

    /// Open (or create) a store at the given database path with default
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] if the database cannot be
    /// initialized.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::new(db_path)?, &Settings::default()))
    }

    fn log_op(&self, operation: &str, detail: &serde_json::Value) {
        if let Some(dir) = &self.oplog_dir {
            oplog::record(dir, operation, detail);
        }
    }

    /// Create a task from a draft: generated id, current timestamps,
    /// pending status. Runs the full create sequence of
    /// [`Matrix::add_task`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyName`] if the draft name is blank, or any
    /// error from the create sequence.
    pub fn create_task(&self, draft: NewTask) -> Result<Task> {
        if draft.name.trim().is_empty() {
            return Err(Error::EmptyName);
        }

        let now = db::now_timestamp();
        let task = Task {
            id: id::task_id(&draft.name),
            name: draft.name,
            description: draft.description,
            quadrant: draft.quadrant,
            priority: draft.priority,
            status: Status::Pending,
            created_at: now.clone(),
            updated_at: now,
            completed_at: None,
        };
        self.add_task(task.clone())?;
        Ok(task)
    }

    /// Add a fully built task.
    ///
    /// Sequence: insert task, append a "create" ledger entry, bump
    /// today's created counter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the id is already taken.
    pub fn add_task(&self, task: Task) -> Result<()> {
        self.tasks.insert(&task)?;
        self.history.append(
            Action::Create,
            &format!("Task created: {}", task.name),
            Some(&task),
        )?;
        self.stats.record(ActionKind::TaskCreated)?;
        self.log_op("create", &serde_json::json!({ "id": task.id }));
        Ok(())
    }

    /// Update a task in place.
    ///
    /// Upsert semantics: a task whose id is absent is (re)created rather
    /// than rejected. Sequence: refresh `updated_at`, upsert, append an
    /// "update" ledger entry. No analytics side effect.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage step fails.
    pub fn update_task(&self, mut task: Task) -> Result<Task> {
        task.updated_at = db::now_timestamp();
        self.tasks.upsert(&task)?;
        self.history.append(
            Action::Update,
            &format!("Task updated: {}", task.name),
            Some(&task),
        )?;
        self.log_op("update", &serde_json::json!({ "id": task.id }));
        Ok(task)
    }

    /// Delete a task, returning its final snapshot.
    ///
    /// Sequence: fetch (the audit message needs the name), delete,
    /// append a "delete" ledger entry with the pre-deletion snapshot,
    /// bump today's deleted counter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id is absent; the collections
    /// are left unchanged in that case.
    pub fn delete_task(&self, id: &str) -> Result<Task> {
        let task = self.tasks.remove(id)?;
        self.history.append(
            Action::Delete,
            &format!("Task deleted: {}", task.name),
            Some(&task),
        )?;
        self.stats.record(ActionKind::TaskDeleted)?;
        self.log_op("delete", &serde_json::json!({ "id": task.id }));
        Ok(task)
    }

    /// Move a task to another quadrant.
    ///
    /// Moving a task to the quadrant it is already in is a no-op with no
    /// side effects. Otherwise: mutate quadrant and `updated_at`,
    /// upsert, append a "move" ledger entry naming both quadrants, bump
    /// today's moved counter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id is absent.
    pub fn move_task(&self, id: &str, to: Quadrant) -> Result<Task> {
        let mut task = self.tasks.require(id)?;
        if task.quadrant == to {
            return Ok(task);
        }

        let from = task.quadrant;
        task.quadrant = to;
        task.updated_at = db::now_timestamp();
        self.tasks.upsert(&task)?;
        self.history.append(
            Action::Move,
            &format!("Task moved from {from} to {to}: {}", task.name),
            Some(&task),
        )?;
        self.stats.record(ActionKind::TaskMoved)?;
        self.log_op(
            "move",
            &serde_json::json!({ "id": task.id, "from": from.as_u8(), "to": to.as_u8() }),
        );
        Ok(task)
    }

    /// Mark a task completed.
    ///
    /// Completing an already-completed task is a no-op with no side
    /// effects. Otherwise: set completed status and `completed_at`,
    /// upsert, append an "update" ledger entry, bump today's completed
    /// counter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id is absent.
    pub fn complete_task(&self, id: &str) -> Result<Task> {
        let mut task = self.tasks.require(id)?;
        if task.is_completed() {
            return Ok(task);
        }

        let now = db::now_timestamp();
        task.status = Status::Completed;
        task.completed_at = Some(now.clone());
        task.updated_at = now;
        self.tasks.upsert(&task)?;
        self.history.append(
            Action::Update,
            &format!("Task completed: {}", task.name),
            Some(&task),
        )?;
        self.stats.record(ActionKind::TaskCompleted)?;
        self.log_op("complete", &serde_json::json!({ "id": task.id }));
        Ok(task)
    }

    /// Get a task by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>> {
        self.tasks.get(id)
    }

    /// All tasks, unordered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all_tasks(&self) -> Result<Vec<Task>> {
        self.tasks.all()
    }

    /// Tasks in the given quadrant, unordered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn tasks_by_quadrant(&self, quadrant: Quadrant) -> Result<Vec<Task>> {
        self.tasks.by_quadrant(quadrant)
    }

    /// Up to `limit` ledger entries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.history.recent(limit)
    }

    /// Irreversibly delete the whole ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear_history(&self) -> Result<()> {
        self.history.clear()
    }

    /// Per-day counters for the last `days` days including today,
    /// oldest first, zero-filled for days with no activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn analytics(&self, days: u32) -> Result<Vec<DailyStats>> {
        self.stats.window(days)
    }
}
