//! Per-day usage counters.
//!
//! One record per calendar day (local time zone), holding four counters
//! bumped by the composite operations. The increment is a single atomic
//! upsert statement, so concurrent bumps on the same day cannot lose
//! updates. Days with no record read back as all-zero.

use crate::db::Database;
use crate::error::Result;
use chrono::{Days, NaiveDate};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// The counter a composite operation bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// A task was created.
    TaskCreated,
    /// A task was completed.
    TaskCompleted,
    /// A task was deleted.
    TaskDeleted,
    /// A task was moved to another quadrant.
    TaskMoved,
}

impl ActionKind {
    /// The analytics column this kind increments.
    const fn column(self) -> &'static str {
        match self {
            Self::TaskCreated => "tasks_created",
            Self::TaskCompleted => "tasks_completed",
            Self::TaskDeleted => "tasks_deleted",
            Self::TaskMoved => "tasks_moved",
        }
    }
}

/// Counters for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// ISO calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Tasks created on this day.
    pub tasks_created: u32,
    /// Tasks completed on this day.
    pub tasks_completed: u32,
    /// Tasks deleted on this day.
    pub tasks_deleted: u32,
    /// Tasks moved between quadrants on this day.
    pub tasks_moved: u32,
}

impl DailyStats {
    /// A zero-valued record for the given date.
    #[must_use]
    pub const fn zero(date: String) -> Self {
        Self { date, tasks_created: 0, tasks_completed: 0, tasks_deleted: 0, tasks_moved: 0 }
    }
}

/// Store owning the `analytics` collection.
#[derive(Debug, Clone)]
pub struct Analytics {
    db: Database,
}

/// Today's date in the local time zone.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Format a date as the analytics primary key.
fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl Analytics {
    /// Create an aggregator over the given database handle.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Bump today's counter for the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn record(&self, kind: ActionKind) -> Result<()> {
        self.record_on(today(), kind)
    }

    /// Bump the counter for the given kind on a specific date.
    ///
    /// This is primarily for testing; production callers use
    /// [`Analytics::record`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn record_on(&self, date: NaiveDate, kind: ActionKind) -> Result<()> {
        let column = kind.column();
        let conn = self.db.open()?;
        // Single atomic statement: no read-modify-write window
        conn.execute(
            &format!(
                "INSERT INTO analytics (date, {column}) VALUES (?1, 1)
                 ON CONFLICT(date) DO UPDATE SET {column} = {column} + 1"
            ),
            params![date_key(date)],
        )?;
        Ok(())
    }

    /// Counters for the last `days` days including today, oldest first.
    ///
    /// Days with no stored record are returned zero-valued.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn window(&self, days: u32) -> Result<Vec<DailyStats>> {
        self.window_ending(today(), days)
    }

    /// Counters for the `days` days ending at `end` inclusive, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn window_ending(&self, end: NaiveDate, days: u32) -> Result<Vec<DailyStats>> {
        let conn = self.db.open()?;
        let mut stmt = conn.prepare(
            "SELECT date, tasks_created, tasks_completed, tasks_deleted, tasks_moved
             FROM analytics WHERE date = ?1",
        )?;

        let mut window = Vec::with_capacity(days as usize);
        for offset in (0..days).rev() {
            let date = end - Days::new(u64::from(offset));
            let key = date_key(date);
            let stats = stmt
                .query_row(params![&key], Self::parse_stats)
                .optional()?
                .unwrap_or_else(|| DailyStats::zero(key));
            window.push(stats);
        }

        Ok(window)
    }

    /// Parse a counters record from a row.
    fn parse_stats(row: &Row) -> rusqlite::Result<DailyStats> {
        Ok(DailyStats {
            date: row.get(0)?,
            tasks_created: row.get(1)?,
            tasks_completed: row.get(2)?,
            tasks_deleted: row.get(3)?,
            tasks_moved: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_analytics() -> (TempDir, Analytics) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        (dir, Analytics::new(db))
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_record_creates_then_increments() {
        let (_dir, stats) = create_test_analytics();
        let day = date("2024-03-01");

        for _ in 0..3 {
            stats.record_on(day, ActionKind::TaskCreated).unwrap();
        }
        stats.record_on(day, ActionKind::TaskMoved).unwrap();

        let window = stats.window_ending(day, 1).unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].date, "2024-03-01");
        assert_eq!(window[0].tasks_created, 3);
        assert_eq!(window[0].tasks_moved, 1);
        assert_eq!(window[0].tasks_completed, 0);
        assert_eq!(window[0].tasks_deleted, 0);
    }

    #[test]
    fn test_each_kind_bumps_its_own_counter() {
        let (_dir, stats) = create_test_analytics();
        let day = date("2024-03-01");

        stats.record_on(day, ActionKind::TaskCreated).unwrap();
        stats.record_on(day, ActionKind::TaskCompleted).unwrap();
        stats.record_on(day, ActionKind::TaskDeleted).unwrap();
        stats.record_on(day, ActionKind::TaskMoved).unwrap();

        let day_stats = &stats.window_ending(day, 1).unwrap()[0];
        assert_eq!(
            (
                day_stats.tasks_created,
                day_stats.tasks_completed,
                day_stats.tasks_deleted,
                day_stats.tasks_moved
            ),
            (1, 1, 1, 1)
        );
    }

    #[test]
    fn test_window_is_ascending_and_zero_filled() {
        let (_dir, stats) = create_test_analytics();
        stats.record_on(date("2024-03-03"), ActionKind::TaskCreated).unwrap();
        stats.record_on(date("2024-03-05"), ActionKind::TaskDeleted).unwrap();

        let window = stats.window_ending(date("2024-03-05"), 7).unwrap();
        assert_eq!(window.len(), 7);
        assert_eq!(window.first().unwrap().date, "2024-02-28");
        assert_eq!(window.last().unwrap().date, "2024-03-05");

        for pair in window.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }

        // Only the two recorded days are non-zero
        assert_eq!(window[4].tasks_created, 1); // 2024-03-03
        assert_eq!(window[6].tasks_deleted, 1); // 2024-03-05
        let zero_days =
            window.iter().filter(|d| **d == DailyStats::zero(d.date.clone())).count();
        assert_eq!(zero_days, 5);
    }

    #[test]
    fn test_window_spans_month_boundary() {
        let (_dir, stats) = create_test_analytics();
        let window = stats.window_ending(date("2024-03-01"), 2).unwrap();
        assert_eq!(window[0].date, "2024-02-29"); // leap year
        assert_eq!(window[1].date, "2024-03-01");
    }

    #[test]
    fn test_separate_days_do_not_interfere() {
        let (_dir, stats) = create_test_analytics();
        stats.record_on(date("2024-03-01"), ActionKind::TaskCreated).unwrap();
        stats.record_on(date("2024-03-02"), ActionKind::TaskCreated).unwrap();
        stats.record_on(date("2024-03-02"), ActionKind::TaskCreated).unwrap();

        let window = stats.window_ending(date("2024-03-02"), 2).unwrap();
        assert_eq!(window[0].tasks_created, 1);
        assert_eq!(window[1].tasks_created, 2);
    }

    #[test]
    fn test_window_zero_days_is_empty() {
        let (_dir, stats) = create_test_analytics();
        assert!(stats.window(0).unwrap().is_empty());
    }
}
