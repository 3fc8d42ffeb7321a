//! Task model types for the quadrant matrix.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The four priority quadrants of the matrix.
///
/// Numbered 1–4: urgent & important, important but not urgent, urgent but
/// not important, neither. Serialized as the bare number, which is also
/// how the quadrant is stored and indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Quadrant {
    /// Q1 - urgent and important.
    DoFirst = 1,
    /// Q2 - important, not urgent.
    Schedule = 2,
    /// Q3 - urgent, not important.
    Delegate = 3,
    /// Q4 - neither urgent nor important.
    Eliminate = 4,
}

impl Quadrant {
    /// All quadrants in numeric order.
    pub const ALL: [Self; 4] = [Self::DoFirst, Self::Schedule, Self::Delegate, Self::Eliminate];

    /// Create a quadrant from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside 1–4.
    pub const fn from_u8(value: u8) -> Result<Self, InvalidQuadrant> {
        match value {
            1 => Ok(Self::DoFirst),
            2 => Ok(Self::Schedule),
            3 => Ok(Self::Delegate),
            4 => Ok(Self::Eliminate),
            _ => Err(InvalidQuadrant(value)),
        }
    }

    /// Get the numeric value of the quadrant.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable label for the quadrant.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DoFirst => "Do First",
            Self::Schedule => "Schedule",
            Self::Delegate => "Delegate",
            Self::Eliminate => "Eliminate",
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Q{}", self.as_u8())
    }
}

impl Serialize for Quadrant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for Quadrant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::from_u8(value).map_err(serde::de::Error::custom)
    }
}

/// Error when an invalid quadrant number is provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidQuadrant(pub u8);

impl std::fmt::Display for InvalidQuadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid quadrant: {} (must be 1-4)", self.0)
    }
}

impl std::error::Error for InvalidQuadrant {}

/// Task priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// High priority.
    High,
    /// Medium priority (default).
    #[default]
    Medium,
    /// Low priority.
    Low,
}

impl Priority {
    /// Parse a priority from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid priority.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidPriority> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(InvalidPriority(s.to_string())),
        }
    }

    /// Get the string representation of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid priority string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPriority(pub String);

impl std::fmt::Display for InvalidPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid priority: '{}' (must be one of: high, medium, low)", self.0)
    }
}

impl std::error::Error for InvalidPriority {}

/// Task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Task is open and waiting to be done.
    #[default]
    Pending,
    /// Task has been completed.
    Completed,
}

impl Status {
    /// Parse a status from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid status.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidStatus> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }

    /// Get the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid status string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl std::fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid status: '{}' (must be 'pending' or 'completed')", self.0)
    }
}

impl std::error::Error for InvalidStatus {}

/// A task in the matrix.
///
/// Snapshots of this struct are what the ledger stores; field names are
/// serialized in camelCase to match the stored data format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (slug from the name + random hex suffix).
    pub id: String,
    /// Short name describing the task. Never empty.
    pub name: String,
    /// Longer free-form description. May be empty.
    #[serde(default)]
    pub description: String,
    /// The quadrant the task currently sits in.
    pub quadrant: Quadrant,
    /// Priority level within the quadrant.
    pub priority: Priority,
    /// Current status.
    pub status: Status,
    /// RFC 3339 timestamp when the task was created.
    pub created_at: String,
    /// RFC 3339 timestamp when the task was last updated.
    pub updated_at: String,
    /// RFC 3339 timestamp when the task was completed, if it has been.
    pub completed_at: Option<String>,
}

impl Task {
    /// Check if the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, Status::Completed)
    }
}

/// Input for creating a new task.
///
/// The store fills in the id, timestamps, and initial pending status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Short name describing the task. Must not be empty.
    pub name: String,
    /// Longer free-form description.
    pub description: String,
    /// The quadrant to file the task under.
    pub quadrant: Quadrant,
    /// Priority level within the quadrant.
    pub priority: Priority,
}

impl NewTask {
    /// A draft with the given name and the defaults a freshly captured
    /// task gets: quadrant 1, medium priority, empty description.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            quadrant: Quadrant::DoFirst,
            priority: Priority::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_from_u8() {
        assert_eq!(Quadrant::from_u8(1).unwrap(), Quadrant::DoFirst);
        assert_eq!(Quadrant::from_u8(2).unwrap(), Quadrant::Schedule);
        assert_eq!(Quadrant::from_u8(3).unwrap(), Quadrant::Delegate);
        assert_eq!(Quadrant::from_u8(4).unwrap(), Quadrant::Eliminate);
        assert!(Quadrant::from_u8(0).is_err());
        assert!(Quadrant::from_u8(5).is_err());
    }

    #[test]
    fn test_quadrant_roundtrip() {
        for q in Quadrant::ALL {
            assert_eq!(Quadrant::from_u8(q.as_u8()).unwrap(), q);
        }
    }

    #[test]
    fn test_quadrant_display() {
        assert_eq!(Quadrant::DoFirst.to_string(), "Q1");
        assert_eq!(Quadrant::Eliminate.to_string(), "Q4");
    }

    #[test]
    fn test_quadrant_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Quadrant::Delegate).unwrap(), "3");
        let q: Quadrant = serde_json::from_str("2").unwrap();
        assert_eq!(q, Quadrant::Schedule);
    }

    #[test]
    fn test_quadrant_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Quadrant>("0").is_err());
        assert!(serde_json::from_str::<Quadrant>("7").is_err());
    }

    #[test]
    fn test_invalid_quadrant_display() {
        assert_eq!(InvalidQuadrant(9).to_string(), "invalid quadrant: 9 (must be 1-4)");
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!(Priority::from_str("high").unwrap(), Priority::High);
        assert_eq!(Priority::from_str("MEDIUM").unwrap(), Priority::Medium);
        assert_eq!(Priority::from_str("Low").unwrap(), Priority::Low);
        assert!(Priority::from_str("urgent").is_err());
    }

    #[test]
    fn test_priority_default() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(Status::from_str("pending").unwrap(), Status::Pending);
        assert_eq!(Status::from_str("completed").unwrap(), Status::Completed);
        assert!(Status::from_str("done").is_err());
    }

    #[test]
    fn test_status_default() {
        assert_eq!(Status::default(), Status::Pending);
    }

    fn sample_task() -> Task {
        Task {
            id: "pay-taxes-0a1b2c3d".to_string(),
            name: "Pay taxes".to_string(),
            description: "before the deadline".to_string(),
            quadrant: Quadrant::DoFirst,
            priority: Priority::High,
            status: Status::Pending,
            created_at: "2024-03-01T09:00:00.000000Z".to_string(),
            updated_at: "2024-03-01T09:00:00.000000Z".to_string(),
            completed_at: None,
        }
    }

    #[test]
    fn test_task_is_completed() {
        let mut task = sample_task();
        assert!(!task.is_completed());
        task.status = Status::Completed;
        assert!(task.is_completed());
    }

    #[test]
    fn test_task_serialization_roundtrip() {
        let task = sample_task();
        let json = serde_json::to_string(&task).unwrap();
        let parsed: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, task);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let json = serde_json::to_string(&sample_task()).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"completedAt\""));
        assert!(json.contains("\"quadrant\":1"));
    }

    #[test]
    fn test_new_task_named_defaults() {
        let draft = NewTask::named("Inbox zero");
        assert_eq!(draft.name, "Inbox zero");
        assert_eq!(draft.quadrant, Quadrant::DoFirst);
        assert_eq!(draft.priority, Priority::Medium);
        assert!(draft.description.is_empty());
    }
}
