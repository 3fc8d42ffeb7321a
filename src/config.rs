//! Settings for the matrix store.
//!
//! Settings live in a YAML file next to the database
//! (`~/.eisenhower/config.yaml`). A missing file yields the defaults;
//! unknown fields are ignored so older files keep loading.

use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings filename within the data directory.
pub const SETTINGS_FILENAME: &str = "config.yaml";

/// Default actor label stamped on ledger entries.
pub const DEFAULT_ACTOR: &str = "Squad Member";

/// Default page size for history queries.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Default window size for analytics queries, in days.
pub const DEFAULT_ANALYTICS_DAYS: u32 = 7;

/// User-tunable settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Actor label stamped on every ledger entry.
    pub actor: String,

    /// How many ledger entries a history query returns by default.
    pub history_limit: usize,

    /// How many days an analytics query covers by default.
    pub analytics_days: u32,

    /// Override for the database file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Whether mutations are appended to the operations log.
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            actor: DEFAULT_ACTOR.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            analytics_days: DEFAULT_ANALYTICS_DAYS,
            database: None,
            debug_logging: false,
        }
    }
}

impl Settings {
    /// Load settings from the default data directory.
    ///
    /// Returns the defaults if the data directory cannot be determined
    /// or the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        match paths::data_dir() {
            Some(dir) => Self::load_from(&dir),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let settings: Self = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let content = serde_yaml::to_string(self)?;
        std::fs::write(dir.join(SETTINGS_FILENAME), content)?;
        Ok(())
    }

    /// The database path to use: the override if set, otherwise the
    /// default location.
    #[must_use]
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.clone().or_else(paths::db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.actor, "Squad Member");
        assert_eq!(settings.history_limit, 50);
        assert_eq!(settings.analytics_days, 7);
        assert!(settings.database.is_none());
        assert!(!settings.debug_logging);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            actor: "alex".to_string(),
            history_limit: 10,
            analytics_days: 30,
            database: Some(PathBuf::from("/tmp/elsewhere.sqlite3")),
            debug_logging: true,
        };

        settings.save_to(dir.path()).unwrap();
        let loaded = Settings::load_from(dir.path()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILENAME), "actor: casey\n").unwrap();

        let settings = Settings::load_from(dir.path()).unwrap();
        assert_eq!(settings.actor, "casey");
        assert_eq!(settings.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_database_path_prefers_override() {
        let settings = Settings {
            database: Some(PathBuf::from("/tmp/custom.db")),
            ..Settings::default()
        };
        assert_eq!(settings.database_path().unwrap(), PathBuf::from("/tmp/custom.db"));
    }
}
