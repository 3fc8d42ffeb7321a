//! Debug operation logging.
//!
//! When `debug_logging` is enabled in the settings, every composite
//! mutation is appended as a JSONL line to `operations.jsonl` next to
//! the database. Errors are silently ignored; logging must never break
//! an operation.

use crate::paths::OPERATIONS_LOG_FILENAME;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append an operation record to the log in `dir`.
pub fn record(dir: &Path, operation: &str, detail: &serde_json::Value) {
    if std::fs::create_dir_all(dir).is_err() {
        return;
    }

    let entry = serde_json::json!({
        "timestamp": crate::db::now_timestamp(),
        "operation": operation,
        "detail": detail,
    });

    let log_path = dir.join(OPERATIONS_LOG_FILENAME);
    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let _ = writeln!(file, "{entry}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_appends_jsonl_lines() {
        let dir = TempDir::new().unwrap();

        record(dir.path(), "create", &serde_json::json!({ "id": "t-1" }));
        record(dir.path(), "delete", &serde_json::json!({ "id": "t-1" }));

        let content =
            std::fs::read_to_string(dir.path().join(OPERATIONS_LOG_FILENAME)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["operation"], "create");
        assert_eq!(first["detail"]["id"], "t-1");
        assert!(first["timestamp"].is_string());
    }

    #[test]
    fn test_record_swallows_unwritable_path() {
        let dir = TempDir::new().unwrap();
        // Make the log path a directory so the append open fails
        std::fs::create_dir_all(dir.path().join(OPERATIONS_LOG_FILENAME)).unwrap();
        record(dir.path(), "create", &serde_json::json!({}));
    }
}
