//! Text audit trails for backups and rotation
//!
//! Two append-only line logs sit next to the store:
//!
//! - `backups.log`: `YYYY-MM-DD HH:MM:SS,<path>,SUCCESS|FAILED,<sourceSizeBytes>`
//! - `rotation.log`: `[YYYY-MM-DD HH:MM:SS] <path>: <reason>`
//!
//! Writing either log is best-effort. A failure is reported through tracing
//! and never changes the outcome of the operation being audited.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::storage::file_io::append_line;

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format one backup audit line; an unreadable source is logged as size 0
pub fn format_backup_line(at: NaiveDateTime, backup_path: &Path, success: bool, source_size: Option<u64>) -> String {
    let size = source_size.unwrap_or(0);
    format!(
        "{},{},{},{}",
        at.format(LOG_TIME_FORMAT),
        backup_path.display(),
        if success { "SUCCESS" } else { "FAILED" },
        size
    )
}

/// Format one rotation audit line
pub fn format_rotation_line(at: NaiveDateTime, path: &Path, reason: &str) -> String {
    format!("[{}] {}: {}", at.format(LOG_TIME_FORMAT), path.display(), reason)
}

/// Audit log of backup attempts
pub struct BackupLog {
    path: PathBuf,
}

impl BackupLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Record one backup attempt
    pub fn record(&self, backup_path: &Path, success: bool, source_size: Option<u64>) {
        let line = format_backup_line(Local::now().naive_local(), backup_path, success, source_size);
        if let Err(e) = append_line(&self.path, &line) {
            tracing::warn!(error = %e, "backup audit entry not written");
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Audit log of retention deletions and backup failures
pub struct RotationLog {
    path: PathBuf,
}

impl RotationLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Record one action against a backup path
    pub fn record(&self, path: &Path, reason: &str) {
        let line = format_rotation_line(Local::now().naive_local(), path, reason);
        if let Err(e) = append_line(&self.path, &line) {
            tracing::warn!(error = %e, "rotation audit entry not written");
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap()
    }

    #[test]
    fn test_backup_line_format() {
        let line = format_backup_line(at(), Path::new("backups/inventory_20250304_050607.bak"), true, Some(192));
        assert_eq!(
            line,
            "2025-03-04 05:06:07,backups/inventory_20250304_050607.bak,SUCCESS,192"
        );

        let failed = format_backup_line(at(), Path::new("b.bak"), false, None);
        assert_eq!(failed, "2025-03-04 05:06:07,b.bak,FAILED,0");
    }

    #[test]
    fn test_rotation_line_format() {
        let line = format_rotation_line(at(), Path::new("backups/x.bak"), "Deleted by retention policy");
        assert_eq!(line, "[2025-03-04 05:06:07] backups/x.bak: Deleted by retention policy");
    }

    #[test]
    fn test_logs_append() {
        let temp_dir = TempDir::new().unwrap();
        let log = RotationLog::new(temp_dir.path().join("rotation.log"));

        log.record(Path::new("a.bak"), "first");
        log.record(Path::new("b.bak"), "second");

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("b.bak: second"));
    }

    #[test]
    fn test_unwritable_log_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        let log = BackupLog::new(temp_dir.path().join("missing").join("backups.log"));

        log.record(Path::new("a.bak"), true, Some(0));
        assert!(!log.path().exists());
    }
}
