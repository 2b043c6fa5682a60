//! Retention policy enforcement
//!
//! Two independent passes, each disabled by a zero threshold:
//!
//! - by count: keep only the newest `retain_count` snapshots
//! - by age: delete snapshots strictly older than `retain_days`
//!
//! Every deletion attempt, successful or not, lands in the rotation log.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::config::paths::InventoryPaths;
use crate::config::settings::RetentionPolicy;
use crate::error::InventoryResult;

use super::audit::RotationLog;
use super::manager::scan_backups;

/// Outcome of one rotation run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RotationReport {
    /// Backups that were removed
    pub deleted: Vec<PathBuf>,
    /// Backups that could not be removed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl RotationReport {
    /// Check if the run touched nothing
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.failed.is_empty()
    }

    fn merge(&mut self, other: RotationReport) {
        self.deleted.extend(other.deleted);
        self.failed.extend(other.failed);
    }
}

/// Applies a retention policy to the backup directory
pub struct RetentionEnforcer {
    backup_dir: PathBuf,
    log: RotationLog,
}

impl RetentionEnforcer {
    pub fn new(paths: &InventoryPaths) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            log: RotationLog::new(paths.rotation_log()),
        }
    }

    /// Run both passes against the current time
    pub fn enforce(&self, policy: &RetentionPolicy) -> InventoryResult<RotationReport> {
        self.enforce_at(policy, Local::now().naive_local())
    }

    /// Run both passes with ages measured from `now`
    pub fn enforce_at(
        &self,
        policy: &RetentionPolicy,
        now: NaiveDateTime,
    ) -> InventoryResult<RotationReport> {
        let mut report = RotationReport::default();

        if policy.count_enabled() {
            report.merge(self.delete_by_count(policy.retain_count as usize)?);
        }
        if policy.age_enabled() {
            report.merge(self.delete_by_age(policy.retain_days, now)?);
        }

        if !report.is_empty() {
            tracing::info!(
                deleted = report.deleted.len(),
                failed = report.failed.len(),
                "retention policy enforced"
            );
        }
        Ok(report)
    }

    /// Delete everything but the newest `keep` snapshots
    pub fn delete_by_count(&self, keep: usize) -> InventoryResult<RotationReport> {
        let backups = scan_backups(&self.backup_dir)?;
        let excess = backups.len().saturating_sub(keep);
        let mut report = RotationReport::default();

        for backup in backups.iter().take(excess) {
            let reason = format!("exceeds retain_count={}", keep);
            self.delete_safely(&backup.path, &reason, &mut report);
        }

        Ok(report)
    }

    /// Delete snapshots whose age strictly exceeds `max_days`
    pub fn delete_by_age(&self, max_days: i32, now: NaiveDateTime) -> InventoryResult<RotationReport> {
        let backups = scan_backups(&self.backup_dir)?;
        let mut report = RotationReport::default();

        for backup in &backups {
            let age = backup.age_days(now);
            if age > f64::from(max_days) {
                let reason = format!("older than retain_days={} ({:.1} days)", max_days, age);
                self.delete_safely(&backup.path, &reason, &mut report);
            }
        }

        Ok(report)
    }

    /// Remove one snapshot and audit the attempt; never fails the caller
    fn delete_safely(&self, path: &Path, reason: &str, report: &mut RotationReport) {
        match fs::remove_file(path) {
            Ok(()) => {
                self.log
                    .record(path, &format!("Deleted by retention policy: {}", reason));
                report.deleted.push(path.to_path_buf());
            }
            Err(e) => {
                let message = format!("Deletion failed: {}", e);
                tracing::warn!(path = %path.display(), error = %e, "backup deletion failed");
                self.log.record(path, &message);
                report.failed.push((path.to_path_buf(), message));
            }
        }
    }
}
