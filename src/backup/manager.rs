//! Backup manager for the inventory tracker
//!
//! Snapshots the store file into the backup directory as
//! `inventory_YYYYMMDD_HHMMSS.bak`, checks the copy, records the attempt,
//! and then applies the retention policy.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::config::paths::InventoryPaths;
use crate::config::settings::RetentionPolicy;
use crate::error::{InventoryError, InventoryResult};
use crate::storage::file_io::{copy_file, file_size, remove_if_exists};
use crate::storage::PRODUCT_RECORD_SIZE;

use super::audit::{BackupLog, RotationLog};
use super::retention::{RetentionEnforcer, RotationReport};

/// Directory entries examined per scan before giving up on the rest
pub const MAX_SCAN_ENTRIES: usize = 4096;

const BACKUP_PREFIX: &str = "inventory_";
const BACKUP_SUFFIX: &str = ".bak";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const STAMP_LEN: usize = 15;

/// Metadata about a backup, rebuilt from the directory on every scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupEntry {
    /// Backup filename
    pub filename: String,
    /// Full path to backup
    pub path: PathBuf,
    /// Local wall-clock time embedded in the filename
    pub created_at: NaiveDateTime,
    /// Disambiguator for backups taken within the same second (0 = none)
    pub sequence: u32,
    /// Size in bytes
    pub size_bytes: u64,
    /// Whether the file holds a whole number of product records
    pub is_valid: bool,
}

impl BackupEntry {
    /// Age in fractional days relative to `now`
    pub fn age_days(&self, now: NaiveDateTime) -> f64 {
        now.signed_duration_since(self.created_at).num_seconds() as f64 / 86_400.0
    }
}

/// Result of a successful backup
#[derive(Debug)]
pub struct BackupCreated {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// What the retention pass removed afterwards
    pub rotation: RotationReport,
}

/// Manages backup creation and listing
pub struct BackupManager {
    paths: InventoryPaths,
    policy: RetentionPolicy,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(paths: InventoryPaths, policy: RetentionPolicy) -> Self {
        Self { paths, policy }
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> PathBuf {
        self.paths.backup_dir()
    }

    /// Retention policy applied after each backup
    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Snapshot the store, validate the copy, then enforce retention
    pub fn create_backup(&self) -> InventoryResult<BackupCreated> {
        self.create_backup_at(Local::now().naive_local())
    }

    /// Same as [`create_backup`](Self::create_backup) with an explicit timestamp
    pub fn create_backup_at(&self, now: NaiveDateTime) -> InventoryResult<BackupCreated> {
        let backup_dir = self.backup_dir();
        fs::create_dir_all(&backup_dir).map_err(|e| {
            InventoryError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let backup_path = self.next_backup_path(now);
        let store = self.paths.store_file();
        let backup_log = BackupLog::new(self.paths.backup_log());
        let rotation_log = RotationLog::new(self.paths.rotation_log());
        let source_size = file_size(&store).ok();

        if let Err(e) = copy_file(&store, &backup_path) {
            let _ = remove_if_exists(&backup_path);
            rotation_log.record(&backup_path, &format!("Backup creation failed: {}", e));
            backup_log.record(&backup_path, false, source_size);
            tracing::warn!(error = %e, "backup copy failed");
            return Err(e);
        }

        if let Err(e) = self.validate_backup(&backup_path) {
            let _ = remove_if_exists(&backup_path);
            rotation_log.record(&backup_path, &format!("Validation failed: {}", e));
            backup_log.record(&backup_path, false, source_size);
            tracing::warn!(error = %e, "backup validation failed");
            return Err(e);
        }

        let size_bytes = file_size(&backup_path)?;
        backup_log.record(&backup_path, true, source_size);
        tracing::info!(path = %backup_path.display(), size_bytes, "backup created");

        let rotation = match RetentionEnforcer::new(&self.paths).enforce_at(&self.policy, now) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "retention pass after backup failed");
                RotationReport::default()
            }
        };

        Ok(BackupCreated {
            path: backup_path,
            size_bytes,
            rotation,
        })
    }

    /// Check that a backup has exactly the size of the live store.
    ///
    /// This is a coarse sanity check; contents are not compared.
    pub fn validate_backup(&self, backup_path: &Path) -> InventoryResult<()> {
        let store_size = file_size(&self.paths.store_file())?;
        let backup_size = file_size(backup_path)?;

        if store_size != backup_size {
            return Err(InventoryError::Validation(format!(
                "Backup size {} does not match store size {}",
                backup_size, store_size
            )));
        }
        Ok(())
    }

    /// List all backups, oldest first
    pub fn list_backups(&self) -> InventoryResult<Vec<BackupEntry>> {
        scan_backups(&self.backup_dir())
    }

    /// Pick a backup by its 0-based position in [`list_backups`](Self::list_backups)
    pub fn select(&self, index: usize) -> InventoryResult<BackupEntry> {
        self.list_backups()?
            .into_iter()
            .nth(index)
            .ok_or_else(|| InventoryError::backup_not_found(format!("#{}", index + 1)))
    }

    /// Get the most recent backup
    pub fn latest(&self) -> InventoryResult<Option<BackupEntry>> {
        Ok(self.list_backups()?.pop())
    }

    /// Timestamped name for a new backup, suffixed if that second is taken
    fn next_backup_path(&self, now: NaiveDateTime) -> PathBuf {
        let dir = self.backup_dir();
        let base = backup_filename(now, 0);
        let mut path = dir.join(&base);
        let mut sequence = 1;
        while path.exists() {
            path = dir.join(backup_filename(now, sequence));
            sequence += 1;
        }
        path
    }
}

/// Build the filename for a backup taken at `at`
pub fn backup_filename(at: NaiveDateTime, sequence: u32) -> String {
    if sequence == 0 {
        format!("{}{}{}", BACKUP_PREFIX, at.format(STAMP_FORMAT), BACKUP_SUFFIX)
    } else {
        format!(
            "{}{}_{}{}",
            BACKUP_PREFIX,
            at.format(STAMP_FORMAT),
            sequence,
            BACKUP_SUFFIX
        )
    }
}

/// Parse `inventory_YYYYMMDD_HHMMSS[_N].bak` into its timestamp and sequence
pub fn parse_backup_filename(filename: &str) -> Option<(NaiveDateTime, u32)> {
    let rest = filename
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(BACKUP_SUFFIX)?;

    if rest.len() < STAMP_LEN || !rest.is_char_boundary(STAMP_LEN) {
        return None;
    }
    let (stamp, tail) = rest.split_at(STAMP_LEN);
    if !stamp.bytes().enumerate().all(|(i, b)| if i == 8 { b == b'_' } else { b.is_ascii_digit() }) {
        return None;
    }
    let created_at = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()?;

    let sequence = match tail.strip_prefix('_') {
        None if tail.is_empty() => 0,
        Some(n) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => n.parse().ok()?,
        _ => return None,
    };

    Some((created_at, sequence))
}

/// Scan a backup directory for snapshot files, oldest first.
///
/// Files whose names don't follow the backup pattern are skipped. A missing
/// directory has no backups.
pub fn scan_backups(dir: &Path) -> InventoryResult<Vec<BackupEntry>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();

    let entries = fs::read_dir(dir)
        .map_err(|e| InventoryError::Io(format!("Failed to read backup directory: {}", e)))?;

    for (scanned, entry) in entries.enumerate() {
        if scanned >= MAX_SCAN_ENTRIES {
            tracing::warn!(limit = MAX_SCAN_ENTRIES, "backup directory scan truncated");
            break;
        }

        let entry = entry
            .map_err(|e| InventoryError::Io(format!("Failed to read directory entry: {}", e)))?;
        let filename = entry.file_name().to_string_lossy().to_string();

        let Some((created_at, sequence)) = parse_backup_filename(&filename) else {
            continue;
        };
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let size_bytes = metadata.len();
        backups.push(BackupEntry {
            filename,
            path: entry.path(),
            created_at,
            sequence,
            size_bytes,
            is_valid: size_bytes % PRODUCT_RECORD_SIZE as u64 == 0,
        });
    }

    backups.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then(a.sequence.cmp(&b.sequence))
    });

    Ok(backups)
}
