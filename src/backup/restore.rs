//! Backup restoration for the inventory tracker
//!
//! A restore runs four steps in order and never goes back:
//!
//! 1. copy the live store to the safety path
//! 2. put the chosen backup in place of the live store
//! 3. check every restored record
//! 4. drop the safety copy
//!
//! Any failure after step 1 puts the safety copy back over the live store
//! before reporting, so a failed restore leaves the store as it was.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::paths::InventoryPaths;
use crate::error::{InventoryError, InventoryResult};
use crate::storage::codec::{decode_product, read_record};
use crate::storage::file_io::{copy_file, copy_file_atomic, remove_if_exists};
use crate::storage::PRODUCT_RECORD_SIZE;

/// Handles restoring from backups
pub struct RestoreManager {
    paths: InventoryPaths,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: InventoryPaths) -> Self {
        Self { paths }
    }

    /// Replace the live store with `backup_path`
    pub fn restore_from_file(&self, backup_path: &Path) -> InventoryResult<RestoreResult> {
        if !backup_path.is_file() {
            return Err(InventoryError::backup_not_found(backup_path.display().to_string()));
        }

        let store = self.paths.store_file();
        let safety = self.paths.safety_backup();

        self.create_safety_copy(&store, &safety)?;
        tracing::debug!(safety = %safety.display(), "safety copy taken");

        if let Err(e) = copy_file_atomic(backup_path, &store) {
            tracing::warn!(error = %e, "restore copy failed, reverting");
            self.roll_back(&store, &safety)?;
            return Err(e);
        }

        let records = match validate_integrity(&store) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "restored store failed integrity check, reverting");
                self.roll_back(&store, &safety)?;
                return Err(e);
            }
        };

        remove_if_exists(&safety)?;
        tracing::info!(backup = %backup_path.display(), records, "restore complete");

        Ok(RestoreResult {
            backup_path: backup_path.to_path_buf(),
            records_restored: records,
        })
    }

    /// Check a backup's records without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> InventoryResult<usize> {
        validate_integrity(backup_path)
    }

    /// Copy the live store aside; a missing store is saved as an empty one
    fn create_safety_copy(&self, store: &Path, safety: &Path) -> InventoryResult<()> {
        fs::create_dir_all(self.paths.backup_dir()).map_err(|e| {
            InventoryError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let result = if store.exists() {
            copy_file(store, safety).map(|_| ())
        } else {
            File::create(safety)
                .map(|_| ())
                .map_err(InventoryError::from)
        };

        result.map_err(|e| {
            let _ = remove_if_exists(safety);
            InventoryError::Io(format!("Failed to create safety copy, restore aborted: {}", e))
        })
    }

    /// Put the safety copy back and discard it.
    ///
    /// If the safety copy itself cannot be put back it is kept on disk.
    fn roll_back(&self, store: &Path, safety: &Path) -> InventoryResult<()> {
        if let Err(e) = copy_file_atomic(safety, store) {
            tracing::warn!(safety = %safety.display(), "rollback failed, safety copy kept");
            return Err(InventoryError::Io(format!(
                "Rollback failed, previous store kept at {}: {}",
                safety.display(),
                e
            )));
        }
        remove_if_exists(safety)
    }
}

/// Scan a store-format file and reject impossible records.
///
/// Returns the number of whole records. A trailing partial record is
/// ignored.
pub fn validate_integrity(path: &Path) -> InventoryResult<usize> {
    let file = File::open(path)
        .map_err(|e| InventoryError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let mut reader = BufReader::new(file);
    let mut buf = [0u8; PRODUCT_RECORD_SIZE];
    let mut count = 0;

    while read_record(&mut reader, &mut buf)? {
        let product = decode_product(&buf);
        if product.id <= 0 || product.price < 0.0 || product.quantity < 0 {
            return Err(InventoryError::Validation(format!(
                "Record {} is corrupt (id {}, price {}, quantity {})",
                count + 1,
                product.id,
                product.price,
                product.quantity
            )));
        }
        count += 1;
    }

    Ok(count)
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    /// Backup that is now the live store
    pub backup_path: PathBuf,
    /// Number of product records in the restored store
    pub records_restored: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        let name = self
            .backup_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.backup_path.display().to_string());
        format!("Restored {} product(s) from {}", self.records_restored, name)
    }
}
