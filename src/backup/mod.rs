//! Backup system for the inventory tracker
//!
//! Provides timestamped snapshots of the product store, a retention policy
//! that prunes old snapshots, and a restore path guarded by a safety copy.
//!
//! # Architecture
//!
//! - `BackupManager`: creates, validates, and lists snapshots
//! - `RetentionEnforcer`: deletes snapshots by count and by age
//! - `RestoreManager`: swaps a snapshot in, rolling back on any failure
//!
//! # Backup Format
//!
//! A backup is a byte-for-byte copy of `inventory.dat` named
//! `inventory_YYYYMMDD_HHMMSS.bak`. Every attempt is recorded in
//! `backups.log`; deletions and failures go to `rotation.log`.
//!
//! # Example
//!
//! ```rust,ignore
//! use inventory::backup::{BackupManager, RestoreManager};
//! use inventory::config::{InventoryPaths, RetentionPolicy};
//!
//! let paths = InventoryPaths::new()?;
//! let policy = RetentionPolicy::load(&paths)?;
//! let backup_manager = BackupManager::new(paths.clone(), policy);
//!
//! let created = backup_manager.create_backup()?;
//!
//! // Later, restore from backup
//! let restore_manager = RestoreManager::new(paths);
//! let result = restore_manager.restore_from_file(&created.path)?;
//! println!("{}", result.summary());
//! ```

pub mod audit;
mod manager;
mod restore;
mod retention;

pub use audit::{BackupLog, RotationLog};
pub use manager::{
    backup_filename, parse_backup_filename, scan_backups, BackupCreated, BackupEntry,
    BackupManager, MAX_SCAN_ENTRIES,
};
pub use restore::{validate_integrity, RestoreManager, RestoreResult};
pub use retention::{RetentionEnforcer, RotationReport};
