//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::RetentionPolicy;
use crate::display::{format_backup_list, format_rotation_report};
use crate::error::{InventoryError, InventoryResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot the product store
    Create,

    /// List all available backups, oldest first
    List,

    /// Replace the product store with a backup
    Restore {
        /// Backup number from `backup list`, 'latest', or a filename
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Check a backup's records without restoring it
    Validate {
        /// Backup number from `backup list`, 'latest', or a filename
        backup: String,
    },
}

/// Handle a backup command
pub fn handle_backup_command(storage: &mut Storage, cmd: BackupCommands) -> InventoryResult<()> {
    let paths = storage.paths().clone();
    let policy = RetentionPolicy::load(&paths)?;
    let manager = BackupManager::new(paths.clone(), policy);

    match cmd {
        BackupCommands::Create => {
            let created = manager.create_backup()?;
            let filename = created
                .path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| created.path.display().to_string());
            println!("Backup created: {}", filename);
            println!("Location: {}", created.path.display());
            if !created.rotation.is_empty() {
                print!("{}", format_rotation_report(&created.rotation));
            }
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;
            print!("{}", format_backup_list(&backups));
            if !backups.is_empty() {
                println!();
                println!("Total: {} backup(s)", backups.len());
            }
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;

            if !force {
                println!("Restore source: {}", backup_path.display());
                println!("WARNING: This will overwrite the current product store!");
                println!("To proceed, run again with --force flag:");
                println!("  inventory backup restore {} --force", backup);
                return Ok(());
            }

            let result = RestoreManager::new(paths).restore_from_file(&backup_path)?;
            storage.products.resync_ids()?;
            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Validate { backup } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;
            let records = RestoreManager::new(paths).validate_backup(&backup_path)?;
            println!("Backup OK: {} record(s) in {}", records, backup_path.display());
        }
    }

    Ok(())
}

/// Resolve a 1-based listing number, 'latest', or a filename to a backup path
pub fn resolve_backup_path(manager: &BackupManager, backup: &str) -> InventoryResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest()?
            .map(|b| b.path)
            .ok_or_else(|| InventoryError::backup_not_found("latest"));
    }

    if let Ok(number) = backup.parse::<usize>() {
        if number == 0 {
            return Err(InventoryError::InvalidArgument(
                "Backup numbers start at 1".into(),
            ));
        }
        return manager.select(number - 1).map(|b| b.path);
    }

    let path = PathBuf::from(backup);
    if path.is_file() {
        return Ok(path);
    }

    let in_dir = manager.backup_dir().join(backup);
    if in_dir.is_file() {
        return Ok(in_dir);
    }

    Err(InventoryError::backup_not_found(backup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryPaths;
    use crate::storage::PRODUCT_RECORD_SIZE;
    use tempfile::TempDir;

    fn manager_with(names: &[&str]) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = InventoryPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        for name in names {
            std::fs::write(paths.backup_dir().join(name), [0u8; PRODUCT_RECORD_SIZE]).unwrap();
        }
        (BackupManager::new(paths, RetentionPolicy::default()), temp_dir)
    }

    #[test]
    fn test_resolve_by_number_and_latest() {
        let (manager, _temp) = manager_with(&[
            "inventory_20250102_000000.bak",
            "inventory_20250101_000000.bak",
        ]);

        let first = resolve_backup_path(&manager, "1").unwrap();
        assert!(first.ends_with("inventory_20250101_000000.bak"));

        let latest = resolve_backup_path(&manager, "latest").unwrap();
        assert!(latest.ends_with("inventory_20250102_000000.bak"));

        let by_name = resolve_backup_path(&manager, "inventory_20250102_000000.bak").unwrap();
        assert_eq!(by_name, latest);
    }

    #[test]
    fn test_resolve_errors() {
        let (manager, _temp) = manager_with(&["inventory_20250101_000000.bak"]);

        assert!(resolve_backup_path(&manager, "0").unwrap_err().is_invalid_argument());
        assert!(resolve_backup_path(&manager, "2").unwrap_err().is_not_found());
        assert!(resolve_backup_path(&manager, "nope.bak").unwrap_err().is_not_found());
    }

    #[test]
    fn test_latest_with_no_backups() {
        let (manager, _temp) = manager_with(&[]);
        assert!(resolve_backup_path(&manager, "latest").unwrap_err().is_not_found());
    }
}
