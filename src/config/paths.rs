//! Path management for the inventory tracker
//!
//! Provides XDG-compliant path resolution for the store, logs, and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `INVENTORY_CLI_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/inventory-cli` or `~/.config/inventory-cli`
//! 3. Windows: `%APPDATA%\inventory-cli`

use std::path::PathBuf;

use crate::error::InventoryError;

/// Manages all paths used by the inventory tracker
#[derive(Debug, Clone)]
pub struct InventoryPaths {
    /// Base directory for all inventory data
    base_dir: PathBuf,
}

impl InventoryPaths {
    /// Create a new InventoryPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, InventoryError> {
        let base_dir = if let Ok(custom) = std::env::var("INVENTORY_CLI_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create InventoryPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Fixed-width product store
    pub fn store_file(&self) -> PathBuf {
        self.base_dir.join("inventory.dat")
    }

    /// Scratch file used while rewriting the store
    pub fn store_temp_file(&self) -> PathBuf {
        self.base_dir.join("inventory.dat.tmp")
    }

    /// Binary transaction log
    pub fn transaction_log(&self) -> PathBuf {
        self.base_dir.join("transactions.log")
    }

    /// Get the backup directory
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Copy of the live store taken right before a restore
    pub fn safety_backup(&self) -> PathBuf {
        self.backup_dir().join("safety_restore.bak")
    }

    /// Text audit log, one line per backup attempt
    pub fn backup_log(&self) -> PathBuf {
        self.base_dir.join("backups.log")
    }

    /// Text audit log, one line per retention deletion attempt
    pub fn rotation_log(&self) -> PathBuf {
        self.base_dir.join("rotation.log")
    }

    /// Retention policy config (key=value)
    pub fn retention_config(&self) -> PathBuf {
        self.base_dir.join("retention.cfg")
    }

    /// Ensure the base and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), InventoryError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| InventoryError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| InventoryError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, InventoryError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| InventoryError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("inventory-cli"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, InventoryError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| InventoryError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("inventory-cli"))
}
