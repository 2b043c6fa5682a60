//! Storage layer for the inventory tracker
//!
//! Provides the fixed-width product store, the binary transaction log, and
//! the file helpers the backup subsystem shares with them.

pub mod codec;
pub mod file_io;
pub mod products;
pub mod transactions;

pub use codec::{PRODUCT_RECORD_SIZE, TRANSACTION_RECORD_SIZE};
pub use products::{IdAllocator, ProductIter, ProductStore};
pub use transactions::{TransactionIter, TransactionLog};

use crate::config::paths::InventoryPaths;
use crate::error::InventoryError;

/// Main storage coordinator owning the store and the log
pub struct Storage {
    paths: InventoryPaths,
    pub products: ProductStore,
    pub transactions: TransactionLog,
}

impl Storage {
    /// Open storage under the given paths, creating directories as needed
    pub fn new(paths: InventoryPaths) -> Result<Self, InventoryError> {
        paths.ensure_directories()?;

        Ok(Self {
            products: ProductStore::open(paths.store_file(), paths.store_temp_file())?,
            transactions: TransactionLog::new(paths.transaction_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &InventoryPaths {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = InventoryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("backups").exists());
        assert!(storage.products.list().unwrap().is_empty());
        assert!(!storage.transactions.exists());
    }
}
