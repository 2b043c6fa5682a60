//! JSON Export functionality
//!
//! Exports the store and the transaction log as one JSON document with a
//! schema version, or either of them on its own as a JSON array.

use crate::error::InventoryResult;
use crate::models::{Product, Transaction};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full inventory export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub products: Vec<Product>,

    pub transactions: Vec<Transaction>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub product_count: usize,
    pub transaction_count: usize,
    /// Sum of price times quantity at export time
    pub total_value: f64,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> InventoryResult<Self> {
        let products = storage.products.list()?;
        let transactions = storage.transactions.read_readable()?;

        let metadata = ExportMetadata {
            product_count: products.len(),
            transaction_count: transactions.len(),
            total_value: products.iter().map(Product::stock_value).sum(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            products,
            transactions,
            metadata,
        })
    }
}

/// Export the store and log as a single document
pub fn export_full_json<W: Write>(storage: &Storage, writer: W, pretty: bool) -> InventoryResult<()> {
    let export = FullExport::from_storage(storage)?;
    write_json(&export, writer, pretty)
}

/// Export products as a JSON array
pub fn export_products_json<W: Write>(products: &[Product], writer: W, pretty: bool) -> InventoryResult<()> {
    write_json(products, writer, pretty)
}

/// Export transactions as a JSON array
pub fn export_transactions_json<W: Write>(
    transactions: &[Transaction],
    writer: W,
    pretty: bool,
) -> InventoryResult<()> {
    write_json(transactions, writer, pretty)
}

fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, writer: W, pretty: bool) -> InventoryResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryPaths;
    use crate::models::TransactionKind;
    use tempfile::TempDir;

    #[test]
    fn test_products_json() {
        let mut buf = Vec::new();
        export_products_json(&[Product::new(1, "Widget", 9.99, 5, "Tools")], &mut buf, false).unwrap();

        let parsed: Vec<Product> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, vec![Product::new(1, "Widget", 9.99, 5, "Tools")]);
    }

    #[test]
    fn test_transactions_json_uses_lowercase_kind() {
        let txn = Transaction::new(TransactionKind::Restock, 1, "system");
        let mut buf = Vec::new();
        export_transactions_json(&[txn], &mut buf, true).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"kind\": \"restock\""));
    }

    #[test]
    fn test_full_export() {
        let temp_dir = TempDir::new().unwrap();
        let paths = InventoryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage
            .products
            .add(&Product::new(1, "Widget", 2.0, 3, "Tools"))
            .unwrap();

        let mut buf = Vec::new();
        export_full_json(&storage, &mut buf, false).unwrap();

        let export: FullExport = serde_json::from_slice(&buf).unwrap();
        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.product_count, 1);
        assert_eq!(export.metadata.transaction_count, 0);
        assert!((export.metadata.total_value - 6.0).abs() < 1e-9);
    }
}
