//! Export module for the inventory tracker
//!
//! Provides data export in two formats:
//! - CSV: products or transactions, spreadsheet-compatible
//! - JSON: products, transactions, or both in one versioned document

pub mod csv;
pub mod json;

pub use self::csv::{export_products_csv, export_transactions_csv};
pub use self::json::{
    export_full_json, export_products_json, export_transactions_json, FullExport,
    EXPORT_SCHEMA_VERSION,
};
