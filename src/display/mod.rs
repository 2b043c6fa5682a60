//! Display formatting for terminal output
//!
//! Provides utilities for formatting products, the transaction log, and
//! backups as plain-text tables.

pub mod backup;
pub mod product;
pub mod transaction;

pub use backup::{format_backup_list, format_policy, format_rotation_report};
pub use product::{format_product_details, format_product_list};
pub use transaction::{format_transaction_log, format_transaction_row};
