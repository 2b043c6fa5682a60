//! Report and transaction log CLI commands

use crate::display::format_transaction_log;
use crate::error::InventoryResult;
use crate::reports::{format_low_stock, low_stock, InventoryReport};
use crate::storage::Storage;

/// Print the inventory report, or a low-stock alert when a threshold is given
pub fn handle_report_command(storage: &Storage, low_stock_threshold: Option<i32>) -> InventoryResult<()> {
    match low_stock_threshold {
        Some(threshold) => {
            let products = storage.products.list()?;
            print!("{}", format_low_stock(&low_stock(&products, threshold), threshold));
        }
        None => {
            let report = InventoryReport::generate(storage)?;
            print!("{}", report.format_terminal());
        }
    }
    Ok(())
}

/// Print the transaction log, optionally only the most recent entries
pub fn handle_log_command(storage: &Storage, limit: Option<usize>) -> InventoryResult<()> {
    let transactions = match limit {
        Some(n) => storage.transactions.read_recent(n)?,
        None => storage.transactions.read_readable()?,
    };
    print!("{}", format_transaction_log(&transactions));
    Ok(())
}
