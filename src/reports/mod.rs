//! Reports module for the inventory tracker
//!
//! Provides the stock report and the low-stock alert.

pub mod inventory;

pub use inventory::{
    format_low_stock, low_stock, InventoryReport, InventoryRow, InventorySummary, LOW_STOCK_LIMIT,
};
