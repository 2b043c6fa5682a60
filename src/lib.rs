//! Inventory CLI - file-backed inventory tracker
//!
//! This library provides the core functionality of the inventory tracker:
//! a fixed-width binary product store, an append-only transaction log, and
//! timestamped backups with a retention policy and a guarded restore.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and the retention policy file
//! - `error`: Custom error types
//! - `models`: Products and transactions
//! - `storage`: Binary record store and transaction log
//! - `services`: Mutations paired with their audit records
//! - `backup`: Snapshots, retention, and restore
//! - `reports`, `display`, `export`: Read-only views of the data
//! - `cli`: Subcommand handlers and the interactive menu
//!
//! # Example
//!
//! ```rust,ignore
//! use inventory::config::InventoryPaths;
//! use inventory::models::NewProduct;
//! use inventory::services::InventoryService;
//! use inventory::storage::Storage;
//!
//! let mut storage = Storage::new(InventoryPaths::new()?)?;
//! let mut service = InventoryService::new(&mut storage);
//! let widget = service.add_product(NewProduct::new("Widget", 9.99, 5, "Tools"))?;
//! service.restock(widget.id, 3)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{InventoryError, InventoryResult};
