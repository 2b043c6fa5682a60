//! Service layer for the inventory tracker
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation and transaction logging.

pub mod inventory;

pub use inventory::{InventoryService, DEFAULT_USER};
