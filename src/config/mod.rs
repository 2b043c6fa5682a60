//! Configuration module for the inventory tracker
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Backup retention policy persistence

pub mod paths;
pub mod settings;

pub use paths::InventoryPaths;
pub use settings::RetentionPolicy;
