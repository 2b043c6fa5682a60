//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod export;
pub mod menu;
pub mod product;
pub mod report;
pub mod rotation;

pub use backup::{handle_backup_command, BackupCommands};
pub use export::{handle_export_command, ExportCommands};
pub use menu::Menu;
pub use product::{handle_product_command, ProductCommands};
pub use report::{handle_log_command, handle_report_command};
pub use rotation::{handle_rotation_command, RotationCommands};
