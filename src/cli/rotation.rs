//! Rotation (retention policy) CLI commands

use clap::Subcommand;

use crate::backup::RetentionEnforcer;
use crate::config::{InventoryPaths, RetentionPolicy};
use crate::display::{format_policy, format_rotation_report};
use crate::error::{InventoryError, InventoryResult};

/// Rotation subcommands
#[derive(Subcommand)]
pub enum RotationCommands {
    /// Show the current retention policy
    Show,

    /// Change the retention policy (0 disables a rule)
    Set {
        /// Keep only this many of the newest backups
        #[arg(short, long)]
        count: Option<i32>,

        /// Delete backups older than this many days
        #[arg(short, long)]
        days: Option<i32>,
    },

    /// Apply the retention policy now
    Run,
}

/// Handle a rotation command
pub fn handle_rotation_command(paths: &InventoryPaths, cmd: RotationCommands) -> InventoryResult<()> {
    let mut policy = RetentionPolicy::load(paths)?;

    match cmd {
        RotationCommands::Show => {
            print!("{}", format_policy(&policy));
            println!("Config file: {}", paths.retention_config().display());
        }

        RotationCommands::Set { count, days } => {
            if count.is_none() && days.is_none() {
                return Err(InventoryError::InvalidArgument(
                    "Nothing to set. Use --count and/or --days".into(),
                ));
            }
            if let Some(count) = count {
                policy.retain_count = count;
            }
            if let Some(days) = days {
                policy.retain_days = days;
            }
            policy.save(paths)?;
            println!("Retention policy saved.");
            print!("{}", format_policy(&policy));
        }

        RotationCommands::Run => {
            let report = RetentionEnforcer::new(paths).enforce(&policy)?;
            print!("{}", format_rotation_report(&report));
            println!("Details: {}", paths.rotation_log().display());
        }
    }

    Ok(())
}
