//! CLI commands for data export
//!
//! Writes products or transactions as CSV or JSON, to a file or stdout.

use crate::error::{InventoryError, InventoryResult};
use crate::export;
use crate::storage::Storage;
use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (spreadsheet-compatible)
    Csv,
    /// JSON format
    Json,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export all products
    Products {
        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the transaction log
    Transactions {
        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export products and transactions as one JSON document
    All {
        /// Output file path
        output: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> InventoryResult<()> {
    match cmd {
        ExportCommands::Products { format, output } => {
            let products = storage.products.list()?;
            let mut writer = open_output(output.as_deref())?;
            match format {
                ExportFormat::Csv => export::export_products_csv(&products, &mut writer)?,
                ExportFormat::Json => export::export_products_json(&products, &mut writer, true)?,
            }
            finish(writer, output.as_deref(), products.len(), "product")
        }

        ExportCommands::Transactions { format, output } => {
            let transactions = storage.transactions.read_readable()?;
            let mut writer = open_output(output.as_deref())?;
            match format {
                ExportFormat::Csv => export::export_transactions_csv(&transactions, &mut writer)?,
                ExportFormat::Json => {
                    export::export_transactions_json(&transactions, &mut writer, true)?
                }
            }
            finish(writer, output.as_deref(), transactions.len(), "transaction")
        }

        ExportCommands::All { output, pretty } => {
            let mut writer = open_output(Some(&output))?;
            export::export_full_json(storage, &mut writer, pretty)?;
            writer
                .flush()
                .map_err(|e| InventoryError::Export(e.to_string()))?;
            println!("Full inventory exported to: {}", output.display());
            Ok(())
        }
    }
}

fn open_output(output: Option<&Path>) -> InventoryResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                InventoryError::Export(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn finish(mut writer: Box<dyn Write>, output: Option<&Path>, count: usize, noun: &str) -> InventoryResult<()> {
    writer
        .flush()
        .map_err(|e| InventoryError::Export(e.to_string()))?;
    if let Some(path) = output {
        println!("Exported {} {}(s) to: {}", count, noun, path.display());
    }
    Ok(())
}
