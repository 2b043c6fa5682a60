use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use inventory::cli::{
    handle_backup_command, handle_export_command, handle_log_command, handle_product_command,
    handle_report_command, handle_rotation_command, BackupCommands, ExportCommands, Menu,
    ProductCommands, RotationCommands,
};
use inventory::config::{InventoryPaths, RetentionPolicy};
use inventory::services::DEFAULT_USER;
use inventory::storage::Storage;

#[derive(Parser)]
#[command(
    name = "inventory",
    version,
    about = "File-backed inventory tracker with rolling backups",
    long_about = "Keeps products in a fixed-width binary store, records every change \
                  in a transaction log, and takes timestamped backups pruned by a \
                  retention policy. Run without a subcommand for the interactive menu."
)]
struct Cli {
    /// Directory holding the store, logs, and backups
    #[arg(long, global = true, env = "INVENTORY_CLI_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// User recorded on transactions
    #[arg(long, global = true, env = "INVENTORY_USER", default_value = DEFAULT_USER)]
    user: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Product management commands
    #[command(subcommand)]
    Product(ProductCommands),

    /// Show the inventory report
    Report {
        /// List products with fewer units than this instead
        #[arg(long)]
        low_stock: Option<i32>,
    },

    /// Show the transaction log
    Log {
        /// Only the most recent N entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Backup retention policy commands
    #[command(subcommand)]
    Rotation(RotationCommands),

    /// Export data to CSV or JSON
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show current configuration and paths
    Config,

    /// Launch the interactive menu
    Menu,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => InventoryPaths::with_base_dir(dir),
        None => InventoryPaths::new()?,
    };
    let mut storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Product(cmd)) => handle_product_command(&mut storage, &cli.user, cmd)?,
        Some(Commands::Report { low_stock }) => handle_report_command(&storage, low_stock)?,
        Some(Commands::Log { limit }) => handle_log_command(&storage, limit)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&mut storage, cmd)?,
        Some(Commands::Rotation(cmd)) => handle_rotation_command(&paths, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Config) => {
            let policy = RetentionPolicy::load(&paths)?;
            println!("Inventory Configuration");
            println!("=======================");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Product store:    {}", paths.store_file().display());
            println!("Transaction log:  {}", paths.transaction_log().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Retention config: {}", paths.retention_config().display());
            println!();
            println!("Retention policy:");
            println!("  retain_count: {}", policy.retain_count);
            println!("  retain_days:  {}", policy.retain_days);
            println!("Acting user: {}", cli.user);
        }
        Some(Commands::Menu) | None => {
            let stdin = io::stdin();
            Menu::new(&mut storage, cli.user, stdin.lock(), io::stdout()).run()?;
        }
    }

    Ok(())
}
