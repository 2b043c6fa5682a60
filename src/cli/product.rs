//! Product CLI commands
//!
//! Implements CLI commands for adding, editing, and moving stock.

use clap::Subcommand;

use crate::display::{format_product_details, format_product_list};
use crate::error::{InventoryError, InventoryResult};
use crate::models::{parse_price, NewProduct, ProductUpdate};
use crate::services::InventoryService;
use crate::storage::Storage;

/// Product subcommands
#[derive(Subcommand)]
pub enum ProductCommands {
    /// Add a new product
    Add {
        /// Product name
        name: String,
        /// Unit price (e.g. "9.99" or "$9.99")
        price: String,
        /// Units on hand
        #[arg(default_value = "0")]
        quantity: i32,
        /// Category label
        #[arg(short, long, default_value = "")]
        category: String,
    },

    /// List all products
    #[command(alias = "ls")]
    List,

    /// Show a product's details
    Show {
        /// Product ID
        id: i32,
    },

    /// Edit a product's fields
    Update {
        /// Product ID
        id: i32,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New unit price
        #[arg(short, long)]
        price: Option<String>,
        /// New quantity on hand
        #[arg(short, long)]
        quantity: Option<i32>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: i32,
    },

    /// Add units to stock
    Restock {
        /// Product ID
        id: i32,
        /// Units received
        quantity: i32,
    },

    /// Remove sold units from stock
    Sell {
        /// Product ID
        id: i32,
        /// Units sold
        quantity: i32,
    },
}

/// Handle a product command
pub fn handle_product_command(
    storage: &mut Storage,
    user: &str,
    cmd: ProductCommands,
) -> InventoryResult<()> {
    let mut service = InventoryService::new(storage).with_user(user);

    match cmd {
        ProductCommands::Add {
            name,
            price,
            quantity,
            category,
        } => {
            let price = parse_price(&price)?;
            let product = service.add_product(NewProduct::new(name, price, quantity, category))?;
            println!("Product added: {}", product.name);
            println!("  ID: {}", product.id);
        }

        ProductCommands::List => {
            print!("{}", format_product_list(&service.list()?));
        }

        ProductCommands::Show { id } => {
            let product = service.require(id)?;
            print!("{}", format_product_details(&product));
        }

        ProductCommands::Update {
            id,
            name,
            price,
            quantity,
            category,
        } => {
            let update = ProductUpdate {
                name,
                price: price.as_deref().map(parse_price).transpose()?,
                quantity,
                category,
            };
            if update.is_empty() {
                return Err(InventoryError::InvalidArgument(
                    "Nothing to update. Use --name, --price, --quantity or --category".into(),
                ));
            }

            let product = service.update_product(id, &update)?;
            println!("Product updated: {}", product);
        }

        ProductCommands::Delete { id } => {
            let removed = service.delete_product(id)?;
            println!("Product deleted: {}", removed.name);
        }

        ProductCommands::Restock { id, quantity } => {
            let product = service.restock(id, quantity)?;
            println!("Restocked {}: {} units on hand", product.name, product.quantity);
        }

        ProductCommands::Sell { id, quantity } => {
            let product = service.sell(id, quantity)?;
            println!("Sold {} x {}: {} units left", quantity, product.name, product.quantity);
        }
    }

    Ok(())
}
