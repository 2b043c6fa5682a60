//! Interactive numbered menu
//!
//! Runs when the binary is started without a subcommand. Every failure is
//! printed and the loop continues; only Exit (or end of input) ends it.

use std::io::{BufRead, Write};

use crate::backup::{BackupManager, RestoreManager, RetentionEnforcer};
use crate::config::RetentionPolicy;
use crate::display::{
    format_backup_list, format_policy, format_product_details, format_product_list,
    format_rotation_report, format_transaction_log,
};
use crate::error::{InventoryError, InventoryResult};
use crate::models::{parse_price, NewProduct, ProductUpdate};
use crate::reports::InventoryReport;
use crate::services::InventoryService;
use crate::storage::Storage;

const MAIN_MENU: &[&str] = &[
    "Add New Product",
    "List All Products",
    "Update Product",
    "Delete Product",
    "Search Product",
    "Restock Product",
    "Sell Product",
    "Generate Report",
    "View Transaction Log",
    "Create Backup",
    "Restore Backup",
    "Configure Backup Rotation",
    "Exit",
];

const ROTATION_MENU: &[&str] = &[
    "Set Maximum Backup Count",
    "Set Maximum Backup Age",
    "View Current Policy",
    "Run Rotation Now",
    "Return to Main Menu",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The numbered menu over any line-based input and text output
pub struct Menu<'a, R, W> {
    storage: &'a mut Storage,
    user: String,
    input: R,
    output: W,
    closed: bool,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(storage: &'a mut Storage, user: impl Into<String>, input: R, output: W) -> Self {
        Self {
            storage,
            user: user.into(),
            input,
            output,
            closed: false,
        }
    }

    /// Run until Exit is chosen or input ends
    pub fn run(&mut self) -> InventoryResult<()> {
        writeln!(self.output, "=== Inventory Management System ===")?;

        loop {
            self.print_menu("Main Menu", MAIN_MENU)?;
            let choice = match self.prompt_number("Enter your choice") {
                Ok(choice) => choice,
                Err(_) if self.closed => break,
                Err(e) => return Err(e),
            };

            match self.dispatch(choice) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(_) if self.closed => break,
                Err(e) => {
                    tracing::debug!(error = %e, choice, "menu action failed");
                    writeln!(self.output, "\nError: {}", e)?;
                }
            }
        }

        writeln!(self.output, "Closing Inventory System... Goodbye!")?;
        Ok(())
    }

    fn dispatch(&mut self, choice: i64) -> InventoryResult<Flow> {
        match choice {
            1 => self.add_product()?,
            2 => self.list_products()?,
            3 => self.update_product()?,
            4 => self.delete_product()?,
            5 => self.search_product()?,
            6 => self.restock()?,
            7 => self.sell()?,
            8 => self.report()?,
            9 => self.view_log()?,
            10 => self.create_backup()?,
            11 => self.restore_backup()?,
            12 => self.rotation_menu()?,
            13 => return Ok(Flow::Exit),
            _ => writeln!(self.output, "\nInvalid choice! Please enter a valid option.")?,
        }
        Ok(Flow::Continue)
    }

    fn service(&mut self) -> InventoryService<'_> {
        InventoryService::new(&mut *self.storage).with_user(self.user.clone())
    }

    fn add_product(&mut self) -> InventoryResult<()> {
        let name = self.prompt_line("Enter product name")?;
        let price = self.prompt_price("Enter price")?;
        let quantity = self.prompt_i32("Enter quantity")?;
        let category = self.prompt_line("Enter category")?;

        let product = self
            .service()
            .add_product(NewProduct::new(name, price, quantity, category))?;
        writeln!(self.output, "\nProduct added successfully! ID: {}", product.id)?;
        Ok(())
    }

    fn list_products(&mut self) -> InventoryResult<()> {
        let products = self.service().list()?;
        writeln!(self.output, "\n=== Inventory Listing ===")?;
        write!(self.output, "{}", format_product_list(&products))?;
        Ok(())
    }

    fn update_product(&mut self) -> InventoryResult<()> {
        let id = self.prompt_i32("Enter product ID to update")?;
        let current = self.service().require(id)?;

        writeln!(self.output, "\nCurrent product details:")?;
        write!(self.output, "{}", format_product_details(&current))?;
        writeln!(self.output, "\nEnter new details (blank keeps the current value):")?;

        let name = self.prompt_optional(&format!("Name [{}]", current.name))?;
        let price = match self.prompt_optional(&format!("Price [{:.2}]", current.price))? {
            Some(text) => Some(parse_price(&text)?),
            None => None,
        };
        let quantity = match self.prompt_optional(&format!("Quantity [{}]", current.quantity))? {
            Some(text) => Some(parse_i32(&text)?),
            None => None,
        };
        let category = self.prompt_optional(&format!("Category [{}]", current.category))?;

        let update = ProductUpdate {
            name,
            price,
            quantity,
            category,
        };
        if update.is_empty() {
            writeln!(self.output, "\nNothing changed.")?;
            return Ok(());
        }

        self.service().update_product(id, &update)?;
        writeln!(self.output, "\nProduct updated successfully!")?;
        Ok(())
    }

    fn delete_product(&mut self) -> InventoryResult<()> {
        let id = self.prompt_i32("Enter product ID to delete")?;
        let removed = self.service().delete_product(id)?;
        writeln!(self.output, "\nProduct deleted successfully! ({})", removed.name)?;
        Ok(())
    }

    fn search_product(&mut self) -> InventoryResult<()> {
        let id = self.prompt_i32("Enter product ID to search")?;
        let product = self.service().require(id)?;
        writeln!(self.output)?;
        write!(self.output, "{}", format_product_details(&product))?;
        Ok(())
    }

    fn restock(&mut self) -> InventoryResult<()> {
        let id = self.prompt_i32("Enter product ID to restock")?;
        let quantity = self.prompt_i32("Enter quantity to add")?;
        let product = self.service().restock(id, quantity)?;
        writeln!(
            self.output,
            "\nRestock successful! {} now has {} units.",
            product.name, product.quantity
        )?;
        Ok(())
    }

    fn sell(&mut self) -> InventoryResult<()> {
        let id = self.prompt_i32("Enter product ID to sell")?;
        let quantity = self.prompt_i32("Enter quantity to sell")?;
        let product = self.service().sell(id, quantity)?;
        writeln!(
            self.output,
            "\nSale successful! {} has {} units left.",
            product.name, product.quantity
        )?;
        Ok(())
    }

    fn report(&mut self) -> InventoryResult<()> {
        let report = InventoryReport::generate(&*self.storage)?;
        writeln!(self.output)?;
        write!(self.output, "{}", report.format_terminal())?;
        Ok(())
    }

    fn view_log(&mut self) -> InventoryResult<()> {
        let transactions = self.storage.transactions.read_readable()?;
        writeln!(self.output, "\n=== Transaction Log ===")?;
        write!(self.output, "{}", format_transaction_log(&transactions))?;
        Ok(())
    }

    fn backup_manager(&self) -> InventoryResult<BackupManager> {
        let paths = self.storage.paths().clone();
        let policy = RetentionPolicy::load(&paths)?;
        Ok(BackupManager::new(paths, policy))
    }

    fn create_backup(&mut self) -> InventoryResult<()> {
        let created = self.backup_manager()?.create_backup()?;
        writeln!(self.output, "\nBackup created successfully! {}", created.path.display())?;
        if !created.rotation.is_empty() {
            write!(self.output, "{}", format_rotation_report(&created.rotation))?;
        }
        Ok(())
    }

    fn restore_backup(&mut self) -> InventoryResult<()> {
        let manager = self.backup_manager()?;
        let backups = manager.list_backups()?;

        writeln!(self.output)?;
        write!(self.output, "{}", format_backup_list(&backups))?;
        if backups.is_empty() {
            return Ok(());
        }

        let number = self.prompt_number("Enter backup number to restore")?;
        if number < 1 {
            return Err(InventoryError::InvalidArgument(
                "Backup numbers start at 1".into(),
            ));
        }
        let entry = manager.select((number - 1) as usize)?;

        let answer = self.prompt_line(&format!("Overwrite the store with {}? (y/n)", entry.filename))?;
        if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
            writeln!(self.output, "\nRestore cancelled.")?;
            return Ok(());
        }

        let result = RestoreManager::new(self.storage.paths().clone()).restore_from_file(&entry.path)?;
        self.storage.products.resync_ids()?;
        writeln!(self.output, "\nRestoration successful! {}", result.summary())?;
        Ok(())
    }

    fn rotation_menu(&mut self) -> InventoryResult<()> {
        let paths = self.storage.paths().clone();

        loop {
            self.print_menu("Backup Rotation Settings", ROTATION_MENU)?;
            let choice = self.prompt_number("Enter your choice")?;
            let mut policy = RetentionPolicy::load(&paths)?;

            let outcome = match choice {
                1 => self.prompt_i32("Keep how many backups (0 disables)").and_then(|n| {
                    policy.retain_count = n;
                    policy.save(&paths)
                }),
                2 => self.prompt_i32("Delete backups older than how many days (0 disables)").and_then(|n| {
                    policy.retain_days = n;
                    policy.save(&paths)
                }),
                3 => {
                    writeln!(self.output)?;
                    write!(self.output, "{}", format_policy(&policy))?;
                    Ok(())
                }
                4 => RetentionEnforcer::new(&paths).enforce(&policy).and_then(|report| {
                    writeln!(self.output)?;
                    write!(self.output, "{}", format_rotation_report(&report))?;
                    writeln!(self.output, "Check {} for details.", paths.rotation_log().display())?;
                    Ok(())
                }),
                5 => return Ok(()),
                _ => {
                    writeln!(self.output, "Invalid choice!")?;
                    Ok(())
                }
            };

            match outcome {
                Ok(()) if choice == 1 || choice == 2 => writeln!(self.output, "\nPolicy saved.")?,
                Ok(()) => {}
                Err(e) if self.closed => return Err(e),
                Err(e) => writeln!(self.output, "\nError: {}", e)?,
            }
        }
    }

    fn print_menu(&mut self, title: &str, entries: &[&str]) -> InventoryResult<()> {
        writeln!(self.output, "\n===== {} =====", title)?;
        for (i, entry) in entries.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, entry)?;
        }
        Ok(())
    }

    /// Read one trimmed line; end of input closes the menu
    fn prompt_line(&mut self, prompt: &str) -> InventoryResult<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.closed = true;
            return Err(InventoryError::InvalidArgument("Input closed".into()));
        }
        Ok(line.trim().to_string())
    }

    fn prompt_optional(&mut self, prompt: &str) -> InventoryResult<Option<String>> {
        let line = self.prompt_line(prompt)?;
        Ok(if line.is_empty() { None } else { Some(line) })
    }

    /// Re-prompt until a whole number is entered
    fn prompt_number(&mut self, prompt: &str) -> InventoryResult<i64> {
        loop {
            let line = self.prompt_line(prompt)?;
            match line.parse::<i64>() {
                Ok(n) => return Ok(n),
                Err(_) => writeln!(self.output, "Invalid input! Please enter a number.")?,
            }
        }
    }

    fn prompt_i32(&mut self, prompt: &str) -> InventoryResult<i32> {
        loop {
            let line = self.prompt_line(prompt)?;
            match parse_i32(&line) {
                Ok(n) => return Ok(n),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    fn prompt_price(&mut self, prompt: &str) -> InventoryResult<f64> {
        loop {
            let line = self.prompt_line(prompt)?;
            match parse_price(&line) {
                Ok(price) => return Ok(price),
                Err(_) => writeln!(self.output, "Invalid price. Please enter a non-negative number.")?,
            }
        }
    }
}

fn parse_i32(text: &str) -> InventoryResult<i32> {
    text.trim()
        .parse()
        .map_err(|_| InventoryError::InvalidArgument(format!("Invalid number: '{}'", text.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryPaths;
    use crate::models::TransactionKind;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_script(storage: &mut Storage, script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(storage, "clerk", Cursor::new(script.to_string()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = InventoryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_add_restock_sell() {
        let (_temp, mut storage) = setup();
        let output = run_script(
            &mut storage,
            "1\nWidget\n9.99\n5\nTools\n6\n1\n3\n7\n1\n10\n7\n1\n8\n13\n",
        );

        assert!(output.contains("Product added successfully! ID: 1"));
        assert!(output.contains("Widget now has 8 units"));
        assert!(output.contains("Error: Insufficient stock"));
        assert!(output.contains("Widget has 0 units left"));
        assert!(output.ends_with("Goodbye!\n"));

        assert_eq!(storage.products.get(1).unwrap().unwrap().quantity, 0);
        let kinds: Vec<_> = storage
            .transactions
            .read_all()
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.user))
            .collect();
        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds[0], (TransactionKind::Add, "clerk".to_string()));
        assert_eq!(kinds[2].0, TransactionKind::Sale);
    }

    #[test]
    fn test_invalid_choices_keep_looping() {
        let (_temp, mut storage) = setup();
        let output = run_script(&mut storage, "abc\n42\n5\n99\n13\n");

        assert!(output.contains("Invalid input! Please enter a number."));
        assert!(output.contains("Invalid choice!"));
        assert!(output.contains("Error: Product not found: 99"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_temp, mut storage) = setup();
        let output = run_script(&mut storage, "1\nHalf");
        assert!(output.ends_with("Goodbye!\n"));
        assert!(storage.products.list().unwrap().is_empty());
    }

    #[test]
    fn test_update_keeps_blank_fields() {
        let (_temp, mut storage) = setup();
        run_script(&mut storage, "1\nBolt\n0.25\n100\nParts\n3\n1\n\n0.30\n\n\n13\n");

        let product = storage.products.get(1).unwrap().unwrap();
        assert_eq!(product.name, "Bolt");
        assert!((product.price - 0.30).abs() < 1e-9);
        assert_eq!(product.quantity, 100);
    }

    #[test]
    fn test_backup_and_restore() {
        let (_temp, mut storage) = setup();
        run_script(&mut storage, "1\nWidget\n1\n1\nX\n10\n4\n1\n13\n");
        assert!(storage.products.list().unwrap().is_empty());

        let output = run_script(&mut storage, "11\n1\ny\n13\n");

        assert!(output.contains("Available Backups:"));
        assert!(output.contains("Restoration successful!"));
        assert_eq!(storage.products.get(1).unwrap().unwrap().name, "Widget");
    }

    #[test]
    fn test_rotation_submenu() {
        let (_temp, mut storage) = setup();
        let output = run_script(&mut storage, "12\n1\n3\n2\n-1\n3\n5\n13\n");

        assert!(output.contains("Policy saved."));
        assert!(output.contains("Keep last 3 backups"));
        assert!(output.contains("retain_days must be zero or positive"));

        let policy = RetentionPolicy::load(storage.paths()).unwrap();
        assert_eq!(policy.retain_count, 3);
        assert_eq!(policy.retain_days, 30);
    }
}
