//! Inventory service
//!
//! Provides the business operations on products (add, edit, delete, restock,
//! sell) and records a transaction for every one that succeeds.

use crate::error::{InventoryError, InventoryResult};
use crate::models::{NewProduct, Product, ProductUpdate, Transaction, TransactionKind};
use crate::storage::Storage;

/// User recorded on transactions when none is configured
pub const DEFAULT_USER: &str = "system";

/// Service for product management
pub struct InventoryService<'a> {
    storage: &'a mut Storage,
    user: String,
}

impl<'a> InventoryService<'a> {
    /// Create a new inventory service acting as the default user
    pub fn new(storage: &'a mut Storage) -> Self {
        Self {
            storage,
            user: DEFAULT_USER.to_string(),
        }
    }

    /// Set the user recorded on transactions
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Add a new product, assigning it the next free id
    pub fn add_product(&mut self, input: NewProduct) -> InventoryResult<Product> {
        input.validate()?;

        let id = self.storage.products.generate_id()?;
        let product = input.with_id(id);
        self.storage.products.add(&product)?;

        self.record(
            Transaction::new(TransactionKind::Add, product.id, &self.user)
                .with_quantity_change(product.quantity)
                .with_price_change(product.price)
                .with_description(format!("Added new product: {}", product.name)),
        );

        tracing::info!(id = product.id, name = %product.name, "product added");
        Ok(product)
    }

    /// Get a product by id
    pub fn get(&self, id: i32) -> InventoryResult<Option<Product>> {
        self.storage.products.get(id)
    }

    /// Get a product by id, failing if it doesn't exist
    pub fn require(&self, id: i32) -> InventoryResult<Product> {
        self.get(id)?
            .ok_or_else(|| InventoryError::product_not_found(id))
    }

    /// Get all products in store order
    pub fn list(&self) -> InventoryResult<Vec<Product>> {
        self.storage.products.list()
    }

    /// Edit a product's fields
    pub fn update_product(&mut self, id: i32, update: &ProductUpdate) -> InventoryResult<Product> {
        let existing = self.require(id)?;
        let updated = update.apply_to(&existing);
        let previous = self.storage.products.update(id, &updated)?;

        self.record(
            Transaction::new(TransactionKind::Update, id, &self.user)
                .with_quantity_change(updated.quantity - previous.quantity)
                .with_price_change(updated.price - previous.price)
                .with_description(format!(
                    "Updated {} | Qty {} -> {} | Price ${:.2} -> ${:.2}",
                    previous.name, previous.quantity, updated.quantity, previous.price, updated.price
                )),
        );

        Ok(updated)
    }

    /// Delete a product
    pub fn delete_product(&mut self, id: i32) -> InventoryResult<Product> {
        let removed = self.storage.products.delete(id)?;

        self.record(
            Transaction::new(TransactionKind::Delete, id, &self.user)
                .with_quantity_change(-removed.quantity)
                .with_description(format!("Deleted product: {}", removed.name)),
        );

        tracing::info!(id, "product deleted");
        Ok(removed)
    }

    /// Add units to a product's stock
    pub fn restock(&mut self, id: i32, quantity: i32) -> InventoryResult<Product> {
        let mut product = self.require(id)?;
        if quantity <= 0 {
            return Err(InventoryError::InvalidArgument(format!(
                "Restock quantity must be positive, got {}",
                quantity
            )));
        }

        product.quantity = product.quantity.checked_add(quantity).ok_or_else(|| {
            InventoryError::InvalidArgument(format!("Restock of {} units overflows stock", quantity))
        })?;
        self.storage.products.update(id, &product)?;

        self.record(
            Transaction::new(TransactionKind::Restock, id, &self.user)
                .with_quantity_change(quantity)
                .with_description(format!("Restocked {} units of {}", quantity, product.name)),
        );

        Ok(product)
    }

    /// Remove sold units from a product's stock
    pub fn sell(&mut self, id: i32, quantity: i32) -> InventoryResult<Product> {
        let mut product = self.require(id)?;
        if quantity <= 0 {
            return Err(InventoryError::InvalidArgument(format!(
                "Sale quantity must be positive, got {}",
                quantity
            )));
        }
        if quantity > product.quantity {
            return Err(InventoryError::InsufficientStock {
                product_id: id,
                requested: quantity,
                available: product.quantity,
            });
        }

        product.quantity -= quantity;
        self.storage.products.update(id, &product)?;

        self.record(
            Transaction::new(TransactionKind::Sale, id, &self.user)
                .with_quantity_change(-quantity)
                .with_description(format!("Sold {} units of {}", quantity, product.name)),
        );

        Ok(product)
    }

    /// Append to the transaction log; failures never undo the mutation
    fn record(&self, txn: Transaction) {
        if let Err(e) = self.storage.transactions.append(&txn) {
            tracing::warn!(error = %e, kind = %txn.kind, product_id = txn.product_id, "transaction not logged");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::InventoryPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = InventoryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_widget_lifecycle() {
        let (_temp, mut storage) = create_test_storage();
        let mut service = InventoryService::new(&mut storage);

        let widget = service
            .add_product(NewProduct::new("Widget", 9.99, 5, "Tools"))
            .unwrap();
        assert_eq!(widget.id, 1);

        assert_eq!(service.restock(1, 3).unwrap().quantity, 8);

        let err = service.sell(1, 10).unwrap_err();
        assert!(err.is_insufficient_stock());
        assert_eq!(service.require(1).unwrap().quantity, 8);

        assert_eq!(service.sell(1, 8).unwrap().quantity, 0);

        service.delete_product(1).unwrap();
        assert!(service.get(1).unwrap().is_none());

        let kinds: Vec<_> = storage
            .transactions
            .read_all()
            .unwrap()
            .iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TransactionKind::Add,
                TransactionKind::Restock,
                TransactionKind::Sale,
                TransactionKind::Delete
            ]
        );
    }

    #[test]
    fn test_non_positive_quantities_rejected() {
        let (_temp, mut storage) = create_test_storage();
        let mut service = InventoryService::new(&mut storage);
        service.add_product(NewProduct::new("Bolt", 0.1, 10, "Hardware")).unwrap();

        assert!(service.restock(1, 0).unwrap_err().is_invalid_argument());
        assert!(service.sell(1, -2).unwrap_err().is_invalid_argument());
        assert_eq!(service.require(1).unwrap().quantity, 10);
    }

    #[test]
    fn test_missing_product_is_not_found() {
        let (_temp, mut storage) = create_test_storage();
        let mut service = InventoryService::new(&mut storage);

        assert!(service.restock(9, 1).unwrap_err().is_not_found());
        assert!(service.sell(9, 1).unwrap_err().is_not_found());
        assert!(service.delete_product(9).unwrap_err().is_not_found());
        assert!(service
            .update_product(9, &ProductUpdate::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_update_records_deltas() {
        let (_temp, mut storage) = create_test_storage();
        let mut service = InventoryService::new(&mut storage).with_user("alice");
        service.add_product(NewProduct::new("Nut", 1.0, 10, "Hardware")).unwrap();

        let update = ProductUpdate {
            price: Some(1.5),
            quantity: Some(4),
            ..Default::default()
        };
        let updated = service.update_product(1, &update).unwrap();
        assert_eq!(updated.name, "Nut");

        let log = storage.transactions.read_all().unwrap();
        let last = log.last().unwrap();
        assert_eq!(last.kind, TransactionKind::Update);
        assert_eq!(last.quantity_change, -6);
        assert!((last.price_change - 0.5).abs() < 1e-9);
        assert_eq!(last.user, "alice");
        assert_eq!(last.description, "Updated Nut | Qty 10 -> 4 | Price $1.00 -> $1.50");
    }

    #[test]
    fn test_logging_failure_does_not_undo_add() {
        let temp_dir = TempDir::new().unwrap();
        let paths = InventoryPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        std::fs::create_dir(temp_dir.path().join("transactions.log")).unwrap();

        let mut service = InventoryService::new(&mut storage);
        let product = service.add_product(NewProduct::new("Gear", 2.0, 1, "Parts")).unwrap();

        assert_eq!(service.require(product.id).unwrap(), product);
    }
}
