//! CSV Export functionality
//!
//! Exports products and the transaction log to CSV, one row per record with
//! a header row taken from the field names.

use crate::error::{InventoryError, InventoryResult};
use crate::models::{Product, Transaction};
use std::io::Write;

/// Export products to CSV
pub fn export_products_csv<W: Write>(products: &[Product], writer: W) -> InventoryResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if products.is_empty() {
        csv.write_record(["id", "name", "price", "quantity", "category"])?;
    }
    for product in products {
        csv.serialize(product)?;
    }
    csv.flush().map_err(|e| InventoryError::Export(e.to_string()))
}

/// Export transactions to CSV
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> InventoryResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if transactions.is_empty() {
        csv.write_record([
            "timestamp",
            "kind",
            "product_id",
            "quantity_change",
            "price_change",
            "description",
            "user",
        ])?;
    }
    for txn in transactions {
        csv.serialize(txn)?;
    }
    csv.flush().map_err(|e| InventoryError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;

    #[test]
    fn test_products_csv() {
        let products = vec![
            Product::new(1, "Widget", 9.99, 5, "Tools"),
            Product::new(2, "Nuts, Bolts", 0.5, 100, "Parts"),
        ];
        let mut buf = Vec::new();
        export_products_csv(&products, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,name,price,quantity,category");
        assert_eq!(lines[1], "1,Widget,9.99,5,Tools");
        assert_eq!(lines[2], "2,\"Nuts, Bolts\",0.5,100,Parts");
    }

    #[test]
    fn test_empty_exports_keep_header() {
        let mut buf = Vec::new();
        export_products_csv(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "id,name,price,quantity,category\n");

        let mut buf = Vec::new();
        export_transactions_csv(&[], &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().starts_with("timestamp,kind,"));
    }

    #[test]
    fn test_transactions_csv() {
        let txn = Transaction::new(TransactionKind::Sale, 3, "bob")
            .with_quantity_change(-2)
            .with_description("Sold 2 units of Widget");
        let mut buf = Vec::new();
        export_transactions_csv(&[txn], &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains(",sale,3,-2,"));
        assert!(row.ends_with(",Sold 2 units of Widget,bob"));
    }
}
