//! Inventory Report
//!
//! Tabulates every product with the stock summary: total value, low-stock
//! items and out-of-stock items.

use crate::error::{InventoryError, InventoryResult};
use crate::models::Product;
use crate::storage::Storage;
use std::io::Write;

/// Products with fewer units than this (but more than zero) count as low stock
pub const LOW_STOCK_LIMIT: i32 = 10;

/// One product line of the report
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
    /// Price times quantity
    pub value: f64,
}

impl From<&Product> for InventoryRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: product.quantity,
            category: product.category.clone(),
            value: product.stock_value(),
        }
    }
}

/// Stock summary across all products
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySummary {
    /// Sum of price times quantity
    pub total_value: f64,
    /// Products with 0 < quantity < 10
    pub low_stock_count: usize,
    /// Products with quantity 0
    pub out_of_stock_count: usize,
}

/// Inventory Report
#[derive(Debug, Clone)]
pub struct InventoryReport {
    /// One row per product, in store order
    pub rows: Vec<InventoryRow>,
    pub summary: InventorySummary,
}

impl InventoryReport {
    /// Build a report from a list of products
    pub fn build(products: &[Product]) -> Self {
        let mut summary = InventorySummary::default();
        let mut rows = Vec::with_capacity(products.len());

        for product in products {
            summary.total_value += product.stock_value();
            if product.is_out_of_stock() {
                summary.out_of_stock_count += 1;
            } else if product.quantity < LOW_STOCK_LIMIT {
                summary.low_stock_count += 1;
            }
            rows.push(InventoryRow::from(product));
        }

        Self { rows, summary }
    }

    /// Generate a report from the live store
    pub fn generate(storage: &Storage) -> InventoryResult<Self> {
        Ok(Self::build(&storage.products.list()?))
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Inventory Report\n");
        output.push_str(&"=".repeat(64));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("Inventory is empty.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<5} {:<20} {:>10} {:>8}  {:<15}\n",
            "ID", "Name", "Price", "Qty", "Category"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<5} {:<20} {:>10} {:>8}  {:<15}\n",
                row.id,
                truncate(&row.name, 20),
                format!("${:.2}", row.price),
                row.quantity,
                truncate(&row.category, 15)
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "Total Inventory Value:  {:>12}\n",
            format!("${:.2}", self.summary.total_value)
        ));
        output.push_str(&format!(
            "Low Stock Items (<{}):  {:>12}\n",
            LOW_STOCK_LIMIT, self.summary.low_stock_count
        ));
        output.push_str(&format!(
            "Out-of-Stock Items:     {:>12}\n",
            self.summary.out_of_stock_count
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> InventoryResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["ID", "Name", "Price", "Quantity", "Category", "Value"])?;

        for row in &self.rows {
            csv.write_record([
                row.id.to_string(),
                row.name.clone(),
                format!("{:.2}", row.price),
                row.quantity.to_string(),
                row.category.clone(),
                format!("{:.2}", row.value),
            ])?;
        }

        csv.flush()
            .map_err(|e| InventoryError::Export(e.to_string()))?;
        Ok(())
    }
}

/// Products with fewer than `threshold` units on hand, in store order
pub fn low_stock(products: &[Product], threshold: i32) -> Vec<&Product> {
    products.iter().filter(|p| p.quantity < threshold).collect()
}

/// Format a low-stock alert list
pub fn format_low_stock(items: &[&Product], threshold: i32) -> String {
    let mut output = format!("Low Stock Alert (threshold: {})\n", threshold);
    output.push_str(&"=".repeat(40));
    output.push('\n');

    if items.is_empty() {
        output.push_str("No items below stock threshold\n");
        return output;
    }

    for product in items {
        output.push_str(&format!(
            "! {} (ID: {}) - only {} left\n",
            product.name, product.id, product.quantity
        ));
    }
    output
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> Vec<Product> {
        vec![
            Product::new(1, "Widget", 2.50, 4, "Tools"),
            Product::new(2, "Gadget", 10.0, 0, "Toys"),
            Product::new(3, "Sprocket", 1.0, 25, "Parts"),
            Product::new(4, "Bolt", 0.10, 10, "Parts"),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let report = InventoryReport::build(&products());

        assert_eq!(report.rows.len(), 4);
        assert!((report.summary.total_value - 36.0).abs() < 1e-9);
        assert_eq!(report.summary.low_stock_count, 1);
        assert_eq!(report.summary.out_of_stock_count, 1);
    }

    #[test]
    fn test_empty_report() {
        let report = InventoryReport::build(&[]);
        assert_eq!(report.summary, InventorySummary::default());
        assert!(report.format_terminal().contains("Inventory is empty"));
    }

    #[test]
    fn test_format_terminal() {
        let output = InventoryReport::build(&products()).format_terminal();
        assert!(output.contains("Widget"));
        assert!(output.contains("$36.00"));
        assert!(output.contains("Out-of-Stock Items"));
    }

    #[test]
    fn test_export_csv() {
        let report = InventoryReport::build(&products()[..1]);
        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "ID,Name,Price,Quantity,Category,Value\n1,Widget,2.50,4,Tools,10.00\n"
        );
    }

    #[test]
    fn test_low_stock_threshold() {
        let all = products();
        let low: Vec<i32> = low_stock(&all, 10).iter().map(|p| p.id).collect();
        assert_eq!(low, vec![1, 2]);

        assert!(low_stock(&all, 0).is_empty());
        assert!(format_low_stock(&[], 5).contains("No items below stock threshold"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long product name", 10), "a very ...");
    }
}
