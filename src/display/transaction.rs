//! Transaction log display formatting

use crate::models::Transaction;

/// Format a single log entry
pub fn format_transaction_row(txn: &Transaction) -> String {
    let price = if txn.price_change != 0.0 {
        format!("${:.2}", txn.price_change)
    } else {
        "-".to_string()
    };

    format!(
        "{:19} | {:8} | {:>+6} | {:>9} | {:>5} | {} ({})",
        txn.local_time().format("%Y-%m-%d %H:%M:%S"),
        txn.kind.display_name(),
        txn.quantity_change,
        price,
        txn.product_id,
        txn.description,
        txn.user
    )
}

/// Format a list of transactions as a log table
pub fn format_transaction_log(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions recorded.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:19} | {:8} | {:>6} | {:>9} | {:>5} | {}\n",
        "Timestamp", "Type", "Qty", "Price", "ID", "Description"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;

    #[test]
    fn test_row_placeholder_for_unchanged_price() {
        let txn = Transaction::new(TransactionKind::Restock, 4, "alice")
            .with_quantity_change(3)
            .with_description("Restocked 3 units of Widget");

        let row = format_transaction_row(&txn);
        assert!(row.contains("RESTOCK"));
        assert!(row.contains("    +3 |"));
        assert!(row.contains(&format!("| {:>9} |", "-")));
        assert!(row.ends_with("Restocked 3 units of Widget (alice)"));
    }

    #[test]
    fn test_row_shows_price_change() {
        let txn = Transaction::new(TransactionKind::Update, 1, "system").with_price_change(-1.5);
        assert!(format_transaction_row(&txn).contains("$-1.50"));
    }

    #[test]
    fn test_empty_log() {
        assert_eq!(format_transaction_log(&[]), "No transactions recorded.\n");
    }
}
