//! Product display formatting
//!
//! Formats products for terminal output in table and detail views.

use crate::models::Product;

/// Format a list of products as a table
pub fn format_product_list(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }

    let name_width = products
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let category_width = products
        .iter()
        .map(|p| p.category.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>5}  {:<name_width$}  {:>10}  {:>8}  {:<category_width$}\n",
        "ID",
        "Name",
        "Price",
        "Qty",
        "Category",
        name_width = name_width,
        category_width = category_width,
    ));

    output.push_str(&format!(
        "{:->5}  {:-<name_width$}  {:->10}  {:->8}  {:-<category_width$}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        category_width = category_width,
    ));

    for product in products {
        output.push_str(&format!(
            "{:>5}  {:<name_width$}  {:>10}  {:>8}  {:<category_width$}\n",
            product.id,
            product.name,
            format!("${:.2}", product.price),
            product.quantity,
            product.category,
            name_width = name_width,
            category_width = category_width,
        ));
    }

    output.push_str(&format!("\n{} product(s)\n", products.len()));
    output
}

/// Format product details
pub fn format_product_details(product: &Product) -> String {
    let mut output = String::new();

    output.push_str(&format!("ID:       {}\n", product.id));
    output.push_str(&format!("Name:     {}\n", product.name));
    output.push_str(&format!("Price:    ${:.2}\n", product.price));
    output.push_str(&format!("Quantity: {}\n", product.quantity));
    output.push_str(&format!("Category: {}\n", product.category));
    output.push_str(&format!("Value:    ${:.2}\n", product.stock_value()));

    if product.is_out_of_stock() {
        output.push_str("Status:   OUT OF STOCK\n");
    }

    output
}
