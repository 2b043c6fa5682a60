//! Product model
//!
//! A product is one fixed-width record in the store file. Text fields are
//! bounded by the width of their slot in the record.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{InventoryError, InventoryResult};

/// Width in bytes of the name slot
pub const NAME_LEN: usize = 50;

/// Width in bytes of the category slot
pub const CATEGORY_LEN: usize = 30;

/// A stocked product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, always positive
    pub id: i32,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: f64,

    /// Units on hand
    pub quantity: i32,

    /// Free-form category label
    pub category: String,
}

impl Product {
    /// Create a product with an already-assigned id
    pub fn new(
        id: i32,
        name: impl Into<String>,
        price: f64,
        quantity: i32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity,
            category: category.into(),
        }
    }

    /// Stock value of this product (price times quantity)
    pub fn stock_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Check if the product is out of stock
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Validate every field against the record layout
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.id <= 0 {
            return Err(ProductValidationError::NonPositiveId(self.id));
        }
        validate_fields(&self.name, self.price, self.quantity, &self.category)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} (${:.2} x {})", self.id, self.name, self.price, self.quantity)
    }
}

/// Input for a product that does not yet have an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64, quantity: i32, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            category: category.into(),
        }
    }

    /// Attach an id, producing a storable product
    pub fn with_id(self, id: i32) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            category: self.category,
        }
    }

    pub fn validate(&self) -> Result<(), ProductValidationError> {
        validate_fields(&self.name, self.price, self.quantity, &self.category)
    }
}

/// Partial edit of a product; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub category: Option<String>,
}

impl ProductUpdate {
    /// Check if the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.quantity.is_none() && self.category.is_none()
    }

    /// Apply the edit on top of an existing product
    pub fn apply_to(&self, product: &Product) -> Product {
        Product {
            id: product.id,
            name: self.name.clone().unwrap_or_else(|| product.name.clone()),
            price: self.price.unwrap_or(product.price),
            quantity: self.quantity.unwrap_or(product.quantity),
            category: self.category.clone().unwrap_or_else(|| product.category.clone()),
        }
    }
}

fn validate_fields(
    name: &str,
    price: f64,
    quantity: i32,
    category: &str,
) -> Result<(), ProductValidationError> {
    if name.len() > NAME_LEN {
        return Err(ProductValidationError::NameTooLong(name.len()));
    }
    if name.contains('\0') {
        return Err(ProductValidationError::EmbeddedNul("Product name"));
    }
    if category.len() > CATEGORY_LEN {
        return Err(ProductValidationError::CategoryTooLong(category.len()));
    }
    if category.contains('\0') {
        return Err(ProductValidationError::EmbeddedNul("Category"));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(ProductValidationError::InvalidPrice(price));
    }
    if quantity < 0 {
        return Err(ProductValidationError::NegativeQuantity(quantity));
    }
    Ok(())
}

/// Validation errors for products
#[derive(Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    NonPositiveId(i32),
    NameTooLong(usize),
    CategoryTooLong(usize),
    InvalidPrice(f64),
    NegativeQuantity(i32),
    /// Text field holds a NUL byte, which the record layout uses as padding
    EmbeddedNul(&'static str),
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId(id) => write!(f, "Product id must be positive, got {}", id),
            Self::NameTooLong(len) => {
                write!(f, "Product name is too long ({} bytes, max {})", len, NAME_LEN)
            }
            Self::CategoryTooLong(len) => {
                write!(f, "Category is too long ({} bytes, max {})", len, CATEGORY_LEN)
            }
            Self::InvalidPrice(price) => {
                write!(f, "Price must be a non-negative number, got {}", price)
            }
            Self::NegativeQuantity(qty) => {
                write!(f, "Quantity cannot be negative, got {}", qty)
            }
            Self::EmbeddedNul(field) => write!(f, "{} cannot contain a NUL character", field),
        }
    }
}

impl std::error::Error for ProductValidationError {}

impl From<ProductValidationError> for InventoryError {
    fn from(err: ProductValidationError) -> Self {
        InventoryError::InvalidArgument(err.to_string())
    }
}

/// Parse a price entered by the operator
pub fn parse_price(input: &str) -> InventoryResult<f64> {
    let trimmed = input.trim().trim_start_matches('$');
    let price: f64 = trimmed
        .parse()
        .map_err(|_| InventoryError::InvalidArgument(format!("Invalid price: '{}'", input)))?;
    if !price.is_finite() || price < 0.0 {
        return Err(ProductValidationError::InvalidPrice(price).into());
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_product() {
        let product = Product::new(1, "Widget", 9.99, 5, "Tools");
        assert!(product.validate().is_ok());
        assert!((product.stock_value() - 49.95).abs() < 1e-9);
    }

    #[test]
    fn test_validation() {
        let mut product = Product::new(0, "Widget", 9.99, 5, "Tools");
        assert_eq!(product.validate(), Err(ProductValidationError::NonPositiveId(0)));

        product.id = 1;
        product.price = -1.0;
        assert!(matches!(product.validate(), Err(ProductValidationError::InvalidPrice(_))));

        product.price = 1.0;
        product.quantity = -3;
        assert_eq!(product.validate(), Err(ProductValidationError::NegativeQuantity(-3)));

        product.quantity = 0;
        product.name = "x".repeat(NAME_LEN + 1);
        assert!(matches!(product.validate(), Err(ProductValidationError::NameTooLong(_))));
    }

    #[test]
    fn test_nul_in_text_rejected() {
        let product = Product::new(1, "Wid\0get", 1.0, 1, "Tools");
        assert_eq!(
            product.validate(),
            Err(ProductValidationError::EmbeddedNul("Product name"))
        );

        let input = NewProduct::new("Widget", 1.0, 1, "To\0ols");
        assert_eq!(input.validate(), Err(ProductValidationError::EmbeddedNul("Category")));
    }

    #[test]
    fn test_update_apply() {
        let product = Product::new(4, "Bolt", 0.25, 100, "Hardware");
        let update = ProductUpdate {
            price: Some(0.30),
            ..Default::default()
        };

        let updated = update.apply_to(&product);
        assert_eq!(updated.id, 4);
        assert_eq!(updated.name, "Bolt");
        assert_eq!(updated.price, 0.30);
        assert_eq!(updated.quantity, 100);
        assert!(ProductUpdate::default().is_empty());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("9.99").unwrap(), 9.99);
        assert_eq!(parse_price(" $3 ").unwrap(), 3.0);
        assert!(parse_price("abc").unwrap_err().is_invalid_argument());
        assert!(parse_price("-1").unwrap_err().is_invalid_argument());
    }
}
