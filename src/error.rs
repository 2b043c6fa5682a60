//! Custom error types for the inventory tracker
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for inventory operations
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File open/read/write/rename failures
    #[error("I/O error: {0}")]
    Io(String),

    /// No record matches the requested identifier
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Non-positive quantity, malformed input, out-of-range field
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A sale asked for more units than are on hand
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: i32,
        requested: i32,
        available: i32,
    },

    /// Backup size mismatch or restored-data integrity failure
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl InventoryError {
    /// Create a "not found" error for products
    pub fn product_not_found(id: i32) -> Self {
        Self::NotFound {
            entity_type: "Product",
            identifier: id.to_string(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is an insufficient stock error
    pub fn is_insufficient_stock(&self) -> bool {
        matches!(self, Self::InsufficientStock { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<csv::Error> for InventoryError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InventoryError::Config("bad value".into());
        assert_eq!(err.to_string(), "Configuration error: bad value");
    }

    #[test]
    fn test_not_found_error() {
        let err = InventoryError::product_not_found(42);
        assert_eq!(err.to_string(), "Product not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insufficient_stock_error() {
        let err = InventoryError::InsufficientStock {
            product_id: 1,
            requested: 10,
            available: 8,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 1: requested 10, available 8"
        );
        assert!(err.is_insufficient_stock());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InventoryError = io_err.into();
        assert!(matches!(err, InventoryError::Io(_)));
    }
}
