//! Core data models for the inventory tracker
//!
//! This module contains the data structures that represent the inventory
//! domain: products and the transactions that audit their mutations.

pub mod product;
pub mod transaction;

pub use product::{parse_price, NewProduct, Product, ProductUpdate, ProductValidationError};
pub use transaction::{Transaction, TransactionKind};
