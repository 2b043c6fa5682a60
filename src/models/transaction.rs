//! Transaction model
//!
//! Audit records of every product mutation. Transactions are append-only:
//! they are never edited or removed once written.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation recorded by a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Add,
    Update,
    Delete,
    Restock,
    Sale,
}

impl TransactionKind {
    /// Get all kinds, in on-disk tag order
    pub fn all() -> &'static [TransactionKind] {
        &[
            Self::Add,
            Self::Update,
            Self::Delete,
            Self::Restock,
            Self::Sale,
        ]
    }

    /// Tag byte stored in the log record
    pub fn tag(&self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Update => 1,
            Self::Delete => 2,
            Self::Restock => 3,
            Self::Sale => 4,
        }
    }

    /// Decode a tag byte
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Add),
            1 => Some(Self::Update),
            2 => Some(Self::Delete),
            3 => Some(Self::Restock),
            4 => Some(Self::Sale),
            _ => None,
        }
    }

    /// Upper-case name shown in the log view
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Restock => "RESTOCK",
            Self::Sale => "SALE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// When the mutation happened (second resolution)
    pub timestamp: DateTime<Utc>,

    pub kind: TransactionKind,

    pub product_id: i32,

    /// Change in units on hand
    pub quantity_change: i32,

    /// Change in unit price
    pub price_change: f64,

    pub description: String,

    /// Acting user
    pub user: String,
}

impl Transaction {
    /// Create a transaction stamped with the current time
    pub fn new(kind: TransactionKind, product_id: i32, user: impl Into<String>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            timestamp: Utc.timestamp_opt(now, 0).single().unwrap_or_else(Utc::now),
            kind,
            product_id,
            quantity_change: 0,
            price_change: 0.0,
            description: String::new(),
            user: user.into(),
        }
    }

    /// Set the quantity delta
    pub fn with_quantity_change(mut self, delta: i32) -> Self {
        self.quantity_change = delta;
        self
    }

    /// Set the price delta
    pub fn with_price_change(mut self, delta: f64) -> Self {
        self.price_change = delta;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Timestamp rendered in local time
    pub fn local_time(&self) -> DateTime<Local> {
        self.timestamp.with_timezone(&Local)
    }
}
