//! Fixed-width binary record layouts
//!
//! Product record layout (96 bytes, little-endian, no header):
//! ```text
//! [id:4][name:50][price:8][quantity:4][category:30]
//! ```
//!
//! Transaction record layout (155 bytes, little-endian):
//! ```text
//! [timestamp:8][kind:1][product_id:4][quantity_change:4][price_change:8]
//! [description:100][user:30]
//! ```
//!
//! Text slots hold UTF-8 padded with NUL bytes. A value that fills its slot
//! has no terminator.

use std::io::{self, Read};

use chrono::{DateTime, Utc};

use crate::error::{InventoryError, InventoryResult};
use crate::models::product::{CATEGORY_LEN, NAME_LEN};
use crate::models::{Product, Transaction, TransactionKind};

pub const DESCRIPTION_LEN: usize = 100;
pub const USER_LEN: usize = 30;

pub const PRODUCT_RECORD_SIZE: usize = 4 + NAME_LEN + 8 + 4 + CATEGORY_LEN;
pub const TRANSACTION_RECORD_SIZE: usize = 8 + 1 + 4 + 4 + 8 + DESCRIPTION_LEN + USER_LEN;

/// Encode a product into its record.
///
/// Text longer than its slot is cut at a char boundary; callers validate
/// products before they reach the store so this only matters for log text.
pub fn encode_product(product: &Product) -> [u8; PRODUCT_RECORD_SIZE] {
    let mut buf = [0u8; PRODUCT_RECORD_SIZE];
    let mut w = SlotWriter::new(&mut buf);
    w.put(&product.id.to_le_bytes());
    w.put_text(&product.name, NAME_LEN);
    w.put(&product.price.to_le_bytes());
    w.put(&product.quantity.to_le_bytes());
    w.put_text(&product.category, CATEGORY_LEN);
    buf
}

/// Decode a product record
pub fn decode_product(buf: &[u8; PRODUCT_RECORD_SIZE]) -> Product {
    let mut r = SlotReader::new(buf);
    Product {
        id: r.i32(),
        name: r.text(NAME_LEN),
        price: r.f64(),
        quantity: r.i32(),
        category: r.text(CATEGORY_LEN),
    }
}

/// Encode a transaction into its record
pub fn encode_transaction(txn: &Transaction) -> [u8; TRANSACTION_RECORD_SIZE] {
    let mut buf = [0u8; TRANSACTION_RECORD_SIZE];
    let mut w = SlotWriter::new(&mut buf);
    w.put(&txn.timestamp.timestamp().to_le_bytes());
    w.put(&[txn.kind.tag()]);
    w.put(&txn.product_id.to_le_bytes());
    w.put(&txn.quantity_change.to_le_bytes());
    w.put(&txn.price_change.to_le_bytes());
    w.put_text(&txn.description, DESCRIPTION_LEN);
    w.put_text(&txn.user, USER_LEN);
    buf
}

/// Decode a transaction record
pub fn decode_transaction(buf: &[u8; TRANSACTION_RECORD_SIZE]) -> InventoryResult<Transaction> {
    let mut r = SlotReader::new(buf);
    let seconds = r.i64();
    let tag = r.u8();
    let kind = TransactionKind::from_tag(tag)
        .ok_or_else(|| InventoryError::Validation(format!("Unknown transaction kind tag {}", tag)))?;
    let timestamp = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
        InventoryError::Validation(format!("Transaction timestamp out of range: {}", seconds))
    })?;

    Ok(Transaction {
        timestamp,
        kind,
        product_id: r.i32(),
        quantity_change: r.i32(),
        price_change: r.f64(),
        description: r.text(DESCRIPTION_LEN),
        user: r.text(USER_LEN),
    })
}

/// Read the next whole record into `buf`.
///
/// Returns `Ok(false)` at end of file. A trailing partial record also ends
/// the scan without an error.
pub fn read_record<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    if filled == buf.len() {
        return Ok(true);
    }
    if filled > 0 {
        tracing::debug!(bytes = filled, "ignoring trailing partial record");
    }
    Ok(false)
}

/// Cut `text` to at most `max` bytes without splitting a character
fn truncate_to_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

struct SlotWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SlotWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn put_text(&mut self, text: &str, width: usize) {
        let bytes = truncate_to_boundary(text, width).as_bytes();
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += width;
    }
}

struct SlotReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SlotReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }

    fn i64(&mut self) -> i64 {
        i64::from_le_bytes(self.take())
    }

    fn f64(&mut self) -> f64 {
        f64::from_le_bytes(self.take())
    }

    fn text(&mut self, width: usize) -> String {
        let slot = &self.data[self.pos..self.pos + width];
        self.pos += width;
        let end = slot.iter().position(|&b| b == 0).unwrap_or(width);
        String::from_utf8_lossy(&slot[..end]).into_owned()
    }
}
