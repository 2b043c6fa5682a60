//! Append-only binary transaction log
//!
//! Each mutation of the product store appends one fixed-width record. The
//! log is never rewritten, so file order is chronological order.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{InventoryError, InventoryResult};
use crate::models::Transaction;

use super::codec::{decode_transaction, encode_transaction, read_record, TRANSACTION_RECORD_SIZE};
use super::file_io::trim_partial_record;

/// Writer and reader for the transaction log file
pub struct TransactionLog {
    path: PathBuf,
}

impl TransactionLog {
    /// Create a log handle for the given path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one record.
    ///
    /// A partial record left by an interrupted write is cut first.
    pub fn append(&self, txn: &Transaction) -> InventoryResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| InventoryError::Io(format!("Failed to open transaction log: {}", e)))?;

        let trimmed = trim_partial_record(&file, TRANSACTION_RECORD_SIZE)?;
        if trimmed != 0 {
            tracing::warn!(bytes = trimmed, "truncated partial record at end of transaction log");
        }

        file.write_all(&encode_transaction(txn))
            .map_err(|e| InventoryError::Io(format!("Failed to write transaction: {}", e)))?;

        file.flush()
            .map_err(|e| InventoryError::Io(format!("Failed to flush transaction log: {}", e)))?;

        Ok(())
    }

    /// Lazily read every record in file order.
    ///
    /// Each call starts over from the beginning of the file. A missing log
    /// yields nothing.
    pub fn iter(&self) -> InventoryResult<TransactionIter> {
        let reader = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(InventoryError::Io(format!(
                    "Failed to open transaction log: {}",
                    e
                )))
            }
        };
        Ok(TransactionIter { reader })
    }

    /// Read all records, oldest first
    pub fn read_all(&self) -> InventoryResult<Vec<Transaction>> {
        self.iter()?.collect()
    }

    /// Read every record that decodes, oldest first.
    ///
    /// Undecodable records are skipped with a warning. Read errors still
    /// fail the call.
    pub fn read_readable(&self) -> InventoryResult<Vec<Transaction>> {
        let mut entries = Vec::new();
        for (index, entry) in self.iter()?.enumerate() {
            match entry {
                Ok(txn) => entries.push(txn),
                Err(e @ InventoryError::Validation(_)) => {
                    tracing::warn!(record = index + 1, error = %e, "skipping unreadable transaction");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(entries)
    }

    /// Read the most recent N readable records, oldest first
    pub fn read_recent(&self, count: usize) -> InventoryResult<Vec<Transaction>> {
        let all = self.read_readable()?;
        let start = all.len().saturating_sub(count);
        Ok(all[start..].to_vec())
    }

    /// Check if the log file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Get the path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Streaming reader over the transaction log
pub struct TransactionIter {
    reader: Option<BufReader<File>>,
}

impl Iterator for TransactionIter {
    type Item = InventoryResult<Transaction>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut buf = [0u8; TRANSACTION_RECORD_SIZE];
        match read_record(reader, &mut buf) {
            Ok(true) => Some(decode_transaction(&buf)),
            Ok(false) => {
                self.reader = None;
                None
            }
            Err(e) => {
                self.reader = None;
                Some(Err(InventoryError::Io(format!(
                    "Failed to read transaction log: {}",
                    e
                ))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use tempfile::TempDir;

    fn create_test_log() -> (TransactionLog, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log = TransactionLog::new(temp_dir.path().join("transactions.log"));
        (log, temp_dir)
    }

    #[test]
    fn test_empty_log() {
        let (log, _temp) = create_test_log();

        assert!(!log.exists());
        assert_eq!(log.iter().unwrap().count(), 0);
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_read_in_order() {
        let (log, _temp) = create_test_log();

        let kinds = [
            TransactionKind::Add,
            TransactionKind::Restock,
            TransactionKind::Sale,
            TransactionKind::Delete,
        ];
        for (i, kind) in kinds.iter().enumerate() {
            let txn = Transaction::new(*kind, 100, "system")
                .with_quantity_change(i as i32)
                .with_description(format!("entry {}", i));
            log.append(&txn).unwrap();
        }

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 4);
        let read_kinds: Vec<_> = entries.iter().map(|t| t.kind).collect();
        assert_eq!(read_kinds, kinds);
        assert_eq!(entries[2].description, "entry 2");
    }

    #[test]
    fn test_iter_is_restartable() {
        let (log, _temp) = create_test_log();
        log.append(&Transaction::new(TransactionKind::Add, 1, "system")).unwrap();
        log.append(&Transaction::new(TransactionKind::Update, 1, "system")).unwrap();

        assert_eq!(log.iter().unwrap().count(), 2);
        assert_eq!(log.iter().unwrap().count(), 2);
    }

    #[test]
    fn test_read_recent() {
        let (log, _temp) = create_test_log();
        for id in 0..10 {
            log.append(&Transaction::new(TransactionKind::Add, id, "system")).unwrap();
        }

        let recent = log.read_recent(3).unwrap();
        let ids: Vec<i32> = recent.iter().map(|t| t.product_id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn test_append_after_partial_tail_stays_aligned() {
        let (log, _temp) = create_test_log();
        log.append(&Transaction::new(TransactionKind::Add, 1, "system").with_description("first"))
            .unwrap();
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        file.write_all(&[0x44; 7]).unwrap();
        drop(file);

        log.append(&Transaction::new(TransactionKind::Sale, 2, "system").with_description("second"))
            .unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].kind, TransactionKind::Sale);
        assert_eq!(entries[1].description, "second");
        assert_eq!(
            std::fs::metadata(log.path()).unwrap().len(),
            2 * TRANSACTION_RECORD_SIZE as u64
        );
    }

    #[test]
    fn test_read_recent_skips_undecodable_records() {
        let (log, _temp) = create_test_log();
        log.append(&Transaction::new(TransactionKind::Add, 1, "system")).unwrap();
        let mut garbage = [0u8; TRANSACTION_RECORD_SIZE];
        garbage[8] = 0xEE;
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        file.write_all(&garbage).unwrap();
        drop(file);
        log.append(&Transaction::new(TransactionKind::Restock, 3, "system")).unwrap();

        assert!(log.read_all().is_err());
        let ids: Vec<i32> = log.read_recent(10).unwrap().iter().map(|t| t.product_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_append_to_unwritable_path_fails() {
        let (_log, temp) = create_test_log();
        let log = TransactionLog::new(temp.path().join("missing").join("transactions.log"));

        let err = log.append(&Transaction::new(TransactionKind::Add, 1, "system")).unwrap_err();
        assert!(matches!(err, InventoryError::Io(_)));
    }
}
