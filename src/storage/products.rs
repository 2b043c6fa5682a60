//! Product store over a flat file of fixed-width records
//!
//! Records are kept in insertion order with no header or index. Lookups are
//! linear scans; updates overwrite a record in place; deletes rewrite the
//! whole file without the removed record.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{InventoryError, InventoryResult};
use crate::models::Product;

use super::codec::{decode_product, encode_product, read_record, PRODUCT_RECORD_SIZE};
use super::file_io::{remove_if_exists, replace_file, trim_partial_record};

/// Hands out product ids above the highest id ever seen by this process
#[derive(Debug, Clone)]
pub struct IdAllocator {
    /// `None` once `i32::MAX` has been seen or handed out
    next: Option<i32>,
}

impl IdAllocator {
    /// Start just above `max_id` (or at 1 for an empty store)
    pub fn seeded(max_id: i32) -> Self {
        Self {
            next: max_id.max(0).checked_add(1),
        }
    }

    /// Take the next id
    pub fn next_id(&mut self) -> InventoryResult<i32> {
        let id = self.next.ok_or_else(|| {
            InventoryError::InvalidArgument("Product id space exhausted".to_string())
        })?;
        self.next = id.checked_add(1);
        Ok(id)
    }

    /// Make sure `id` is never handed out
    pub fn observe(&mut self, id: i32) {
        if let Some(next) = self.next {
            if id >= next {
                self.next = id.checked_add(1);
            }
        }
    }

    /// The id the next call to `next_id` returns, if any remain
    pub fn peek(&self) -> Option<i32> {
        self.next
    }
}

/// Sequential store of product records
pub struct ProductStore {
    path: PathBuf,
    temp_path: PathBuf,
    ids: IdAllocator,
}

impl ProductStore {
    /// Open a store, scanning once to seed the id allocator.
    ///
    /// A missing file is an empty store.
    pub fn open(path: PathBuf, temp_path: PathBuf) -> InventoryResult<Self> {
        let max_id = max_id_in(&path)?;
        tracing::debug!(path = %path.display(), max_id, "opened product store");

        Ok(Self {
            path,
            temp_path,
            ids: IdAllocator::seeded(max_id),
        })
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream every record in file order
    pub fn iter(&self) -> InventoryResult<ProductIter> {
        ProductIter::open(&self.path)
    }

    /// Get all products in file order
    pub fn list(&self) -> InventoryResult<Vec<Product>> {
        self.iter()?.collect()
    }

    /// Get the first product with the given id
    pub fn get(&self, id: i32) -> InventoryResult<Option<Product>> {
        for product in self.iter()? {
            let product = product?;
            if product.id == id {
                return Ok(Some(product));
            }
        }
        Ok(None)
    }

    /// Check if a product exists
    pub fn exists(&self, id: i32) -> InventoryResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Next unused product id.
    ///
    /// Fails once every positive id has been handed out.
    pub fn generate_id(&mut self) -> InventoryResult<i32> {
        self.ids.next_id()
    }

    /// Re-scan after the store file was replaced underneath us.
    ///
    /// The high-water mark only ever moves up.
    pub fn resync_ids(&mut self) -> InventoryResult<()> {
        let max_id = max_id_in(&self.path)?;
        self.ids.observe(max_id);
        Ok(())
    }

    /// Append a product record
    pub fn add(&mut self, product: &Product) -> InventoryResult<()> {
        product.validate()?;
        if self.exists(product.id)? {
            return Err(InventoryError::InvalidArgument(format!(
                "Product id {} already exists",
                product.id
            )));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| InventoryError::Io(format!("Failed to open store for append: {}", e)))?;

        let trimmed = trim_partial_record(&file, PRODUCT_RECORD_SIZE)?;
        if trimmed != 0 {
            tracing::warn!(bytes = trimmed, "truncated partial record at end of store");
        }

        file.write_all(&encode_product(product))
            .map_err(|e| InventoryError::Io(format!("Failed to write product record: {}", e)))?;
        file.flush()
            .map_err(|e| InventoryError::Io(format!("Failed to flush store: {}", e)))?;

        self.ids.observe(product.id);
        Ok(())
    }

    /// Overwrite the record for `id` in place.
    ///
    /// The written record always carries `id`, whatever `data.id` says.
    /// Returns the record as it was before the update.
    pub fn update(&mut self, id: i32, data: &Product) -> InventoryResult<Product> {
        let mut replacement = data.clone();
        replacement.id = id;
        replacement.validate()?;

        let file = match OpenOptions::new().read(true).write(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(InventoryError::product_not_found(id))
            }
            Err(e) => return Err(InventoryError::Io(format!("Failed to open store: {}", e))),
        };

        let mut reader = BufReader::new(file);
        let mut buf = [0u8; PRODUCT_RECORD_SIZE];
        let mut index: u64 = 0;
        let previous = loop {
            if !read_record(&mut reader, &mut buf)? {
                return Err(InventoryError::product_not_found(id));
            }
            let current = decode_product(&buf);
            if current.id == id {
                break current;
            }
            index += 1;
        };

        let mut file = reader.into_inner();
        file.seek(SeekFrom::Start(index * PRODUCT_RECORD_SIZE as u64))
            .map_err(|e| InventoryError::Io(format!("Failed to seek in store: {}", e)))?;
        file.write_all(&encode_product(&replacement))
            .map_err(|e| InventoryError::Io(format!("Failed to overwrite product record: {}", e)))?;
        file.sync_all()
            .map_err(|e| InventoryError::Io(format!("Failed to sync store: {}", e)))?;

        self.ids.observe(id);
        Ok(previous)
    }

    /// Remove the first record matching `id` by rewriting the store.
    ///
    /// The replacement is fully written and synced before a single rename
    /// puts it in place. If nothing matches, the store file is untouched.
    /// Returns the removed record.
    pub fn delete(&mut self, id: i32) -> InventoryResult<Product> {
        let source = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(InventoryError::product_not_found(id))
            }
            Err(e) => return Err(InventoryError::Io(format!("Failed to open store: {}", e))),
        };

        let removed = match self.write_without(source, id) {
            Ok(removed) => removed,
            Err(e) => {
                let _ = remove_if_exists(&self.temp_path);
                return Err(e);
            }
        };

        match removed {
            Some(product) => {
                replace_file(&self.temp_path, &self.path)?;
                tracing::debug!(id, "rewrote store without deleted product");
                Ok(product)
            }
            None => {
                remove_if_exists(&self.temp_path)?;
                Err(InventoryError::product_not_found(id))
            }
        }
    }

    fn write_without(&self, source: File, id: i32) -> InventoryResult<Option<Product>> {
        let temp = File::create(&self.temp_path)
            .map_err(|e| InventoryError::Io(format!("Failed to create temp store: {}", e)))?;

        let mut reader = BufReader::new(source);
        let mut writer = BufWriter::new(temp);
        let mut buf = [0u8; PRODUCT_RECORD_SIZE];
        let mut removed = None;

        while read_record(&mut reader, &mut buf)? {
            if removed.is_none() {
                let product = decode_product(&buf);
                if product.id == id {
                    removed = Some(product);
                    continue;
                }
            }
            writer
                .write_all(&buf)
                .map_err(|e| InventoryError::Io(format!("Failed to write temp store: {}", e)))?;
        }

        writer
            .flush()
            .map_err(|e| InventoryError::Io(format!("Failed to flush temp store: {}", e)))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| InventoryError::Io(format!("Failed to sync temp store: {}", e)))?;

        Ok(removed)
    }
}

/// Streaming reader over the store file
pub struct ProductIter {
    reader: Option<BufReader<File>>,
}

impl ProductIter {
    fn open(path: &Path) -> InventoryResult<Self> {
        let reader = match File::open(path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(InventoryError::Io(format!("Failed to open store: {}", e))),
        };
        Ok(Self { reader })
    }
}

impl Iterator for ProductIter {
    type Item = InventoryResult<Product>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut buf = [0u8; PRODUCT_RECORD_SIZE];
        match read_record(reader, &mut buf) {
            Ok(true) => Some(Ok(decode_product(&buf))),
            Ok(false) => {
                self.reader = None;
                None
            }
            Err(e) => {
                self.reader = None;
                Some(Err(InventoryError::Io(format!("Failed to read store: {}", e))))
            }
        }
    }
}

fn max_id_in(path: &Path) -> InventoryResult<i32> {
    let mut max_id = 0;
    for product in ProductIter::open(path)? {
        max_id = max_id.max(product?.id);
    }
    Ok(max_id)
}
