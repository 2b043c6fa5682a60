//! File I/O utilities with atomic replacement
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{InventoryError, InventoryResult};

/// Byte-copy `src` to `dest`, truncating `dest` first.
///
/// Returns the number of bytes copied. The destination is synced before
/// returning.
pub fn copy_file(src: &Path, dest: &Path) -> InventoryResult<u64> {
    let source = File::open(src)
        .map_err(|e| InventoryError::Io(format!("Failed to open {}: {}", src.display(), e)))?;
    let target = File::create(dest)
        .map_err(|e| InventoryError::Io(format!("Failed to create {}: {}", dest.display(), e)))?;

    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(target);
    let copied = io::copy(&mut reader, &mut writer).map_err(|e| {
        InventoryError::Io(format!(
            "Failed to copy {} to {}: {}",
            src.display(),
            dest.display(),
            e
        ))
    })?;

    writer
        .flush()
        .map_err(|e| InventoryError::Io(format!("Failed to flush {}: {}", dest.display(), e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| InventoryError::Io(format!("Failed to sync {}: {}", dest.display(), e)))?;

    Ok(copied)
}

/// Copy `src` over `dest` through a sibling temp file and a single rename,
/// so `dest` is never observed half-written.
pub fn copy_file_atomic(src: &Path, dest: &Path) -> InventoryResult<u64> {
    let temp_path = temp_sibling(dest);
    let copied = match copy_file(src, &temp_path) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
    };
    replace_file(&temp_path, dest)?;
    Ok(copied)
}

/// Rename a fully written file over `dest`.
///
/// Rename over an existing file is atomic on POSIX filesystems. On Windows
/// the replacement is not guaranteed atomic; a crash mid-rename can leave
/// only the temp file behind.
pub fn replace_file(temp_path: &Path, dest: &Path) -> InventoryResult<()> {
    fs::rename(temp_path, dest).map_err(|e| {
        let _ = fs::remove_file(temp_path);
        InventoryError::Io(format!(
            "Failed to move {} into place: {}",
            temp_path.display(),
            e
        ))
    })
}

/// Size of a file in bytes
pub fn file_size(path: &Path) -> InventoryResult<u64> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| InventoryError::Io(format!("Failed to stat {}: {}", path.display(), e)))
}

/// Append one line of text, creating the file if needed
pub fn append_line(path: &Path, line: &str) -> InventoryResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| InventoryError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    writeln!(file, "{}", line)
        .map_err(|e| InventoryError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    file.flush()
        .map_err(|e| InventoryError::Io(format!("Failed to flush {}: {}", path.display(), e)))?;

    Ok(())
}

/// Remove a file, treating "already gone" as success
pub fn remove_if_exists(path: &Path) -> InventoryResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(InventoryError::Io(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Drop bytes past the last whole `record_size` record so an append stays
/// aligned. Returns the number of bytes cut.
pub fn trim_partial_record(file: &File, record_size: usize) -> InventoryResult<u64> {
    let len = file
        .metadata()
        .map_err(|e| InventoryError::Io(format!("Failed to stat file: {}", e)))?
        .len();
    let excess = len % record_size as u64;
    if excess != 0 {
        file.set_len(len - excess)
            .map_err(|e| InventoryError::Io(format!("Failed to truncate file: {}", e)))?;
    }
    Ok(excess)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_file() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src.dat");
        let dest = temp_dir.path().join("dest.dat");
        fs::write(&src, b"hello world").unwrap();

        let copied = copy_file(&src, &dest).unwrap();
        assert_eq!(copied, 11);
        assert_eq!(fs::read(&dest).unwrap(), b"hello world");
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = copy_file(&temp_dir.path().join("nope"), &temp_dir.path().join("out")).unwrap_err();
        assert!(matches!(err, InventoryError::Io(_)));
    }

    #[test]
    fn test_copy_atomic_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src.dat");
        let dest = temp_dir.path().join("dest.dat");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old contents").unwrap();

        copy_file_atomic(&src, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"new");
        assert!(!temp_dir.path().join("dest.dat.tmp").exists());
    }

    #[test]
    fn test_copy_atomic_failure_keeps_destination() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("dest.dat");
        fs::write(&dest, b"old contents").unwrap();

        assert!(copy_file_atomic(&temp_dir.path().join("missing"), &dest).is_err());
        assert_eq!(fs::read(&dest).unwrap(), b"old contents");
    }

    #[test]
    fn test_append_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audit.log");

        append_line(&path, "first").unwrap();
        append_line(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_remove_if_exists_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone");
        fs::write(&path, b"x").unwrap();

        remove_if_exists(&path).unwrap();
        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
    }
}
