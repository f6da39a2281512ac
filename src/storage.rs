//! Named-entry storage that the partition builder writes into.
//!
//! A storage is a flat namespace of byte entries. The builder writes one
//! entry per shard plus the short-word entry; the packer later copies every
//! entry into a single archive. Two backends are provided:
//!
//! - [`FileStorage`](file::FileStorage): one file per entry inside a directory.
//! - [`MemoryStorage`](memory::MemoryStorage): entries held in process memory.
//!
//! # Example
//!
//! ```
//! use std::io::{Read, Write};
//!
//! use wordshard::storage::{StorageConfig, StorageFactory};
//!
//! # fn main() -> wordshard::error::Result<()> {
//! let storage = StorageFactory::create(StorageConfig::Memory)?;
//!
//! let mut output = storage.create_output("ant")?;
//! output.write_all(b"ant\r\nants\r\n")?;
//! output.close()?;
//!
//! let mut input = storage.open_input("ant")?;
//! let mut buffer = String::new();
//! input.read_to_string(&mut buffer)?;
//! assert_eq!(buffer, "ant\r\nants\r\n");
//! # Ok(())
//! # }
//! ```

use std::io::{Read, Write};
use std::sync::Arc;

use crate::error::Result;

pub mod file;
pub mod memory;

/// A trait for storage backends holding named entries.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Open an entry for reading.
    ///
    /// Fails with [`EntryNotFound`](crate::error::WordShardError::EntryNotFound)
    /// when no entry has this name.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Create an entry for writing, truncating any existing content.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Delete an entry. Deleting a missing entry is not an error.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// List all entry names, sorted.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Sync all pending writes to storage.
    fn sync(&self) -> Result<()>;
}

/// A trait for reading an entry.
pub trait StorageInput: Read + Send + std::fmt::Debug {
    /// Get the size of the entry in bytes.
    fn size(&self) -> Result<u64>;
}

/// A trait for writing an entry.
pub trait StorageOutput: Write + Send + std::fmt::Debug {
    /// Flush and sync the output to storage.
    fn flush_and_sync(&mut self) -> Result<()>;

    /// Close the output, making its content visible to readers.
    fn close(&mut self) -> Result<()>;
}

/// Storage configuration, one variant per backend.
#[derive(Debug, Clone, Default)]
pub enum StorageConfig {
    /// File-based storage configuration (includes path)
    File(file::FileStorageConfig),

    /// Memory-based storage
    #[default]
    Memory,
}

/// A factory for creating storage instances.
pub struct StorageFactory;

impl StorageFactory {
    /// Create a new storage instance with the given configuration.
    pub fn create(config: StorageConfig) -> Result<Arc<dyn Storage>> {
        match config {
            StorageConfig::Memory => Ok(Arc::new(memory::MemoryStorage::new())),
            StorageConfig::File(file_config) => {
                let storage = file::FileStorage::new(file_config)?;
                Ok(Arc::new(storage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file::FileStorageConfig;
    use tempfile::TempDir;

    #[test]
    fn test_factory_creates_memory_storage() {
        let storage = StorageFactory::create(StorageConfig::default()).unwrap();
        assert!(storage.list_files().unwrap().is_empty());
    }

    #[test]
    fn test_factory_creates_file_storage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("words");

        let storage =
            StorageFactory::create(StorageConfig::File(FileStorageConfig::new(&path))).unwrap();
        let mut output = storage.create_output("ant").unwrap();
        output.write_all(b"ant\r\n").unwrap();
        output.close().unwrap();

        assert!(path.join("ant").exists());
        assert_eq!(storage.open_input("ant").unwrap().size().unwrap(), 5);
    }
}
