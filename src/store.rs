//! Read access to a packed word store.
//!
//! [`EntryStore`] is the one contract the resolver and the enumeration API
//! are written against. Each implementation maps it onto what its container
//! can do:
//!
//! | Store | Access model | Cost of opening one entry |
//! |---|---|---|
//! | [`ZipStore`](zip_store::ZipStore) | random access by name | O(1) lookup in the central directory |
//! | [`TarStore`](tar_store::TarStore) | sequential | O(position): the stream is walked up to the entry |
//! | [`StorageStore`](storage_store::StorageStore) | random access by name | one storage open |
//!
//! Prefer a random-access container for query-heavy workloads; a tar store
//! pays for every entry stored before the one it needs.
//!
//! Every call opens its own handle on the container and releases it before
//! returning, so one store may serve any number of threads.

use std::io::BufRead;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, WordShardError};
use crate::pack::ArchiveFormat;

pub mod storage_store;
pub mod tar_store;
pub mod zip_store;

/// How a store reaches an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessModel {
    /// Entries are addressable by name.
    RandomAccess,
    /// Entries can only be reached by walking the container in order.
    Sequential,
}

/// Visitor over the lines of an entry. Returning `Break` stops the scan.
pub type LineVisitor<'a> = dyn FnMut(&str) -> ControlFlow<()> + 'a;

/// A container of named, newline-delimited text entries.
pub trait EntryStore: Send + Sync + std::fmt::Debug {
    /// The access model of this store.
    fn access_model(&self) -> AccessModel;

    /// Prepare lookup structures. No-op for random-access stores.
    ///
    /// Calling it more than once, or concurrently, builds at most once.
    fn build_index(&self) -> Result<()> {
        Ok(())
    }

    /// Feed every line of entry `name` to `visitor`.
    ///
    /// Returns `Ok(None)` when the entry does not exist, otherwise whether the
    /// visitor stopped the scan.
    fn scan_entry(
        &self,
        name: &str,
        visitor: &mut LineVisitor<'_>,
    ) -> Result<Option<ControlFlow<()>>>;

    /// Feed every line of every entry to `visitor`, in container order.
    fn scan_all(&self, visitor: &mut LineVisitor<'_>) -> Result<ControlFlow<()>>;

    /// Names of all entries, base path stripped, in container order.
    fn entry_names(&self) -> Result<Vec<String>>;
}

/// Full name of entry `name` inside an archive rooted at `base_path`.
pub fn entry_path(base_path: &str, name: &str) -> String {
    let base = base_path.trim_matches('/');
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

/// Inverse of [`entry_path`]: `None` when `full_name` lies outside the base.
pub fn strip_base_path<'a>(base_path: &str, full_name: &'a str) -> Option<&'a str> {
    let base = base_path.trim_matches('/');
    if base.is_empty() {
        return Some(full_name);
    }
    full_name
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
}

/// Feed the lines of `reader` to `visitor`.
///
/// Lines end at `\n`; a trailing `\r` is removed. Invalid UTF-8 surfaces as
/// an I/O error.
pub fn scan_lines<R: BufRead>(
    mut reader: R,
    visitor: &mut LineVisitor<'_>,
) -> Result<ControlFlow<()>> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(ControlFlow::Continue(()));
        }

        let trimmed = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line.as_str());
        if visitor(trimmed).is_break() {
            return Ok(ControlFlow::Break(()));
        }
    }
}

/// Open a packed archive, choosing the store variant from `format`.
pub fn open_archive<P: AsRef<Path>>(
    path: P,
    format: ArchiveFormat,
    base_path: &str,
) -> Result<Arc<dyn EntryStore>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(WordShardError::storage(format!(
            "Archive not found: {}",
            path.display()
        )));
    }

    Ok(match format {
        ArchiveFormat::Zip => Arc::new(zip_store::ZipStore::new(path, base_path)),
        ArchiveFormat::Tar => Arc::new(tar_store::TarStore::new(path, base_path)),
    })
}
