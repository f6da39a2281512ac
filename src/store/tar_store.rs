//! Sequential-access store over a tar archive.
//!
//! A tar stream has no directory: the only way to reach an entry is to walk
//! every header before it. The store therefore keeps an [`OrdinalIndex`]
//! mapping entry names to their position in the stream, built by one full
//! pass the first time it is needed. Opening an entry afterwards still costs
//! O(position) because the archive is reopened and the cursor advanced to
//! that position; only the name search is avoided.

use std::fs::File;
use std::io::BufReader;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use log::{debug, info, warn};
use once_cell::sync::OnceCell;

use crate::error::{Result, WordShardError};
use crate::store::{AccessModel, EntryStore, LineVisitor, scan_lines, strip_base_path};

/// Entry name to 0-based position in the tar stream.
#[derive(Debug, Default)]
pub struct OrdinalIndex {
    positions: AHashMap<String, usize>,
    /// Indexed names in stream order.
    names: Vec<String>,
}

impl OrdinalIndex {
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// A word store packed as a tar archive.
#[derive(Debug)]
pub struct TarStore {
    path: PathBuf,
    base_path: String,
    /// Built exactly once; readers only ever see the finished index.
    index: OnceCell<OrdinalIndex>,
}

impl TarStore {
    pub fn new<P: AsRef<Path>>(path: P, base_path: &str) -> Self {
        TarStore {
            path: path.as_ref().to_path_buf(),
            base_path: base_path.to_string(),
            index: OnceCell::new(),
        }
    }

    /// The ordinal index, building it on first use.
    pub fn index(&self) -> Result<&OrdinalIndex> {
        self.index.get_or_try_init(|| self.read_index())
    }

    fn open(&self) -> Result<tar::Archive<BufReader<File>>> {
        let file = File::open(&self.path)?;
        Ok(tar::Archive::new(BufReader::new(file)))
    }

    fn read_index(&self) -> Result<OrdinalIndex> {
        let mut archive = self.open()?;
        let mut index = OrdinalIndex::default();

        for (position, entry) in archive.entries()?.enumerate() {
            let entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let path = entry.path()?;
            let full_name = path.to_string_lossy();
            let Some(name) = strip_base_path(&self.base_path, &full_name) else {
                continue;
            };

            debug!("Indexed tar entry '{name}' at position {position}");
            if index.positions.insert(name.to_string(), position).is_some() {
                warn!("Duplicate tar entry '{name}', the later one wins");
            } else {
                index.names.push(name.to_string());
            }
        }

        info!(
            "Built ordinal index of {} entries for {}",
            index.len(),
            self.path.display()
        );
        Ok(index)
    }
}

impl EntryStore for TarStore {
    fn access_model(&self) -> AccessModel {
        AccessModel::Sequential
    }

    fn build_index(&self) -> Result<()> {
        self.index().map(|_| ())
    }

    fn scan_entry(
        &self,
        name: &str,
        visitor: &mut LineVisitor<'_>,
    ) -> Result<Option<ControlFlow<()>>> {
        let Some(position) = self.index()?.position(name) else {
            return Ok(None);
        };

        let mut archive = self.open()?;
        let mut entries = archive.entries()?;
        let entry = entries.nth(position).ok_or_else(|| {
            WordShardError::storage(format!(
                "Entry '{name}' vanished from position {position} of {}",
                self.path.display()
            ))
        })??;

        scan_lines(BufReader::new(entry), visitor).map(Some)
    }

    /// Walks the stream once, visiting only entries the index points at: a
    /// name stored twice is read from its later copy, as lookups do.
    fn scan_all(&self, visitor: &mut LineVisitor<'_>) -> Result<ControlFlow<()>> {
        let index = self.index()?;
        let mut archive = self.open()?;

        for (position, entry) in archive.entries()?.enumerate() {
            let entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let indexed = {
                let path = entry.path()?;
                strip_base_path(&self.base_path, &path.to_string_lossy())
                    .is_some_and(|name| index.position(name) == Some(position))
            };
            if !indexed {
                continue;
            }

            if scan_lines(BufReader::new(entry), visitor)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    fn entry_names(&self) -> Result<Vec<String>> {
        Ok(self.index()?.names().to_vec())
    }
}
