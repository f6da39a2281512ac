//! Random-access store over an unpacked [`Storage`], such as a build directory.

use std::io::BufReader;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::error::{Result, WordShardError};
use crate::storage::Storage;
use crate::store::{AccessModel, EntryStore, LineVisitor, scan_lines};

/// Serves entries straight from the storage the builder wrote into.
#[derive(Debug)]
pub struct StorageStore {
    storage: Arc<dyn Storage>,
}

impl StorageStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        StorageStore { storage }
    }
}

impl EntryStore for StorageStore {
    fn access_model(&self) -> AccessModel {
        AccessModel::RandomAccess
    }

    fn scan_entry(
        &self,
        name: &str,
        visitor: &mut LineVisitor<'_>,
    ) -> Result<Option<ControlFlow<()>>> {
        let input = match self.storage.open_input(name) {
            Ok(input) => input,
            Err(WordShardError::EntryNotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        scan_lines(BufReader::new(input), visitor).map(Some)
    }

    fn scan_all(&self, visitor: &mut LineVisitor<'_>) -> Result<ControlFlow<()>> {
        for name in self.storage.list_files()? {
            let input = self.storage.open_input(&name)?;
            if scan_lines(BufReader::new(input), visitor)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn entry_names(&self) -> Result<Vec<String>> {
        self.storage.list_files()
    }
}
