//! Random-access store over a zip archive.

use std::fs::File;
use std::io::BufReader;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::Result;
use crate::store::{
    AccessModel, EntryStore, LineVisitor, entry_path, scan_lines, strip_base_path,
};

/// A word store packed as a zip archive.
///
/// Entries are found by name through the archive's central directory. Each
/// operation reopens the file, so the store itself holds no handle.
#[derive(Debug)]
pub struct ZipStore {
    path: PathBuf,
    base_path: String,
}

impl ZipStore {
    pub fn new<P: AsRef<Path>>(path: P, base_path: &str) -> Self {
        ZipStore {
            path: path.as_ref().to_path_buf(),
            base_path: base_path.to_string(),
        }
    }

    fn open(&self) -> Result<ZipArchive<BufReader<File>>> {
        let file = File::open(&self.path)?;
        Ok(ZipArchive::new(BufReader::new(file))?)
    }
}

impl EntryStore for ZipStore {
    fn access_model(&self) -> AccessModel {
        AccessModel::RandomAccess
    }

    fn scan_entry(
        &self,
        name: &str,
        visitor: &mut LineVisitor<'_>,
    ) -> Result<Option<ControlFlow<()>>> {
        let mut archive = self.open()?;
        let file = match archive.by_name(&entry_path(&self.base_path, name)) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        scan_lines(BufReader::new(file), visitor).map(Some)
    }

    fn scan_all(&self, visitor: &mut LineVisitor<'_>) -> Result<ControlFlow<()>> {
        let mut archive = self.open()?;

        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            let inside =
                !file.is_dir() && strip_base_path(&self.base_path, file.name()).is_some();
            if !inside {
                continue;
            }

            if scan_lines(BufReader::new(file), visitor)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    fn entry_names(&self) -> Result<Vec<String>> {
        let mut archive = self.open()?;
        let mut names = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            if let Some(name) = strip_base_path(&self.base_path, file.name()) {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }
}
