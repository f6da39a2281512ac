//! Packing a built storage into a single archive.
//!
//! Every storage entry is copied, in sorted name order, into a zip or tar
//! archive as `<base_path>/<name>`. The resulting file is the packed store
//! read by [`ZipStore`](crate::store::zip_store::ZipStore) or
//! [`TarStore`](crate::store::tar_store::TarStore).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::{Result, WordShardError};
use crate::storage::Storage;
use crate::store::entry_path;

/// Container format of a packed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    /// Zip archive; entries are addressable by name.
    Zip,
    /// Tar archive; entries can only be walked in order.
    Tar,
}

impl ArchiveFormat {
    /// Infer the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("zip") => Ok(ArchiveFormat::Zip),
            Some("tar") => Ok(ArchiveFormat::Tar),
            _ => Err(WordShardError::invalid_config(format!(
                "cannot infer archive format of {}",
                path.display()
            ))),
        }
    }
}

/// Summary of a pack run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackStats {
    pub entries: usize,
    pub bytes: u64,
}

/// Copy every entry of `storage` into a new archive at `dest`.
pub fn pack_storage<P: AsRef<Path>>(
    storage: &dyn Storage,
    dest: P,
    format: ArchiveFormat,
    base_path: &str,
) -> Result<PackStats> {
    let dest = dest.as_ref();
    let names = storage.list_files()?;
    let file = BufWriter::new(File::create(dest)?);

    let stats = match format {
        ArchiveFormat::Zip => pack_zip(storage, &names, file, base_path)?,
        ArchiveFormat::Tar => pack_tar(storage, &names, file, base_path)?,
    };

    info!(
        "Packed {} entries ({} bytes) into {}",
        stats.entries,
        stats.bytes,
        dest.display()
    );
    Ok(stats)
}

fn pack_zip<W: Write + io::Seek>(
    storage: &dyn Storage,
    names: &[String],
    writer: W,
    base_path: &str,
) -> Result<PackStats> {
    let mut zip = zip::ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut stats = PackStats::default();

    for name in names {
        let full_name = entry_path(base_path, name);
        debug!("Adding zip entry {full_name}");
        zip.start_file(full_name, options)?;

        let mut input = storage.open_input(name)?;
        stats.bytes += io::copy(&mut input, &mut zip)?;
        stats.entries += 1;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(stats)
}

fn pack_tar<W: Write>(
    storage: &dyn Storage,
    names: &[String],
    writer: W,
    base_path: &str,
) -> Result<PackStats> {
    let mut tar = tar::Builder::new(writer);
    let mut stats = PackStats::default();

    for name in names {
        let full_name = entry_path(base_path, name);
        debug!("Adding tar entry {full_name}");

        let input = storage.open_input(name)?;
        let size = input.size()?;
        let mut header = tar::Header::new_gnu();
        header.set_size(size);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        tar.append_data(&mut header, &full_name, input)?;

        stats.bytes += size;
        stats.entries += 1;
    }

    let mut writer = tar.into_inner()?;
    writer.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageOutput;
    use crate::storage::memory::MemoryStorage;
    use tempfile::TempDir;

    fn sample_storage() -> MemoryStorage {
        let storage = MemoryStorage::new();
        for (name, content) in [("ant", "ant\r\nants\r\n"), (".shortnames", "ox\r\n")] {
            let mut output: Box<dyn StorageOutput> = storage.create_output(name).unwrap();
            output.write_all(content.as_bytes()).unwrap();
            output.close().unwrap();
        }
        storage
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ArchiveFormat::from_path("words.zip").unwrap(), ArchiveFormat::Zip);
        assert_eq!(ArchiveFormat::from_path("words.TAR").unwrap(), ArchiveFormat::Tar);
        assert!(ArchiveFormat::from_path("words.txt").is_err());
        assert!(ArchiveFormat::from_path("words").is_err());
    }

    #[test]
    fn test_pack_zip_entry_names() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("words.zip");

        let stats =
            pack_storage(&sample_storage(), &dest, ArchiveFormat::Zip, "words/").unwrap();
        assert_eq!(stats, PackStats { entries: 2, bytes: 15 });

        let archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"words/ant"));
        assert!(names.contains(&"words/.shortnames"));
    }

    #[test]
    fn test_pack_tar_entry_order() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("words.tar");

        pack_storage(&sample_storage(), &dest, ArchiveFormat::Tar, "").unwrap();

        let mut archive = tar::Archive::new(File::open(&dest).unwrap());
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![".shortnames", "ant"]);
    }
}
