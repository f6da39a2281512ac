//! Command implementations for the wordshard CLI.

use std::fs::File;
use std::io::BufReader;

use log::{debug, info};

use crate::builder::build_from_source;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::WordStoreConfig;
use crate::error::{Result, WordShardError};
use crate::pack::{ArchiveFormat, pack_storage};
use crate::storage::file::{FileStorage, FileStorageConfig};
use crate::storage::{Storage, StorageConfig, StorageFactory};
use crate::store::open_archive;
use crate::word_store::WordStore;

/// Execute a CLI command.
pub fn execute_command(args: WordShardArgs) -> Result<()> {
    match &args.command {
        Command::Build(build_args) => build(build_args, &args),
        Command::Pack(pack_args) => pack(pack_args, &args),
        Command::Contains(query_args) => contains(query_args, &args),
        Command::Resolve(query_args) => resolve(query_args, &args),
        Command::Count(store_args) => count(store_args, &args),
        Command::Filter(filter_args) => filter(filter_args, &args),
    }
}

/// Combine the config file (if any) with command line overrides.
fn layout_config(layout: &LayoutArgs) -> Result<WordStoreConfig> {
    let mut config = match &layout.config {
        Some(path) => WordStoreConfig::load_from_file(path)?,
        None => WordStoreConfig::default(),
    };

    if let Some(prefix_length) = layout.prefix_length {
        config.prefix_length = prefix_length;
    }
    if let Some(base_path) = &layout.base_path {
        config.base_path = base_path.clone();
    }

    config.validate()?;
    debug!("Using layout {config:?}");
    Ok(config)
}

fn archive_format(store_args: &StoreArgs) -> Result<ArchiveFormat> {
    match store_args.archive_format {
        Some(format) => Ok(format),
        None => ArchiveFormat::from_path(&store_args.archive),
    }
}

fn open_word_store(store_args: &StoreArgs) -> Result<WordStore> {
    let config = layout_config(&store_args.layout)?;
    let format = archive_format(store_args)?;
    let store = open_archive(&store_args.archive, format, &config.base_path)?;

    let words = WordStore::new(store, &config)?;
    words.build_index()?;
    Ok(words)
}

/// Split a quoted source list into shard files.
fn build(args: &BuildArgs, cli_args: &WordShardArgs) -> Result<()> {
    let config = layout_config(&args.layout)?;
    let source = BufReader::new(File::open(&args.source)?);
    let storage = StorageFactory::create(StorageConfig::File(FileStorageConfig::new(
        &args.output_dir,
    )))?;
    clear_previous_build(storage.as_ref(), args)?;

    let stats = build_from_source(source, storage, &config)?;

    output_result(
        "Build finished",
        &BuildResult {
            output_dir: args.output_dir.to_string_lossy().to_string(),
            stats,
        },
        cli_args,
    )
}

/// Stale entries would be packed alongside the new shards, so an output
/// directory holding entries is only reused with `--overwrite`.
fn clear_previous_build(storage: &dyn Storage, args: &BuildArgs) -> Result<()> {
    let stale = storage.list_files()?;
    if stale.is_empty() {
        return Ok(());
    }
    if !args.overwrite {
        return Err(WordShardError::storage(format!(
            "Output directory {} is not empty ({} entries); pass --overwrite to replace them",
            args.output_dir.display(),
            stale.len()
        )));
    }

    for name in &stale {
        storage.delete_file(name)?;
    }
    info!(
        "Removed {} entries of a previous build from {}",
        stale.len(),
        args.output_dir.display()
    );
    Ok(())
}

/// Pack a build directory into one archive.
fn pack(args: &PackArgs, cli_args: &WordShardArgs) -> Result<()> {
    if !args.build_dir.is_dir() {
        return Err(WordShardError::storage(format!(
            "Build directory not found: {}",
            args.build_dir.display()
        )));
    }

    let config = layout_config(&args.layout)?;
    let format = match args.archive_format {
        Some(format) => format,
        None => ArchiveFormat::from_path(&args.archive)?,
    };
    let storage = FileStorage::new(FileStorageConfig::new(&args.build_dir))?;

    let stats = pack_storage(&storage, &args.archive, format, &config.base_path)?;

    output_result(
        "Pack finished",
        &PackResult {
            archive: args.archive.to_string_lossy().to_string(),
            stats,
        },
        cli_args,
    )
}

fn contains(args: &QueryArgs, cli_args: &WordShardArgs) -> Result<()> {
    let words = open_word_store(&args.store)?;
    let found = words.contains_with(&args.word, args.match_case)?;

    output_result(
        "Lookup finished",
        &ContainsResult {
            word: args.word.clone(),
            found,
        },
        cli_args,
    )
}

fn resolve(args: &QueryArgs, cli_args: &WordShardArgs) -> Result<()> {
    let words = open_word_store(&args.store)?;
    let resolved = words.resolve_with(&args.word, args.match_case)?;

    output_result(
        "Lookup finished",
        &ResolveResult {
            word: args.word.clone(),
            resolved,
        },
        cli_args,
    )
}

fn count(args: &StoreArgs, cli_args: &WordShardArgs) -> Result<()> {
    let words = open_word_store(args)?;
    let count = words.count()?;

    output_result("Count finished", &CountResult { count }, cli_args)
}

fn filter(args: &FilterArgs, cli_args: &WordShardArgs) -> Result<()> {
    let words = open_word_store(&args.store)?;
    let pattern = args.pattern.as_str();
    let matches = words.filter(|word| word.contains(pattern), args.limit)?;

    output_result(
        "Filter finished",
        &FilterResult {
            pattern: args.pattern.clone(),
            words: matches,
        },
        cli_args,
    )
}
