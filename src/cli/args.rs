//! Command line argument parsing for the wordshard CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::pack::ArchiveFormat;

/// wordshard - prefix-sharded word lists packed into one archive
#[derive(Parser, Debug, Clone)]
#[command(name = "wordshard")]
#[command(about = "Build and query prefix-sharded word stores")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct WordShardArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl WordShardArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split a sorted, quoted word list into shard files
    Build(BuildArgs),

    /// Pack a build directory into a zip or tar archive
    Pack(PackArgs),

    /// Check whether a word is stored
    Contains(QueryArgs),

    /// Print the stored casing of a word
    Resolve(QueryArgs),

    /// Count all stored words
    Count(StoreArgs),

    /// List stored words containing a substring
    Filter(FilterArgs),
}

/// Layout options shared by every command.
#[derive(Parser, Debug, Clone)]
pub struct LayoutArgs {
    /// JSON file with `prefix_length` and `base_path`
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Number of leading characters forming a shard key
    #[arg(long, env = "WORDSHARD_PREFIX_LENGTH")]
    pub prefix_length: Option<usize>,

    /// Directory prefix of entries inside the archive
    #[arg(long, env = "WORDSHARD_BASE_PATH")]
    pub base_path: Option<String>,
}

/// Arguments for building shard files
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Sorted source list, one quoted word per line
    #[arg(value_name = "SOURCE_FILE")]
    pub source: PathBuf,

    /// Directory receiving the shard files
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Delete entries left in OUTPUT_DIR by an earlier build
    #[arg(long)]
    pub overwrite: bool,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Arguments for packing a build directory
#[derive(Parser, Debug, Clone)]
pub struct PackArgs {
    /// Directory written by `build`
    #[arg(value_name = "BUILD_DIR")]
    pub build_dir: PathBuf,

    /// Archive to create
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Archive format (inferred from the extension when omitted)
    #[arg(long)]
    pub archive_format: Option<ArchiveFormat>,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Arguments identifying a packed store
#[derive(Parser, Debug, Clone)]
pub struct StoreArgs {
    /// Packed archive (.zip or .tar)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Archive format (inferred from the extension when omitted)
    #[arg(long)]
    pub archive_format: Option<ArchiveFormat>,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Arguments for single-word queries
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Word to look up
    #[arg(value_name = "WORD")]
    pub word: String,

    /// Compare casing exactly
    #[arg(long)]
    pub match_case: bool,
}

/// Arguments for substring filtering
#[derive(Parser, Debug, Clone)]
pub struct FilterArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Substring the words must contain
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Maximum number of words to return
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
