//! # wordshard
//!
//! A static, immutable word list split into prefix-keyed shards and packed
//! into a single archive, answering membership and case-resolution queries
//! without loading the whole list into memory.
//!
//! ## Pieces
//!
//! - [`builder`]: splits a sorted word list into one entry per shard key,
//!   plus a `.shortnames` entry for words shorter than the key.
//! - [`pack`]: copies the built entries into one zip or tar archive.
//! - [`store`]: reads entries back, by name (zip) or by walking the stream
//!   with a once-built ordinal index (tar).
//! - [`word_store`]: `resolve`/`contains` lookups plus whole-store
//!   enumeration, counting and filtering.

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod key;
pub mod pack;
pub mod source;
pub mod storage;
pub mod store;
pub mod word_store;

pub mod prelude {
    pub use crate::builder::{BuildStats, PartitionBuilder, build_from_source, build_from_words};
    pub use crate::config::WordStoreConfig;
    pub use crate::error::{Result, WordShardError};
    pub use crate::pack::{ArchiveFormat, pack_storage};
    pub use crate::store::{AccessModel, EntryStore, open_archive};
    pub use crate::word_store::WordStore;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
