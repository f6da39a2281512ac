//! Partition builder: splits a sorted word list into prefix-keyed shards.
//!
//! Words arrive in shard-key order. Every run of words sharing a key is
//! written to one storage entry named after the key, one word per line and
//! CR-LF terminated. Words shorter than the prefix length are buffered and
//! written to the [`SHORT_WORDS_ENTRY`] entry when the build finishes.
//!
//! Input order is checked: a word whose key sorts before the currently open
//! shard fails the build with [`WordShardError::UnsortedInput`] instead of
//! overwriting an earlier shard.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use wordshard::builder::PartitionBuilder;
//! use wordshard::config::WordStoreConfig;
//! use wordshard::storage::Storage;
//! use wordshard::storage::memory::MemoryStorage;
//!
//! # fn main() -> wordshard::error::Result<()> {
//! let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
//! let mut builder = PartitionBuilder::new(storage.clone(), &WordStoreConfig::default())?;
//! for word in ["ant", "ants", "boa", "boat", "ox"] {
//!     builder.add_word(word)?;
//! }
//! let stats = builder.finish()?;
//!
//! assert_eq!(stats.shards, 2);
//! assert_eq!(stats.short_words, 1);
//! assert_eq!(storage.list_files()?, vec![".shortnames", "ant", "boa"]);
//! # Ok(())
//! # }
//! ```

use std::io::BufRead;
use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::WordStoreConfig;
use crate::error::{Result, WordShardError};
use crate::key::{SHORT_WORDS_ENTRY, ShardKey, is_valid_entry_name, shard_key};
use crate::source::QuotedWordReader;
use crate::storage::{Storage, StorageOutput};

/// Line terminator of every entry in a word store.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Words written, shard words and short words together.
    pub words: usize,
    /// Words written to the short-word entry.
    pub short_words: usize,
    /// Number of shard entries created.
    pub shards: usize,
    /// Source lines dropped because they held no word.
    pub skipped_lines: usize,
}

/// Writes a sorted word sequence into shard entries of a [`Storage`].
#[derive(Debug)]
pub struct PartitionBuilder {
    storage: Arc<dyn Storage>,
    prefix_length: usize,
    /// Key and writer of the shard currently being filled.
    current: Option<(String, Box<dyn StorageOutput>)>,
    short_words: Vec<String>,
    stats: BuildStats,
}

impl PartitionBuilder {
    pub fn new(storage: Arc<dyn Storage>, config: &WordStoreConfig) -> Result<Self> {
        config.validate()?;

        Ok(PartitionBuilder {
            storage,
            prefix_length: config.prefix_length,
            current: None,
            short_words: Vec::new(),
            stats: BuildStats::default(),
        })
    }

    /// Append one word. Words must arrive in non-decreasing shard-key order.
    pub fn add_word(&mut self, word: &str) -> Result<()> {
        if word.contains(['\r', '\n']) {
            return Err(WordShardError::invalid_word(format!(
                "word contains a line break: {word:?}"
            )));
        }

        let prefix = match shard_key(word, self.prefix_length) {
            ShardKey::Short => {
                self.short_words.push(word.to_string());
                self.stats.short_words += 1;
                self.stats.words += 1;
                return Ok(());
            }
            ShardKey::Prefix(prefix) => prefix,
        };

        let same_shard = match &self.current {
            Some((current, _)) if *current == prefix => true,
            Some((current, _)) if prefix < *current => {
                return Err(WordShardError::UnsortedInput {
                    previous: current.clone(),
                    current: prefix,
                    word: word.to_string(),
                });
            }
            _ => false,
        };

        if !same_shard {
            if !is_valid_entry_name(&prefix) {
                return Err(WordShardError::invalid_word(format!(
                    "shard key '{prefix}' of word '{word}' is not a valid entry name"
                )));
            }
            self.close_current()?;
            debug!("Opening shard '{prefix}'");
            let output = self.storage.create_output(&prefix)?;
            self.current = Some((prefix, output));
            self.stats.shards += 1;
        }

        if let Some((_, output)) = self.current.as_mut() {
            write_line(output.as_mut(), word)?;
        }
        self.stats.words += 1;
        Ok(())
    }

    /// Record source lines that were dropped before reaching the builder.
    pub fn add_skipped_lines(&mut self, count: usize) {
        self.stats.skipped_lines += count;
    }

    /// Close the open shard, write the short-word entry and return the stats.
    pub fn finish(mut self) -> Result<BuildStats> {
        self.close_current()?;

        let mut output = self.storage.create_output(SHORT_WORDS_ENTRY)?;
        for word in &self.short_words {
            write_line(output.as_mut(), word)?;
        }
        output.close()?;
        self.storage.sync()?;

        info!(
            "Built {} shards holding {} words ({} short, {} source lines skipped)",
            self.stats.shards, self.stats.words, self.stats.short_words, self.stats.skipped_lines
        );
        Ok(std::mem::take(&mut self.stats))
    }

    fn close_current(&mut self) -> Result<()> {
        if let Some((_, mut output)) = self.current.take() {
            output.close()?;
        }
        Ok(())
    }
}

fn write_line(output: &mut dyn StorageOutput, word: &str) -> Result<()> {
    output.write_all(word.as_bytes())?;
    output.write_all(LINE_TERMINATOR.as_bytes())?;
    Ok(())
}

/// Build a store from an iterator of words.
pub fn build_from_words<I, S>(
    words: I,
    storage: Arc<dyn Storage>,
    config: &WordStoreConfig,
) -> Result<BuildStats>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = PartitionBuilder::new(storage, config)?;
    for word in words {
        builder.add_word(word.as_ref())?;
    }
    builder.finish()
}

/// Build a store from quoted-word source lines, counting skipped lines.
pub fn build_from_source<R: BufRead>(
    reader: R,
    storage: Arc<dyn Storage>,
    config: &WordStoreConfig,
) -> Result<BuildStats> {
    let mut builder = PartitionBuilder::new(storage, config)?;
    let mut words = QuotedWordReader::new(reader);
    for word in words.by_ref() {
        builder.add_word(&word?)?;
    }
    builder.add_skipped_lines(words.skipped_lines());
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;
    use std::io::{Cursor, Read};

    fn read_entry(storage: &dyn Storage, name: &str) -> String {
        let mut input = storage.open_input(name).unwrap();
        let mut text = String::new();
        input.read_to_string(&mut text).unwrap();
        text
    }

    fn memory_storage() -> Arc<dyn Storage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_partition_scenario() {
        let storage = memory_storage();
        let stats = build_from_words(
            ["ant", "ants", "boa", "boat", "ox"],
            storage.clone(),
            &WordStoreConfig::default(),
        )
        .unwrap();

        assert_eq!(
            stats,
            BuildStats {
                words: 5,
                short_words: 1,
                shards: 2,
                skipped_lines: 0,
            }
        );
        assert_eq!(read_entry(storage.as_ref(), "ant"), "ant\r\nants\r\n");
        assert_eq!(read_entry(storage.as_ref(), "boa"), "boa\r\nboat\r\n");
        assert_eq!(read_entry(storage.as_ref(), ".shortnames"), "ox\r\n");
    }

    #[test]
    fn test_mixed_case_words_share_shard() {
        let storage = memory_storage();
        build_from_words(
            ["Ant", "ant", "ANTS", "antelope"],
            storage.clone(),
            &WordStoreConfig::default(),
        )
        .unwrap();

        assert_eq!(storage.list_files().unwrap(), vec![".shortnames", "ant"]);
        assert_eq!(
            read_entry(storage.as_ref(), "ant"),
            "Ant\r\nant\r\nANTS\r\nantelope\r\n"
        );
    }

    #[test]
    fn test_empty_short_word_entry_is_written() {
        let storage = memory_storage();
        build_from_words(["ant"], storage.clone(), &WordStoreConfig::default()).unwrap();
        assert_eq!(read_entry(storage.as_ref(), ".shortnames"), "");
    }

    #[test]
    fn test_unsorted_input_fails() {
        let storage = memory_storage();
        let result = build_from_words(
            ["boa", "ant"],
            storage,
            &WordStoreConfig::default(),
        );

        match result {
            Err(WordShardError::UnsortedInput {
                previous,
                current,
                word,
            }) => {
                assert_eq!(previous, "boa");
                assert_eq!(current, "ant");
                assert_eq!(word, "ant");
            }
            other => panic!("Expected unsorted input error, got {other:?}"),
        }
    }

    #[test]
    fn test_short_words_ignore_order() {
        let storage = memory_storage();
        let stats = build_from_words(
            ["ox", "ant", "a", "boa", "by"],
            storage.clone(),
            &WordStoreConfig::default(),
        )
        .unwrap();

        assert_eq!(stats.short_words, 3);
        assert_eq!(read_entry(storage.as_ref(), ".shortnames"), "ox\r\na\r\nby\r\n");
    }

    #[test]
    fn test_invalid_words_rejected() {
        let storage = memory_storage();
        let mut builder = PartitionBuilder::new(storage, &WordStoreConfig::default()).unwrap();

        assert!(matches!(
            builder.add_word("two\nlines"),
            Err(WordShardError::InvalidWord(_))
        ));
        assert!(matches!(
            builder.add_word("a/bc"),
            Err(WordShardError::InvalidWord(_))
        ));
        assert!(matches!(
            builder.add_word("a\0bc"),
            Err(WordShardError::InvalidWord(_))
        ));
    }

    #[test]
    fn test_final_sigma_keys_sort_with_lowercase() {
        let storage = memory_storage();
        let stats = build_from_words(
            ["ΟΔΣΑ", "οδσα", "οδσό"],
            storage.clone(),
            &WordStoreConfig::default(),
        )
        .unwrap();

        assert_eq!(stats.shards, 1);
        assert_eq!(storage.list_files().unwrap(), vec![".shortnames", "οδσ"]);
    }

    #[test]
    fn test_reserved_key_rejected() {
        let storage = memory_storage();
        let config = WordStoreConfig::new(11, "");
        let result = build_from_words([".shortnames-and-more"], storage, &config);
        assert!(matches!(result, Err(WordShardError::InvalidWord(_))));
    }

    #[test]
    fn test_build_from_source_counts_skipped() {
        let storage = memory_storage();
        let source = "[\n\"ant\",\n???\n\"ox\"\n]\n";
        let stats = build_from_source(
            Cursor::new(source),
            storage.clone(),
            &WordStoreConfig::default(),
        )
        .unwrap();

        assert_eq!(stats.words, 2);
        assert_eq!(stats.skipped_lines, 3);
        assert_eq!(read_entry(storage.as_ref(), "ant"), "ant\r\n");
    }
}
