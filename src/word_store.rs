//! Query side of a packed word store.
//!
//! [`WordStore`] resolves words against any [`EntryStore`]: it derives the
//! query's shard key, scans that one entry (or the short-word entry) line by
//! line and returns the first match in its stored casing. Enumeration walks
//! every entry in container order.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use wordshard::builder::build_from_words;
//! use wordshard::config::WordStoreConfig;
//! use wordshard::storage::Storage;
//! use wordshard::storage::memory::MemoryStorage;
//! use wordshard::store::storage_store::StorageStore;
//! use wordshard::word_store::WordStore;
//!
//! # fn main() -> wordshard::error::Result<()> {
//! let config = WordStoreConfig::default();
//! let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
//! build_from_words(["ant", "ants", "boa", "boat", "ox"], storage.clone(), &config)?;
//!
//! let words = WordStore::new(Arc::new(StorageStore::new(storage)), &config)?;
//! assert_eq!(words.resolve("ANT")?.as_deref(), Some("ant"));
//! assert_eq!(words.resolve("OX")?.as_deref(), Some("ox"));
//! assert_eq!(words.resolve("cat")?, None);
//! assert_eq!(words.count()?, 5);
//! # Ok(())
//! # }
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::config::WordStoreConfig;
use crate::error::Result;
use crate::key::{ShardKey, eq_folded, fold_case, is_valid_entry_name, shard_key};
use crate::store::{AccessModel, EntryStore};

/// Membership and case-resolution queries over a packed word store.
#[derive(Debug, Clone)]
pub struct WordStore {
    store: Arc<dyn EntryStore>,
    prefix_length: usize,
}

impl WordStore {
    pub fn new(store: Arc<dyn EntryStore>, config: &WordStoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(WordStore {
            store,
            prefix_length: config.prefix_length,
        })
    }

    /// The access model of the underlying container.
    pub fn access_model(&self) -> AccessModel {
        self.store.access_model()
    }

    /// One-time preparation for sequential stores; no-op otherwise.
    ///
    /// Queries build the index on demand, so calling this is optional. Call
    /// it before sharing the store to keep the first query cheap.
    pub fn build_index(&self) -> Result<()> {
        self.store.build_index()
    }

    /// Whether the word is stored in any casing.
    pub fn contains(&self, word: &str) -> Result<bool> {
        self.contains_with(word, false)
    }

    /// Whether the word is stored, comparing exactly when `match_case` is set.
    pub fn contains_with(&self, word: &str, match_case: bool) -> Result<bool> {
        Ok(self.resolve_with(word, match_case)?.is_some())
    }

    /// The stored casing of `word`, compared case-insensitively.
    pub fn resolve(&self, word: &str) -> Result<Option<String>> {
        self.resolve_with(word, false)
    }

    /// The first stored line equal to `word`.
    ///
    /// With `match_case` the comparison is exact; otherwise both sides are
    /// case-folded and the stored casing is returned. When several casings of
    /// one word are stored, the one written first wins. A word whose key could
    /// never name an entry is reported as absent.
    pub fn resolve_with(&self, word: &str, match_case: bool) -> Result<Option<String>> {
        let key = shard_key(word, self.prefix_length);
        if let ShardKey::Prefix(prefix) = &key
            && !is_valid_entry_name(prefix)
        {
            return Ok(None);
        }
        let folded = if match_case {
            None
        } else {
            Some(fold_case(word))
        };

        let mut found = None;
        self.store.scan_entry(key.entry_name(), &mut |line: &str| {
            let matches = match &folded {
                Some(folded) => eq_folded(line, folded),
                None => line == word,
            };
            if matches {
                found = Some(line.to_string());
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;

        Ok(found)
    }

    /// Feed every stored word to `visitor`, entry by entry in container order.
    pub fn words<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        let _ = self.store.scan_all(&mut |line: &str| {
            visitor(line);
            ControlFlow::Continue(())
        })?;
        Ok(())
    }

    /// Feed stored words to `visitor` until it breaks, then return the
    /// accumulated value.
    pub fn words_until<T, F>(&self, init: T, mut visitor: F) -> Result<T>
    where
        F: FnMut(&mut T, &str) -> ControlFlow<()>,
    {
        let mut acc = init;
        let _ = self.store.scan_all(&mut |line: &str| visitor(&mut acc, line))?;
        Ok(acc)
    }

    /// Total number of stored words, short words included.
    pub fn count(&self) -> Result<usize> {
        self.words_until(0usize, |count, _| {
            *count += 1;
            ControlFlow::Continue(())
        })
    }

    /// Stored words satisfying `predicate`, in encounter order.
    ///
    /// Stops scanning once `limit` matches are collected.
    pub fn filter<P>(&self, mut predicate: P, limit: Option<usize>) -> Result<Vec<String>>
    where
        P: FnMut(&str) -> bool,
    {
        if limit == Some(0) {
            return Ok(Vec::new());
        }

        self.words_until(Vec::new(), |found, line| {
            if predicate(line) {
                found.push(line.to_string());
                if limit.is_some_and(|limit| found.len() >= limit) {
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        })
    }
}
