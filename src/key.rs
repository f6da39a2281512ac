//! Shard key derivation.
//!
//! A shard key is the first `prefix_length` characters of a word, lowercased
//! one `char` at a time with Unicode's locale-independent mapping. Words with
//! fewer characters have no key and go into the short-word entry instead.
//! Lengths are counted in `char`s.

use std::fmt;

/// Name of the reserved entry holding all words shorter than the prefix length.
pub const SHORT_WORDS_ENTRY: &str = ".shortnames";

/// The bucket a word belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShardKey {
    /// Case-folded prefix naming a shard entry.
    Prefix(String),
    /// The word is shorter than the prefix length.
    Short,
}

impl ShardKey {
    /// Name of the store entry holding words with this key.
    pub fn entry_name(&self) -> &str {
        match self {
            ShardKey::Prefix(prefix) => prefix,
            ShardKey::Short => SHORT_WORDS_ENTRY,
        }
    }

    pub fn is_short(&self) -> bool {
        matches!(self, ShardKey::Short)
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry_name())
    }
}

/// Derive the shard key of `word`.
pub fn shard_key(word: &str, prefix_length: usize) -> ShardKey {
    let prefix = match word.char_indices().nth(prefix_length) {
        Some((idx, _)) => &word[..idx],
        None if word.chars().count() == prefix_length => word,
        None => return ShardKey::Short,
    };

    ShardKey::Prefix(fold_case(prefix))
}

/// The case folding used for shard keys and case-insensitive comparison.
///
/// Each `char` is lowered on its own, so the result never depends on the
/// surrounding text (`str::to_lowercase` turns a final `Σ` into `ς`).
pub fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive equality under [`fold_case`], without allocating.
pub fn eq_folded(candidate: &str, folded_query: &str) -> bool {
    candidate
        .chars()
        .flat_map(char::to_lowercase)
        .eq(folded_query.chars())
}

/// Whether a shard key can be used as a store entry name.
///
/// Keys become file names in a directory storage and archive member names,
/// so they must not escape or shadow the namespace.
pub fn is_valid_entry_name(key: &str) -> bool {
    !(key.contains(['/', '\\', '\0'])
        || key == SHORT_WORDS_ENTRY
        || key == "."
        || key == "..")
}
