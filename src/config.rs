//! Configuration shared by the build and query sides of a word store.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WordShardError};

/// Default number of leading characters forming a shard key.
pub const DEFAULT_PREFIX_LENGTH: usize = 3;

/// Layout parameters of a packed word store.
///
/// Both the builder and every reader must use the same values, otherwise
/// entry names and query keys disagree and lookups silently miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordStoreConfig {
    /// Number of leading characters that form a shard key.
    pub prefix_length: usize,

    /// Directory prefix of all entries inside the packed archive.
    pub base_path: String,
}

impl Default for WordStoreConfig {
    fn default() -> Self {
        WordStoreConfig {
            prefix_length: DEFAULT_PREFIX_LENGTH,
            base_path: String::new(),
        }
    }
}

impl WordStoreConfig {
    /// Create a configuration with the given prefix length and base path.
    pub fn new(prefix_length: usize, base_path: impl Into<String>) -> Self {
        WordStoreConfig {
            prefix_length,
            base_path: base_path.into(),
        }
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: WordStoreConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a usable layout.
    pub fn validate(&self) -> Result<()> {
        if self.prefix_length == 0 {
            return Err(WordShardError::invalid_config(
                "prefix length must be at least 1",
            ));
        }
        Ok(())
    }
}
