//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::builder::BuildStats;
use crate::cli::args::{OutputFormat, WordShardArgs};
use crate::error::Result;
use crate::pack::PackStats;

/// Rendering of a result for the human output format.
pub trait HumanOutput {
    fn human_lines(&self) -> Vec<String>;
}

/// Result structure for `build`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildResult {
    pub output_dir: String,
    #[serde(flatten)]
    pub stats: BuildStats,
}

/// Result structure for `pack`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PackResult {
    pub archive: String,
    #[serde(flatten)]
    pub stats: PackStats,
}

/// Result structure for `contains`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContainsResult {
    pub word: String,
    pub found: bool,
}

/// Result structure for `resolve`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResult {
    pub word: String,
    pub resolved: Option<String>,
}

/// Result structure for `count`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResult {
    pub count: usize,
}

/// Result structure for `filter`.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilterResult {
    pub pattern: String,
    pub words: Vec<String>,
}

impl HumanOutput for BuildResult {
    fn human_lines(&self) -> Vec<String> {
        vec![
            format!("Output directory: {}", self.output_dir),
            format!("Words: {}", self.stats.words),
            format!("Shards: {}", self.stats.shards),
            format!("Short words: {}", self.stats.short_words),
            format!("Skipped lines: {}", self.stats.skipped_lines),
        ]
    }
}

impl HumanOutput for PackResult {
    fn human_lines(&self) -> Vec<String> {
        vec![
            format!("Archive: {}", self.archive),
            format!("Entries: {}", self.stats.entries),
            format!("Bytes: {}", self.stats.bytes),
        ]
    }
}

impl HumanOutput for ContainsResult {
    fn human_lines(&self) -> Vec<String> {
        vec![self.found.to_string()]
    }
}

impl HumanOutput for ResolveResult {
    fn human_lines(&self) -> Vec<String> {
        vec![self.resolved.clone().unwrap_or_else(|| "(not found)".to_string())]
    }
}

impl HumanOutput for CountResult {
    fn human_lines(&self) -> Vec<String> {
        vec![self.count.to_string()]
    }
}

impl HumanOutput for FilterResult {
    fn human_lines(&self) -> Vec<String> {
        self.words.clone()
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &WordShardArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &WordShardArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    for line in result.human_lines() {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &WordShardArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
