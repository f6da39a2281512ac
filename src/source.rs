//! Reading word lists for the partition builder.
//!
//! Source lists are line-oriented text where each line carries its word
//! inside the first pair of double quotes, e.g. a JSON array written one
//! element per line:
//!
//! ```text
//! [
//!   "ant",
//!   "ants",
//! ]
//! ```
//!
//! Lines without a closing quote pair are skipped and counted.

use std::io::BufRead;

use log::warn;

use crate::error::Result;

/// Extract the word enclosed by the first pair of double quotes on `line`.
pub fn extract_quoted(line: &str) -> Option<&str> {
    let start = line.find('"')?;
    let rest = &line[start + 1..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Iterator over the quoted words of a source reader.
///
/// Yields `Err` for I/O failures and keeps a count of skipped lines that can
/// be read back with [`QuotedWordReader::skipped_lines`] once iteration ends.
#[derive(Debug)]
pub struct QuotedWordReader<R> {
    reader: R,
    buffer: String,
    line_number: usize,
    skipped_lines: usize,
}

impl<R: BufRead> QuotedWordReader<R> {
    pub fn new(reader: R) -> Self {
        QuotedWordReader {
            reader,
            buffer: String::new(),
            line_number: 0,
            skipped_lines: 0,
        }
    }

    /// Number of lines dropped because they held no quoted word.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

impl<R: BufRead> Iterator for QuotedWordReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;

            match extract_quoted(&self.buffer) {
                Some(word) => return Some(Ok(word.to_string())),
                None => {
                    self.skipped_lines += 1;
                    let trimmed = self.buffer.trim();
                    // Bracket-only lines are the JSON array frame, not data.
                    if !trimmed.is_empty() && trimmed != "[" && trimmed != "]" {
                        warn!(
                            "Skipping source line {} without a quoted word: {}",
                            self.line_number, trimmed
                        );
                    }
                }
            }
        }
    }
}
