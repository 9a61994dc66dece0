//! Class index to label mapping.
//!
//! The label resource is a text file with one class per line, in class index
//! order. Each line starts with an identifier token followed by whitespace and
//! the human-readable name, e.g. `n01440764 tench, Tinca tinca`.

use crate::errors::ClassifyError;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Label used in place of a line that has no identifier/name separator.
pub const PLACEHOLDER_LABEL: &str = "unknown";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Load labels from a file. A missing or unreadable file is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ClassifyError::not_found(path, e))?;

        let table = Self::from_reader(BufReader::new(file)).map_err(|e| {
            ClassifyError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        tracing::info!(
            path = %path.display(),
            labels = table.len(),
            "Loaded label table"
        );

        Ok(table)
    }

    /// Parse labels line by line.
    ///
    /// Blank lines are skipped. Lines without a separator are replaced by
    /// [`PLACEHOLDER_LABEL`] so every later line keeps its class index.
    /// Bytes that are not valid UTF-8 are decoded lossily.
    pub fn from_reader(mut reader: impl BufRead) -> std::io::Result<Self> {
        let mut labels = Vec::new();
        let mut buf = Vec::new();
        let mut line_number = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            let raw = strip_line_ending(&buf);
            let line = String::from_utf8_lossy(raw);
            if let Cow::Owned(_) = line {
                tracing::warn!(
                    line = line_number,
                    "Label line is not valid UTF-8, decoding lossily"
                );
            }

            if line.trim().is_empty() {
                tracing::debug!(line = line_number, "Skipping blank label line");
                continue;
            }

            match parse_line(&line) {
                Some(label) => labels.push(label.to_string()),
                None => {
                    tracing::warn!(
                        line = line_number,
                        content = %line,
                        "Malformed label line, using placeholder"
                    );
                    labels.push(PLACEHOLDER_LABEL.to_string());
                }
            }
        }

        Ok(Self { labels })
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Everything after the first whitespace run, or `None` if there is none.
fn parse_line(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(char::is_whitespace)?;
    Some(rest.trim_start())
}
