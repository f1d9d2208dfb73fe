/*!
 * Terminology dictionary loading.
 *
 * A dictionary is an ordered list of term mappings loaded once per batch and
 * injected verbatim into every translation request. Terminology errors are
 * fatal: they affect every job, so the batch aborts before any dispatch.
 */

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::errors::DictionaryError;

/// Line format of the terminology file
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryFormat {
    /// `term: translation1, translation2`
    #[default]
    Colon,
    /// CSV-style `term,translation` with an optional header row
    Comma,
}

impl fmt::Display for DictionaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Colon => write!(f, "colon"),
            Self::Comma => write!(f, "comma"),
        }
    }
}

impl FromStr for DictionaryFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "colon" => Ok(Self::Colon),
            "comma" | "csv" => Ok(Self::Comma),
            _ => Err(anyhow!("Invalid dictionary format: {}", s)),
        }
    }
}

/// One term mapping
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    /// Source-language term
    pub term: String,
    /// Target-language translations, in preference order
    pub translations: Vec<String>,
}

impl DictionaryEntry {
    /// Render as the `term -> translation1, translation2` form used in
    /// request payloads.
    pub fn render(&self) -> String {
        format!("{} -> {}", self.term, self.translations.join(", "))
    }
}

/// An ordered, immutable set of term mappings for one batch
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
}

impl Dictionary {
    /// Load and parse a terminology file.
    pub fn load<P: AsRef<Path>>(
        path: P,
        format: DictionaryFormat,
    ) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DictionaryError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, format)
    }

    /// Parse dictionary text. Blank lines and `#` comments are ignored.
    /// A line without the separator, or with an empty term or translation,
    /// is a hard parse error.
    pub fn parse(text: &str, format: DictionaryFormat) -> Result<Self, DictionaryError> {
        let mut entries = Vec::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // The CSV convention allows a leading header row
            if format == DictionaryFormat::Comma && entries.is_empty() && is_csv_header(line) {
                continue;
            }

            let separator = match format {
                DictionaryFormat::Colon => ':',
                DictionaryFormat::Comma => ',',
            };

            let (term, rest) = line.split_once(separator).ok_or_else(|| {
                DictionaryError::Format {
                    line: index + 1,
                    reason: format!("missing '{}' separator", separator),
                }
            })?;

            let term = term.trim();
            if term.is_empty() {
                return Err(DictionaryError::Format {
                    line: index + 1,
                    reason: "empty term".to_string(),
                });
            }

            let translations: Vec<String> = rest
                .split(',')
                .map(|t| t.trim().to_string())
                .collect();
            if translations.iter().any(|t| t.is_empty()) {
                return Err(DictionaryError::Format {
                    line: index + 1,
                    reason: "empty translation".to_string(),
                });
            }

            entries.push(DictionaryEntry {
                term: term.to_string(),
                translations,
            });
        }

        Ok(Self { entries })
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Render the dictionary section injected between the instruction
    /// prompt and the content payload. Empty dictionaries render nothing.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }

        let mut out = String::from("\n## Translation Dictionary\nUse the following term translations:\n```\n");
        for entry in &self.entries {
            out.push_str(&entry.render());
            out.push('\n');
        }
        out.push_str("```\n");
        out
    }
}

/// Detect the optional header row of a CSV-style dictionary.
fn is_csv_header(line: &str) -> bool {
    let first = line.split(',').next().unwrap_or("").trim().to_lowercase();
    matches!(first.as_str(), "source" | "term" | "original")
}
