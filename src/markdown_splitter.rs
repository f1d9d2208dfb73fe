/*!
 * Splitting one Markdown file into translation-sized chunk files.
 *
 * Three modes: by heading level (default), by character count with
 * paragraph-aware break points and overlap, or by approximate token count
 * (1 token ≈ 4 characters). Chunk files are numbered from 1 with
 * zero-padded prefixes so they naturally sequence.
 */

use anyhow::{Result, anyhow};
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

/// How to split a Markdown document
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SplitMode {
    /// Split on headings up to a level
    #[default]
    Heading,
    /// Split by character count
    Chars,
    /// Split by approximate token count
    Tokens,
}

/// Splitting parameters
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Splitting mode
    pub mode: SplitMode,
    /// Maximum heading level to split on (1-6), heading mode only
    pub heading_level: u8,
    /// Maximum characters per chunk, chars mode only
    pub max_chars: usize,
    /// Maximum approximate tokens per chunk, tokens mode only
    pub max_tokens: usize,
    /// Overlap between consecutive size-based chunks, in chars or tokens
    pub overlap: usize,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            mode: SplitMode::Heading,
            heading_level: 2,
            max_chars: 5000,
            max_tokens: 1000,
            overlap: 200,
        }
    }
}

/// One produced chunk: an optional section title and its content
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Heading title, None for size-based chunks
    pub title: Option<String>,
    /// Chunk content
    pub content: String,
}

/// Split content according to the options.
pub fn split(content: &str, options: &SplitOptions) -> Result<Vec<Section>> {
    match options.mode {
        SplitMode::Heading => {
            if !(1..=6).contains(&options.heading_level) {
                return Err(anyhow!(
                    "Heading level must be between 1 and 6, got {}",
                    options.heading_level
                ));
            }
            Ok(split_by_heading(content, options.heading_level))
        }
        SplitMode::Chars => Ok(split_by_size(content, options.max_chars, options.overlap)),
        SplitMode::Tokens => {
            // Rough approximation: 1 token is about 4 characters
            Ok(split_by_size(
                content,
                options.max_tokens * 4,
                options.overlap * 4,
            ))
        }
    }
}

/// Split on headings up to `max_level`. Content before the first heading
/// becomes an "Introduction" section.
pub fn split_by_heading(content: &str, max_level: u8) -> Vec<Section> {
    let pattern = Regex::new(&format!(r"^(#{{1,{}}})\s+(.+)$", max_level))
        .unwrap_or_else(|_| Regex::new(r"^(#{1,2})\s+(.+)$").unwrap());

    let mut sections = Vec::new();
    let mut current_title = "Introduction".to_string();
    let mut current_lines: Vec<&str> = Vec::new();

    for line in content.lines() {
        if let Some(captures) = pattern.captures(line) {
            if !current_lines.is_empty() {
                sections.push(Section {
                    title: Some(current_title.clone()),
                    content: current_lines.join("\n").trim().to_string(),
                });
            }
            current_title = captures[2].trim().to_string();
            current_lines = vec![line];
        } else {
            current_lines.push(line);
        }
    }

    if !current_lines.is_empty() {
        sections.push(Section {
            title: Some(current_title),
            content: current_lines.join("\n").trim().to_string(),
        });
    }

    sections.retain(|s| !s.content.is_empty());
    sections
}

/// Split by character count with overlap, preferring paragraph boundaries
/// near the cut point.
pub fn split_by_size(content: &str, max_chars: usize, overlap: usize) -> Vec<Section> {
    let mut sections = Vec::new();
    if max_chars == 0 {
        return sections;
    }

    let len = content.len();
    let mut start = 0usize;

    while start < len {
        let mut end = floor_char_boundary(content, (start + max_chars).min(len));

        // Prefer a paragraph break in the trailing 200 chars of the window
        if end < len {
            let search_start = floor_char_boundary(content, start.max(end.saturating_sub(200)));
            if let Some(pos) = content[search_start..end].rfind("\n\n") {
                end = search_start + pos + 2;
            }
        }

        let piece = content[start..end].trim();
        if !piece.is_empty() {
            sections.push(Section {
                title: None,
                content: piece.to_string(),
            });
        }

        if end >= len {
            break;
        }
        let next = floor_char_boundary(content, end.saturating_sub(overlap));
        // Overlap must never stall the walk
        start = if next > start { next } else { end };
    }

    sections
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Write sections to numbered chunk files and return their paths.
/// Heading sections get the title in the file name and, when missing, as a
/// top-level heading in the content.
pub fn write_sections<P: AsRef<Path>>(sections: &[Section], output_dir: P) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    FileManager::ensure_dir(output_dir)?;

    let mut paths = Vec::new();
    for (i, section) in sections.iter().enumerate() {
        let (filename, content) = match &section.title {
            Some(title) => {
                let safe_title = sanitize_title(title);
                let content = if section.content.starts_with('#') {
                    section.content.clone()
                } else {
                    format!("# {}\n\n{}", title, section.content)
                };
                (format!("{:03}-{}.md", i + 1, safe_title), content)
            }
            None => (format!("{:03}-chunk.md", i + 1), section.content.clone()),
        };

        let path = output_dir.join(filename);
        FileManager::write_to_file(&path, &content)?;
        paths.push(path);
    }

    Ok(paths)
}

/// Reduce a heading title to a safe, bounded file name fragment.
fn sanitize_title(title: &str) -> String {
    let strip = Regex::new(r"[^\w\s-]").unwrap();
    let collapse = Regex::new(r"[-\s]+").unwrap();

    let stripped = strip.replace_all(title, "");
    let collapsed = collapse.replace_all(stripped.trim(), "-");
    collapsed.chars().take(50).collect()
}
