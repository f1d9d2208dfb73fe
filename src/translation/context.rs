/*!
 * Cross-chunk context window extraction.
 *
 * A context window is a bounded excerpt from a chunk's neighbors, included
 * in the translation request purely for continuity at chunk boundaries.
 * It is computed fresh per request from the neighbors' original text and
 * never cached, so extraction can never depend on a neighbor's translation.
 */

use log::warn;

use crate::chunk_processor::ChunkFile;

/// Bounded excerpts from a chunk's neighbors in the sequence.
///
/// `prefix` holds the tail of the previous chunk (what was just written);
/// `suffix` holds the head of the next chunk. Both sides drop empty lines:
/// blank lines carry no continuity signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextWindow {
    /// Trailing lines of the previous chunk, in original order
    pub prefix: Vec<String>,
    /// Leading lines of the next chunk, in original order
    pub suffix: Vec<String>,
}

impl ContextWindow {
    /// Whether both context sides are empty
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

/// Extract a context window for one chunk's translation request.
///
/// With `context_lines == 0` both sides are empty regardless of neighbor
/// availability. A neighbor that cannot be read degrades to empty context
/// for that side with a warning; it never fails the job.
pub fn extract(
    prev: Option<&ChunkFile>,
    next: Option<&ChunkFile>,
    context_lines: usize,
) -> ContextWindow {
    if context_lines == 0 {
        return ContextWindow::default();
    }

    let prefix = match prev {
        Some(chunk) => match chunk.load() {
            Ok(content) => trailing_lines(&content, context_lines),
            Err(e) => {
                warn!(
                    "Could not read previous chunk {} for context, continuing without it: {}",
                    chunk.display_name(),
                    e
                );
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let suffix = match next {
        Some(chunk) => match chunk.load() {
            Ok(content) => leading_lines(&content, context_lines),
            Err(e) => {
                warn!(
                    "Could not read next chunk {} for context, continuing without it: {}",
                    chunk.display_name(),
                    e
                );
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    ContextWindow { prefix, suffix }
}

/// Last `count` non-empty lines of `content`, preserving their order.
/// Never pads: shorter content yields fewer lines.
fn trailing_lines(content: &str, count: usize) -> Vec<String> {
    let mut lines: Vec<String> = content
        .lines()
        .rev()
        .filter(|l| !l.trim().is_empty())
        .take(count)
        .map(|l| l.to_string())
        .collect();
    lines.reverse();
    lines
}

/// First `count` non-empty lines of `content`.
fn leading_lines(content: &str, count: usize) -> Vec<String> {
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(count)
        .map(|l| l.to_string())
        .collect()
}
