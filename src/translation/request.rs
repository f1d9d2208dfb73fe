/*!
 * Assembly of the literal request text sent to a translation backend.
 *
 * The assembled request is one string: instruction prompt, optional
 * terminology dictionary, then the content payload. When cross-chunk
 * context is present the payload wraps the chunk text between explicit,
 * LLM-readable markers; without context the payload is the chunk text
 * unmodified, indistinguishable from single-chunk mode.
 */

use crate::dictionary::Dictionary;
use crate::translation::context::ContextWindow;

/// Marker opening the previous-chunk context block
pub const PREVIOUS_CONTEXT_MARKER: &str =
    "=== CONTEXT FROM PREVIOUS CHUNK (do not translate, for continuity only) ===";

/// Marker opening the main content block
pub const MAIN_CONTENT_MARKER: &str = "=== MAIN CONTENT TO TRANSLATE ===";

/// Marker opening the next-chunk context block
pub const NEXT_CONTEXT_MARKER: &str =
    "=== CONTEXT FROM NEXT CHUNK (do not translate, for continuity only) ===";

/// Builds request text for translation jobs. One assembler is shared by
/// every job in a batch; the prompt and dictionary are fixed per batch.
#[derive(Debug, Clone)]
pub struct RequestAssembler {
    /// Instruction prompt with language placeholders already substituted
    prompt: String,
    /// Rendered dictionary section, empty when no dictionary is configured
    dictionary_block: String,
}

impl RequestAssembler {
    /// Create an assembler from a prompt template. The template may use
    /// `{source_language}` and `{target_language}` placeholders.
    pub fn new(prompt_template: &str, source_language: &str, target_language: &str) -> Self {
        let prompt = prompt_template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language);
        Self {
            prompt,
            dictionary_block: String::new(),
        }
    }

    /// Attach a terminology dictionary, injected into every request.
    pub fn with_dictionary(mut self, dictionary: &Dictionary) -> Self {
        self.dictionary_block = dictionary.render();
        self
    }

    /// Build the content payload for one chunk. With an empty context
    /// window the payload is byte-identical to `content`; no markers leak
    /// in when context is disabled.
    pub fn payload(&self, content: &str, window: &ContextWindow) -> String {
        if window.is_empty() {
            return content.to_string();
        }

        let mut out = String::new();
        if !window.prefix.is_empty() {
            out.push_str(PREVIOUS_CONTEXT_MARKER);
            out.push('\n');
            for line in &window.prefix {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        out.push_str(MAIN_CONTENT_MARKER);
        out.push('\n');
        out.push_str(content);

        if !window.suffix.is_empty() {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(NEXT_CONTEXT_MARKER);
            out.push('\n');
            for line in &window.suffix {
                out.push_str(line);
                out.push('\n');
            }
        }

        out
    }

    /// Assemble the full request: prompt, dictionary section, payload.
    /// No size limit is enforced here; oversized chunks are an upstream
    /// splitting concern.
    pub fn assemble(&self, content: &str, window: &ContextWindow) -> String {
        format!(
            "{}\n{}\n## Text to Translate\n\n{}",
            self.prompt,
            self.dictionary_block,
            self.payload(content, window)
        )
    }
}
