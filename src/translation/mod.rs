/*!
 * Translation of chunked Markdown using AI providers.
 *
 * This module contains the per-chunk translation machinery:
 *
 * - `context`: Cross-chunk context window extraction
 * - `request`: Assembly of the literal request payload
 * - `core`: The dispatcher that drives a backend and persists artifacts
 * - `formatting`: Line wrapping of translated Markdown
 */

// Re-export main types for easier usage
pub use self::context::ContextWindow;
pub use self::core::TranslationService;
pub use self::request::RequestAssembler;

// Submodules
pub mod context;
pub mod core;
pub mod formatting;
pub mod request;
