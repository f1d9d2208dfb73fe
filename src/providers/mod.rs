/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for LLM providers:
 * - Anthropic: Anthropic messages API
 * - OpenAI: OpenAI chat completions API
 * - Mock: configurable in-process backend for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation backends.
///
/// Any backend that can submit a single-turn text completion and return the
/// text qualifies, which keeps providers interchangeable in the dispatcher.
/// The assembled request (instructions, dictionary, context markers and
/// content) arrives as one payload string.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Provider display name used in logs and error messages
    fn name(&self) -> &str;

    /// Submit a payload and return the raw completion text
    ///
    /// # Arguments
    /// * `payload` - The full assembled request text
    /// * `model` - Model identifier to run the completion with
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The completion text or an error
    async fn translate(&self, payload: &str, model: &str) -> Result<String, ProviderError>;
}

pub mod anthropic;
pub mod mock;
pub mod openai;
