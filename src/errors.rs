/*!
 * Error types for the lexis application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether this error is a transient transport failure worth a single retry.
    /// Empty or malformed payloads are never transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError(_) | Self::RateLimitExceeded(_)
        )
    }
}

/// Errors that can occur when loading a terminology dictionary.
/// Any of these abort the whole batch before a single job is dispatched.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The dictionary file does not exist
    #[error("Dictionary file not found: {0:?}")]
    NotFound(PathBuf),

    /// A line could not be parsed as a term mapping
    #[error("Malformed dictionary entry at line {line}: {reason}")]
    Format {
        /// 1-based line number in the dictionary file
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// The file could not be read
    #[error("Failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during translation of a single chunk.
/// These are scoped to one job and never abort the batch loop.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The backend returned blank or whitespace-only output
    #[error("Provider returned an empty translation for '{chunk}'")]
    EmptyTranslation {
        /// Name of the chunk whose translation came back empty
        chunk: String,
    },

    /// The required API key was absent at dispatch time
    #[error("Missing API key for provider '{provider}' (set {env_var})")]
    MissingCredential {
        /// Provider display name
        provider: String,
        /// Environment variable the key is normally sourced from
        env_var: String,
    },

    /// The translated text could not be persisted
    #[error("Failed to write artifact {path:?}: {source}")]
    ArtifactWrite {
        /// Target artifact path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from dictionary loading
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
