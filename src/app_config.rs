use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::dictionary::DictionaryFormat;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language (name or code, e.g. "Spanish" or "es")
    pub source_language: String,

    /// Target language (name or code); used verbatim in artifact names
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Number of context lines taken from each neighboring chunk;
    /// 0 disables cross-chunk context entirely
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Extension of chunk files and artifacts
    #[serde(default = "default_chunk_extension")]
    pub chunk_extension: String,

    /// Output directory for artifacts; None writes next to the source chunk
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Optional terminology dictionary file
    #[serde(default)]
    pub dictionary: Option<PathBuf>,

    /// Dictionary line format
    #[serde(default)]
    pub dictionary_format: DictionaryFormat,

    /// Output line wrapping
    #[serde(default)]
    pub wrap: WrapConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Anthropic
    #[default]
    Anthropic,
    // @provider: OpenAI
    OpenAI,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::OpenAI => "OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Anthropic => "anthropic".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }

    /// Environment variable the provider's API key is sourced from
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }

    /// Whether the provider needs an API key at all
    pub fn requires_api_key(&self) -> bool {
        match self {
            Self::Anthropic | Self::OpenAI => true,
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAI),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key; normally left empty here and injected from the
    // environment, never from argument text
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max completion tokens per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: default_timeout_secs(),
                max_tokens: default_max_tokens(),
            },
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                timeout_secs: default_timeout_secs(),
                max_tokens: default_max_tokens(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Instruction prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Backoff in milliseconds before the single transient-error retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Output line wrapping configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WrapConfig {
    /// Whether to wrap translated output before persisting
    #[serde(default)]
    pub enabled: bool,

    /// Maximum line width
    #[serde(default = "default_wrap_width")]
    pub width: usize,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            width: default_wrap_width(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_context_lines() -> usize {
    5
}

fn default_chunk_extension() -> String {
    "md".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_tokens() -> u32 {
    8000
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_wrap_width() -> usize {
    120
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_prompt() -> String {
    "Translate the following markdown text from {source_language} to {target_language}. \
     Preserve all markdown formatting, structure, and syntax. Only translate the text \
     content, not the markdown syntax itself."
        .to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language must not be empty"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }

        // The target language token lands verbatim in artifact file names
        if self
            .target_language
            .chars()
            .any(|c| c.is_whitespace() || c == '/' || c == '\\' || c == '.')
        {
            return Err(anyhow!(
                "Target language '{}' contains characters unsuitable for file names",
                self.target_language
            ));
        }

        if self.chunk_extension.trim().is_empty() {
            return Err(anyhow!("Chunk extension must not be empty"));
        }

        // Validate endpoints of configured providers
        for provider in &self.translation.available_providers {
            if !provider.endpoint.is_empty() {
                Url::parse(&provider.endpoint).map_err(|e| {
                    anyhow!(
                        "Invalid endpoint for provider {}: {}",
                        provider.provider_type,
                        e
                    )
                })?;
            }
        }

        Ok(())
    }

    /// Effective wrap width; None when wrapping is disabled
    pub fn wrap_width(&self) -> Option<usize> {
        if self.wrap.enabled {
            Some(self.wrap.width)
        } else {
            None
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "Spanish".to_string(),
            target_language: "English".to_string(),
            translation: TranslationConfig::default(),
            context_lines: default_context_lines(),
            chunk_extension: default_chunk_extension(),
            output_dir: None,
            dictionary: None,
            dictionary_format: DictionaryFormat::default(),
            wrap: WrapConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get a mutable handle on the active provider configuration
    pub fn get_active_provider_config_mut(&mut self) -> Option<&mut ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Anthropic => default_anthropic_model(),
            TranslationProvider::OpenAI => default_openai_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        String::new()
    }

    /// Inject the API key for the active provider
    pub fn set_api_key(&mut self, api_key: String) {
        if let Some(provider_config) = self.get_active_provider_config_mut() {
            provider_config.api_key = api_key;
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
            TranslationProvider::OpenAI => default_openai_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        default_timeout_secs()
    }

    /// Get the max completion tokens for the active provider
    pub fn get_max_tokens(&self) -> u32 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.max_tokens > 0 {
                return provider_config.max_tokens;
            }
        }

        default_max_tokens()
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
        };

        // Add default providers
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::Anthropic));
        config
            .available_providers
            .push(ProviderConfig::new(TranslationProvider::OpenAI));

        config
    }
}
