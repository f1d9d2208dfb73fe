/*!
 * Core translation dispatch.
 *
 * This module contains the TranslationService, which drives a pluggable
 * backend for one job at a time: it checks the credential, submits the
 * assembled payload, rejects empty results, and persists the translated
 * artifact in one shot.
 */

use anyhow::{Result, anyhow};
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, TranslationProvider};
use crate::errors::TranslationError;
use crate::providers::Backend;
use crate::providers::anthropic::Anthropic;
use crate::providers::openai::OpenAI;
use crate::translation::formatting::wrap_markdown_lines;

/// Dispatches translation jobs to a backend and persists artifacts.
pub struct TranslationService {
    /// The translation backend
    backend: Arc<dyn Backend>,
    /// Model identifier passed to the backend
    model: String,
    /// Injected API credential; empty means absent
    api_key: String,
    /// Whether the backend needs a credential at all
    requires_credential: bool,
    /// Environment variable the credential is normally sourced from
    credential_env_var: String,
    /// Line width for output wrapping; None disables wrapping
    wrap_width: Option<usize>,
    /// Backoff before the single transient-error retry
    retry_backoff_ms: u64,
}

impl TranslationService {
    /// Build a service from the application configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let translation = &config.translation;
        let endpoint = translation.get_endpoint();
        let timeout_secs = translation.get_timeout_secs();
        let api_key = translation.get_api_key();

        let backend: Arc<dyn Backend> = match translation.provider {
            TranslationProvider::Anthropic => Arc::new(Anthropic::new(
                api_key.clone(),
                endpoint,
                timeout_secs,
                translation.get_max_tokens(),
            )),
            TranslationProvider::OpenAI => {
                Arc::new(OpenAI::new(api_key.clone(), endpoint, timeout_secs))
            }
        };

        let model = translation.get_model();
        if model.is_empty() {
            return Err(anyhow!(
                "No model configured for provider {}",
                translation.provider.display_name()
            ));
        }

        Ok(Self {
            backend,
            model,
            api_key,
            requires_credential: translation.provider.requires_api_key(),
            credential_env_var: translation.provider.api_key_env_var().to_string(),
            wrap_width: config.wrap_width(),
            retry_backoff_ms: translation.common.retry_backoff_ms,
        })
    }

    /// Build a service around an explicit backend. Used by tests to
    /// substitute mock backends; no credential is required.
    pub fn with_backend(backend: Arc<dyn Backend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            api_key: String::new(),
            requires_credential: false,
            credential_env_var: String::new(),
            wrap_width: None,
            retry_backoff_ms: 0,
        }
    }

    /// Require a credential at dispatch time (builder, mainly for tests).
    pub fn require_credential(mut self, api_key: impl Into<String>, env_var: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self.credential_env_var = env_var.into();
        self.requires_credential = true;
        self
    }

    /// Set the output wrap width (builder).
    pub fn wrap_width(mut self, width: Option<usize>) -> Self {
        self.wrap_width = width;
        self
    }

    /// Provider display name
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Translate one assembled payload.
    ///
    /// The credential is checked per job, not cached across jobs. A
    /// transient transport error gets exactly one retry after a short
    /// backoff; blank results are a content problem and are never retried.
    pub async fn translate_payload(
        &self,
        payload: &str,
        chunk: &str,
    ) -> Result<String, TranslationError> {
        if self.requires_credential && self.api_key.trim().is_empty() {
            return Err(TranslationError::MissingCredential {
                provider: self.backend.name().to_string(),
                env_var: self.credential_env_var.clone(),
            });
        }

        let mut retried = false;
        loop {
            match self.backend.translate(payload, &self.model).await {
                Ok(text) => {
                    if text.trim().is_empty() {
                        return Err(TranslationError::EmptyTranslation {
                            chunk: chunk.to_string(),
                        });
                    }
                    return Ok(text);
                }
                Err(e) if e.is_transient() && !retried => {
                    warn!(
                        "Transient {} error for '{}', retrying once: {}",
                        self.backend.name(),
                        chunk,
                        e
                    );
                    tokio::time::sleep(Duration::from_millis(self.retry_backoff_ms)).await;
                    retried = true;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Translate a payload and persist the artifact.
    ///
    /// The backend returns full text in one shot, so the artifact is
    /// written in a single call; a failed job leaves no partial file.
    pub async fn dispatch(
        &self,
        payload: &str,
        chunk: &str,
        artifact_path: &Path,
    ) -> Result<(), TranslationError> {
        let translated = self.translate_payload(payload, chunk).await?;

        let output = match self.wrap_width {
            Some(width) => wrap_markdown_lines(&translated, width),
            None => translated,
        };

        if let Some(parent) = artifact_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TranslationError::ArtifactWrite {
                path: artifact_path.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(artifact_path, &output).map_err(|e| TranslationError::ArtifactWrite {
            path: artifact_path.to_path_buf(),
            source: e,
        })?;

        debug!("Wrote artifact {:?} ({} chars)", artifact_path, output.chars().count());
        Ok(())
    }
}
