/*!
 * Batch orchestration of chunk translation jobs.
 *
 * The controller drives the per-batch state machine: discover the chunk
 * sequence, filter out completed work, then for each pending chunk extract
 * context, assemble the request and dispatch it. Jobs run sequentially;
 * one chunk's failure is recorded and the loop moves on, so a long batch
 * is never torpedoed by one bad chunk. The final tally is a pure function
 * of the collected outcomes.
 */

use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;

use crate::app_config::Config;
use crate::chunk_processor::{ChunkFile, ChunkSequence, CompletionTracker};
use crate::dictionary::Dictionary;
use crate::errors::AppError;
use crate::translation::context;
use crate::translation::core::TranslationService;
use crate::translation::request::RequestAssembler;

/// Outcome of one chunk's translation job
pub struct JobOutcome {
    /// Chunk file name
    pub chunk: String,
    /// Artifact path on success, error kind on failure
    pub result: Result<PathBuf, AppError>,
}

/// Aggregate tally of a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchSummary {
    /// Jobs that produced an artifact
    pub translated: usize,
    /// Jobs that failed
    pub failed: usize,
    /// Chunks skipped because their artifact already existed
    pub skipped: usize,
}

impl BatchSummary {
    /// Fold per-job outcomes into the tally.
    pub fn from_outcomes(outcomes: &[JobOutcome], skipped: usize) -> Self {
        let translated = outcomes.iter().filter(|o| o.result.is_ok()).count();
        Self {
            translated,
            failed: outcomes.len() - translated,
            skipped,
        }
    }

    /// A batch succeeds when no job failed; zero pending work is success.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Main application controller for batch translation
pub struct Controller {
    /// Application configuration
    config: Config,
    /// Translation dispatcher
    service: TranslationService,
    /// Terminology dictionary, loaded once per batch
    dictionary: Option<Dictionary>,
}

impl Controller {
    /// Create a controller from configuration, building the provider
    /// backend from it.
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::from_config(&config)?;
        Self::build(config, service)
    }

    /// Create a controller around an explicit service. Lets tests inject
    /// mock backends.
    pub fn with_service(config: Config, service: TranslationService) -> Result<Self> {
        Self::build(config, service)
    }

    fn build(config: Config, service: TranslationService) -> Result<Self> {
        // Dictionary errors affect every job, so they abort the batch here,
        // before any dispatch.
        let dictionary = match &config.dictionary {
            Some(path) => {
                let dict = Dictionary::load(path, config.dictionary_format)
                    .map_err(AppError::Dictionary)?;
                info!("Loaded dictionary with {} entries from {:?}", dict.len(), path);
                Some(dict)
            }
            None => None,
        };

        Ok(Self {
            config,
            service,
            dictionary,
        })
    }

    /// Run a batch over a single chunk file or a directory of chunks.
    ///
    /// Returns the aggregate tally; the caller maps it to an exit status.
    pub async fn run(&self, input_path: PathBuf, force_overwrite: bool) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        // Discover
        let sequence = if input_path.is_file() {
            ChunkSequence::single(&input_path)?
        } else if input_path.is_dir() {
            ChunkSequence::discover(
                &input_path,
                &self.config.chunk_extension,
                &self.config.target_language,
            )?
        } else {
            return Err(anyhow!("Input path does not exist: {:?}", input_path));
        };

        if sequence.is_empty() {
            warn!("No chunk files found in {:?}", input_path);
            return Ok(BatchSummary::default());
        }

        // Filter
        let tracker = CompletionTracker::new(
            self.config.output_dir.clone(),
            &self.config.target_language,
            &self.config.chunk_extension,
        );
        let pending: Vec<usize> = if force_overwrite {
            (0..sequence.len()).collect()
        } else {
            tracker.pending(&sequence)
        };
        let skipped = sequence.len() - pending.len();

        if pending.is_empty() {
            info!(
                "All {} chunks already translated to {}, nothing to do",
                sequence.len(),
                self.config.target_language
            );
            return Ok(BatchSummary {
                translated: 0,
                failed: 0,
                skipped,
            });
        }

        info!(
            "Translating {} of {} chunks ({} -> {}) with {}",
            pending.len(),
            sequence.len(),
            self.config.source_language,
            self.config.target_language,
            self.service.backend_name()
        );

        let mut assembler = RequestAssembler::new(
            &self.config.translation.common.prompt,
            &self.config.source_language,
            &self.config.target_language,
        );
        if let Some(dictionary) = &self.dictionary {
            assembler = assembler.with_dictionary(dictionary);
        }

        let progress = batch_progress_bar(pending.len() as u64);

        // Per-chunk: extract, assemble, dispatch. Context always comes from
        // neighbors' original text, never their translations.
        let mut outcomes = Vec::with_capacity(pending.len());
        for &index in &pending {
            let Some(chunk) = sequence.get(index) else {
                continue;
            };
            progress.set_message(format!("Translating: {}", chunk.display_name()));

            let prev = index.checked_sub(1).and_then(|i| sequence.get(i));
            let next = sequence.get(index + 1);
            let outcome = self
                .run_job(chunk, prev, next, &tracker, &assembler)
                .await;
            if let Err(e) = &outcome.result {
                error!("Failed to translate {}: {}", outcome.chunk, e);
            }
            outcomes.push(outcome);
            progress.inc(1);
        }

        progress.finish_with_message("Batch complete");

        // Aggregate
        let summary = BatchSummary::from_outcomes(&outcomes, skipped);
        info!(
            "Batch finished in {:.1}s: {} translated, {} failed, {} skipped",
            start_time.elapsed().as_secs_f64(),
            summary.translated,
            summary.failed,
            summary.skipped
        );
        for outcome in outcomes.iter().filter(|o| o.result.is_err()) {
            warn!("Chunk failed: {}", outcome.chunk);
        }

        Ok(summary)
    }

    /// Run one chunk's job end to end. Every failure is folded into the
    /// outcome; nothing escapes to abort the batch loop.
    async fn run_job(
        &self,
        chunk: &ChunkFile,
        prev: Option<&ChunkFile>,
        next: Option<&ChunkFile>,
        tracker: &CompletionTracker,
        assembler: &RequestAssembler,
    ) -> JobOutcome {
        let name = chunk.display_name();

        let content = match chunk.load() {
            Ok(content) => content,
            Err(e) => {
                return JobOutcome {
                    chunk: name,
                    result: Err(AppError::File(e.to_string())),
                };
            }
        };

        let window = context::extract(prev, next, self.config.context_lines);

        let payload = assembler.assemble(&content, &window);
        let artifact_path = tracker.artifact_path(chunk);

        match self
            .service
            .dispatch(&payload, &name, &artifact_path)
            .await
        {
            Ok(()) => JobOutcome {
                chunk: name,
                result: Ok(artifact_path),
            },
            Err(e) => JobOutcome {
                chunk: name,
                result: Err(AppError::Translation(e)),
            },
        }
    }
}

/// Progress bar for the batch loop
fn batch_progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style.progress_chars("█▓▒░"));
    progress
}
