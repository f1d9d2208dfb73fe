// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, TranslationProvider};
use crate::markdown_splitter::{SplitMode, SplitOptions};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod chunk_processor;
mod dictionary;
mod errors;
mod file_utils;
mod markdown_splitter;
mod providers;
mod translation;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Anthropic,
    OpenAI,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
        }
    }
}

/// CLI Wrapper for DictionaryFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliDictionaryFormat {
    Colon,
    Comma,
}

impl From<CliDictionaryFormat> for dictionary::DictionaryFormat {
    fn from(cli_format: CliDictionaryFormat) -> Self {
        match cli_format {
            CliDictionaryFormat::Colon => dictionary::DictionaryFormat::Colon,
            CliDictionaryFormat::Comma => dictionary::DictionaryFormat::Comma,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SplitMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSplitMode {
    Heading,
    Chars,
    Tokens,
}

impl From<CliSplitMode> for SplitMode {
    fn from(cli_mode: CliSplitMode) -> Self {
        match cli_mode {
            CliSplitMode::Heading => SplitMode::Heading,
            CliSplitMode::Chars => SplitMode::Chars,
            CliSplitMode::Tokens => SplitMode::Tokens,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate Markdown chunks using AI providers
    Translate(TranslateArgs),

    /// Split one Markdown file into translation-sized chunks
    Chunk(ChunkArgs),

    /// Generate shell completions for lexis
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input chunk file or directory of chunks to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Source language (e.g. 'Spanish', 'es')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language (e.g. 'English', 'en'); appears in artifact names
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Output directory for artifacts (default: next to each source chunk)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Context lines taken from each neighboring chunk; 0 disables context
    #[arg(short, long)]
    context_lines: Option<usize>,

    /// Path to a terminology dictionary file
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Dictionary line format
    #[arg(long, value_enum)]
    dictionary_format: Option<CliDictionaryFormat>,

    /// Re-translate chunks even when their artifact already exists
    #[arg(short, long)]
    force_overwrite: bool,

    /// Wrap translated output to this line width
    #[arg(long)]
    wrap_width: Option<usize>,

    /// Configuration file path
    #[arg(long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ChunkArgs {
    /// Input Markdown file to split
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Output directory (default: {input}_chunks/ next to the input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Splitting mode
    #[arg(short, long, value_enum, default_value = "heading")]
    mode: CliSplitMode,

    /// Maximum heading level to split on (heading mode)
    #[arg(long, default_value_t = 2)]
    heading_level: u8,

    /// Maximum characters per chunk (chars mode)
    #[arg(long, default_value_t = 5000)]
    max_chars: usize,

    /// Maximum approximate tokens per chunk (tokens mode)
    #[arg(long, default_value_t = 1000)]
    max_tokens: usize,

    /// Overlap between consecutive size-based chunks
    #[arg(long, default_value_t = 200)]
    overlap: usize,
}

/// Lexis - Chunk-Aware Markdown Translation
///
/// Translates pre-chunked Markdown documents using AI providers while
/// preserving continuity across chunk boundaries.
#[derive(Parser, Debug)]
#[command(name = "lexis")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered Markdown chunk translation")]
#[command(long_about = "Lexis translates directories of Markdown chunks using AI providers,
carrying a bounded context window across chunk boundaries for continuity.

EXAMPLES:
    lexis translate chunks/ -s Spanish -t English   # Translate a chunk directory
    lexis translate chapter3.md -s es -t en         # Translate a single file
    lexis translate chunks/ -s es -t en -p open-ai -m gpt-4o
    lexis translate chunks/ -s es -t en -c 0        # Disable cross-chunk context
    lexis translate chunks/ -s es -t en -d terms.txt
    lexis chunk book.md --mode chars --max-chars 4000
    lexis completions bash > lexis.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file does
    not exist, a default one is created automatically. API keys are read from
    the environment (ANTHROPIC_API_KEY, OPENAI_API_KEY), never from arguments.

SUPPORTED PROVIDERS:
    anthropic - Anthropic messages API (default: claude-3-5-sonnet-20241022)
    open-ai   - OpenAI chat completions API (default: gpt-4o)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "lexis", &mut std::io::stdout());
            Ok(())
        }
        Commands::Chunk(args) => run_chunk(args),
        Commands::Translate(args) => run_translate(args).await,
    }
}

fn run_chunk(options: ChunkArgs) -> Result<()> {
    let split_options = SplitOptions {
        mode: options.mode.into(),
        heading_level: options.heading_level,
        max_chars: options.max_chars,
        max_tokens: options.max_tokens,
        overlap: options.overlap,
    };

    let content = file_utils::FileManager::read_to_string(&options.input_file)?;
    let sections = markdown_splitter::split(&content, &split_options)?;

    let output_dir = options.output_dir.unwrap_or_else(|| {
        let stem = options
            .input_file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "chunks".to_string());
        options
            .input_file
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("{}_chunks", stem))
    });
    let paths = markdown_splitter::write_sections(&sections, &output_dir)?;

    println!("Created {} chunk files:", paths.len());
    for path in paths {
        println!("  {}", path.display());
    }
    Ok(())
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        if let Some(provider_config) = config.translation.get_active_provider_config_mut() {
            provider_config.model = model.clone();
        }
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(context_lines) = options.context_lines {
        config.context_lines = context_lines;
    }
    if let Some(output_dir) = &options.output_dir {
        config.output_dir = Some(output_dir.clone());
    }
    if let Some(dictionary) = &options.dictionary {
        config.dictionary = Some(dictionary.clone());
    }
    if let Some(format) = &options.dictionary_format {
        config.dictionary_format = format.clone().into();
    }
    if let Some(width) = options.wrap_width {
        config.wrap.enabled = true;
        config.wrap.width = width;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Inject the provider credential from the environment; keys never come
    // from argument text, which would leak into shell history and logs.
    if config.translation.get_api_key().is_empty() {
        let env_var = config.translation.provider.api_key_env_var();
        if let Ok(key) = std::env::var(env_var) {
            config.translation.set_api_key(key);
        }
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller and run the batch
    let controller = Controller::with_config(config)?;
    let summary = controller
        .run(options.input_path, options.force_overwrite)
        .await?;

    if !summary.is_success() {
        return Err(anyhow!(
            "{} of {} dispatched chunk(s) failed",
            summary.failed,
            summary.translated + summary.failed
        ));
    }

    Ok(())
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
