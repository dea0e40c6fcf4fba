// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, LogLevel, SpeedPreset, TranslationProvider};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod downloader;
mod errors;
mod file_utils;
mod jobs;
mod language_utils;
mod providers;
mod sources;
mod subtitle_processor;
mod translation;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    LibreTranslate,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::LibreTranslate => TranslationProvider::LibreTranslate,
        }
    }
}

/// CLI Wrapper for SpeedPreset to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSpeedPreset {
    Slow,
    Normal,
    Fast,
    Turbo,
}

impl From<CliSpeedPreset> for SpeedPreset {
    fn from(cli_speed: CliSpeedPreset) -> Self {
        match cli_speed {
            CliSpeedPreset::Slow => SpeedPreset::Slow,
            CliSpeedPreset::Normal => SpeedPreset::Normal,
            CliSpeedPreset::Fast => SpeedPreset::Fast,
            CliSpeedPreset::Turbo => SpeedPreset::Turbo,
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

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate an SRT file or a directory of SRT files (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Search subtitle catalogs for a movie, download and translate
    Search(SearchArgs),

    /// Generate shell completions for subtran
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Source language code (e.g., 'en', 'fr', 'de')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'tr', 'es', 'it')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation speed preset
    #[arg(long, value_enum)]
    speed: Option<CliSpeedPreset>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct SearchArgs {
    /// Movie name to search subtitles for
    #[arg(value_name = "MOVIE_NAME")]
    movie_name: String,

    /// Output directory for the translated subtitle
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Only list ranked candidates, do not download or translate
    #[arg(short, long)]
    list: bool,

    /// Candidate number to download (from the ranked list, 0 = best)
    #[arg(long)]
    pick: Option<usize>,

    /// Source language code (e.g., 'en', 'fr', 'de')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'tr', 'es', 'it')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation speed preset
    #[arg(long, value_enum)]
    speed: Option<CliSpeedPreset>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subtran - subtitle search, download and translation
///
/// Finds subtitles for a named movie or takes an existing SRT file, and
/// translates it with a machine-translation backend, batch by batch.
#[derive(Parser, Debug)]
#[command(name = "subtran")]
#[command(version = "1.1.0")]
#[command(about = "Subtitle search, download and batch translation")]
#[command(long_about = "subtran locates and downloads SRT subtitles for a movie, or takes a local
SRT file, and translates the text of every entry while preserving the
original numbering and timing.

EXAMPLES:
    subtran movie.srt                         # Translate using default config
    subtran -s en -t es movie.srt             # Translate from English to Spanish
    subtran --speed turbo movie.srt           # Bigger batches, shorter pauses
    subtran /subs/                            # Translate every .srt in a directory
    subtran search \"Inception\"                # Find, download and translate
    subtran search --list \"Inception\"         # Just print ranked candidates
    subtran completions bash > subtran.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.

SUPPORTED PROVIDERS:
    google         - Google web translate endpoint (no API key)
    libretranslate - LibreTranslate server (default: http://localhost:5000)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Source language code (e.g., 'en', 'fr', 'de')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'tr', 'es', 'it')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation speed preset
    #[arg(long, value_enum)]
    speed: Option<CliSpeedPreset>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default.
    // The level is updated after the config is loaded.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtran", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        Some(Commands::Search(args)) => run_search(args).await,
        None => {
            // Default behavior - use top-level args as the translate command
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                provider: cli.provider,
                source_language: cli.source_language,
                target_language: cli.target_language,
                speed: cli.speed,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

/// Load configuration from disk (creating a default file when missing)
/// and apply CLI overrides on top
fn load_config(
    config_path: &str,
    provider: Option<CliTranslationProvider>,
    source_language: Option<String>,
    target_language: Option<String>,
    speed: Option<CliSpeedPreset>,
    log_level: Option<CliLogLevel>,
) -> Result<Config> {
    if let Some(cmd_log_level) = &log_level {
        log::set_max_level(level_filter(cmd_log_level.clone().into()));
    }

    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .save_to_file(config_path)
            .context("Failed to write default config")?;
        config
    };

    if let Some(provider) = provider {
        config.translation.provider = provider.into();
    }
    if let Some(source_lang) = source_language {
        config.source_language = source_lang;
    }
    if let Some(target_lang) = target_language {
        config.target_language = target_lang;
    }
    if let Some(speed) = speed {
        config.speed = speed.into();
    }
    if let Some(log_level) = log_level {
        config.log_level = log_level.into();
    } else {
        log::set_max_level(level_filter(config.log_level));
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Cancel all running jobs on ctrl-c; the pipeline stops at the next
/// batch boundary and the partial result is still saved
fn wire_ctrl_c(controller: &Controller) {
    let jobs = controller.jobs();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling running translations...");
            jobs.cancel_all();
        }
    });
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let config = load_config(
        &options.config_path,
        options.provider,
        options.source_language,
        options.target_language,
        options.speed,
        options.log_level,
    )?;

    let controller = Controller::with_config(config)?;
    wire_ctrl_c(&controller);

    let output_dir = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => {
            if options.input_path.is_dir() {
                options.input_path.clone()
            } else {
                options
                    .input_path
                    .parent()
                    .unwrap_or(Path::new("."))
                    .to_path_buf()
            }
        }
    };

    if options.input_path.is_dir() {
        controller
            .translate_dir(&options.input_path, &output_dir, options.force_overwrite)
            .await
    } else {
        controller
            .translate_file(&options.input_path, &output_dir, options.force_overwrite)
            .await
    }
}

async fn run_search(options: SearchArgs) -> Result<()> {
    let config = load_config(
        &options.config_path,
        None,
        options.source_language,
        options.target_language,
        options.speed,
        options.log_level,
    )?;

    let controller = Controller::with_config(config)?;
    wire_ctrl_c(&controller);

    if options.list {
        let candidates = controller.search(&options.movie_name).await?;
        println!(
            "{:>3}  {:<14} {:<34} {:>6} {:>9}  {:<24} {:<14}",
            "#", "Source", "Title", "Rating", "Downloads", "Release", "Uploader"
        );
        for (i, candidate) in candidates.iter().enumerate() {
            println!(
                "{:>3}  {:<14} {:<34} {:>6.1} {:>9}  {:<24} {:<14}",
                i,
                candidate.source,
                truncate(&candidate.title, 34),
                candidate.rating,
                candidate.downloads,
                truncate(&candidate.release, 24),
                truncate(&candidate.uploader, 14),
            );
        }
        return Ok(());
    }

    let output_path = controller
        .search_and_translate(&options.movie_name, &options.output_dir, options.pick)
        .await?;

    info!("Saved translated subtitle to {:?}", output_path);
    Ok(())
}

/// Clip a string to a display width, character-safe
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", clipped)
    }
}
