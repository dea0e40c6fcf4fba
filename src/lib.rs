/*!
 * # subtran - Subtitle Search, Download and Translation
 *
 * A Rust library for locating, downloading and translating SubRip
 * subtitle files.
 *
 * ## Features
 *
 * - Lenient SRT parsing that preserves original numbering and timing
 * - Batch translation with a reversible join/split encoding and a
 *   mandatory per-entry fallback when the backend breaks alignment
 * - Pluggable machine-translation backends (Google, LibreTranslate)
 * - Concurrent multi-catalog subtitle search with quality ranking
 * - Cooperative cancellation with partial results
 * - Speed presets trading throughput against robustness
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: SRT document parsing and serialization
 * - `translation`: the batch translation pipeline:
 *   - `translation::pipeline`: batching, alignment fallback, progress
 *   - `translation::cancel`: cooperative cancellation token
 *   - `translation::service`: per-run backend construction
 * - `providers`: translation backend clients:
 *   - `providers::google`: Google web translate client
 *   - `providers::libretranslate`: LibreTranslate client
 *   - `providers::mock`: mock backend for tests
 * - `sources`: subtitle catalog search clients and ranking
 * - `downloader`: concurrent multi-source search and payload download
 * - `jobs`: run registry with an explicit lifecycle state machine
 * - `app_config`: configuration management
 * - `app_controller`: main application controller
 * - `file_utils`: file system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod downloader;
pub mod errors;
pub mod file_utils;
pub mod jobs;
pub mod language_utils;
pub mod providers;
pub mod sources;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, SpeedPreset};
pub use errors::{AppError, DownloadError, ProviderError, SubtitleError, TranslationError};
pub use jobs::{JobManager, JobStatus};
pub use language_utils::{get_language_name, language_codes_match, to_subtitle_catalog_code};
pub use subtitle_processor::{SubtitleDocument, SubtitleEntry};
pub use translation::{
    translate_entries, CancellationToken, PipelineOptions, RunStatus, TranslationOutcome,
    TranslationService,
};
