/*!
 * Batched subtitle translation.
 *
 * This module contains the core translation machinery, split into
 * several submodules:
 *
 * - `pipeline`: batch partitioning, join/split encoding, alignment
 *   fallback and progress reporting
 * - `cancel`: cooperative cancellation token
 * - `service`: per-run backend construction from configuration
 */

// Re-export main types for easier usage
pub use self::cancel::CancellationToken;
pub use self::pipeline::{
    translate_entries, EntryFailure, PipelineOptions, RunStatus, TranslationOutcome,
    BATCH_SEPARATOR,
};
pub use self::service::TranslationService;

// Submodules
pub mod cancel;
pub mod pipeline;
pub mod service;
