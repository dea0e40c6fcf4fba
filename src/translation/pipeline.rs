/*!
 * Batch translation pipeline.
 *
 * Partitions subtitle entries into positional batches, sends each batch
 * to the backend as one joined text, and reassembles the results in
 * original order. The join is reversible only while the backend preserves
 * the separator token; when it does not, the batch falls back to one call
 * per entry. Misalignment between an entry and its translation is the one
 * failure this pipeline is built to never let through.
 */

use log::{debug, warn};
use std::time::Duration;

use crate::app_config::SpeedPreset;
use crate::providers::TranslationBackend;
use crate::subtitle_processor::SubtitleEntry;
use crate::translation::cancel::CancellationToken;

/// Sentinel joined between entry texts in a batch call. Unlikely to occur
/// in natural subtitle text; the count check below catches it when it does.
pub const BATCH_SEPARATOR: &str = " |SUBTITLE_SEPARATOR| ";

/// Throughput knobs for one run
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Maximum entries per batch; the last batch may be smaller
    pub batch_size: usize,

    /// Pause between batches
    pub batch_delay: Duration,
}

impl PipelineOptions {
    /// Create options; a zero batch size is clamped to one
    pub fn new(batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }
}

impl From<SpeedPreset> for PipelineOptions {
    fn from(preset: SpeedPreset) -> Self {
        Self::new(preset.batch_size(), preset.batch_delay())
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every batch was processed
    Completed,
    /// Cancellation was requested; the output carries the translated
    /// prefix and the untranslated remainder
    Cancelled,
}

/// One entry that could not be translated. The entry keeps its original
/// text in the output; the run continues.
#[derive(Debug, Clone)]
pub struct EntryFailure {
    /// Position of the entry in the input sequence
    pub position: usize,
    /// The entry's index token
    pub index: String,
    /// What went wrong
    pub message: String,
}

/// Result of a run. Output length always equals input length.
#[derive(Debug)]
pub struct TranslationOutcome {
    /// Entries in input order, translated where possible
    pub entries: Vec<SubtitleEntry>,
    /// Whether the run completed or was cancelled
    pub status: RunStatus,
    /// Per-entry failures, empty on a clean run
    pub failures: Vec<EntryFailure>,
}

impl TranslationOutcome {
    /// Whether the run was cut short by cancellation
    pub fn is_cancelled(&self) -> bool {
        self.status == RunStatus::Cancelled
    }
}

/// Translate the text of every entry, preserving index and timing.
///
/// Batches are processed sequentially: the backend is the rate-limited
/// resource and ordered batches keep progress reporting deterministic.
/// The progress callback receives `(completed_entries, total_entries)`
/// after each batch. Cancellation is honored at batch boundaries and
/// during the inter-batch delay; an in-flight backend call is allowed to
/// finish and its batch is still applied.
pub async fn translate_entries<F>(
    entries: &[SubtitleEntry],
    backend: &dyn TranslationBackend,
    source_language: &str,
    target_language: &str,
    options: PipelineOptions,
    cancel: &CancellationToken,
    mut progress: F,
) -> TranslationOutcome
where
    F: FnMut(usize, usize),
{
    let total = entries.len();
    let mut output: Vec<SubtitleEntry> = Vec::with_capacity(total);
    let mut failures: Vec<EntryFailure> = Vec::new();

    if total == 0 {
        return TranslationOutcome {
            entries: output,
            status: RunStatus::Completed,
            failures,
        };
    }

    let batch_count = total.div_ceil(options.batch_size);
    debug!(
        "Translating {} entries in {} batch(es) of up to {} via {}",
        total,
        batch_count,
        options.batch_size,
        backend.name()
    );

    for (batch_idx, batch) in entries.chunks(options.batch_size).enumerate() {
        let batch_start = batch_idx * options.batch_size;

        let (translated, mut batch_failures) =
            translate_one_batch(batch, batch_start, backend, source_language, target_language)
                .await;

        output.extend(translated);
        failures.append(&mut batch_failures);
        progress(output.len(), total);

        if cancel.is_cancelled() {
            return cancelled_outcome(entries, output, failures);
        }

        let is_last = batch_idx + 1 == batch_count;
        if !is_last && !options.batch_delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(options.batch_delay) => {}
                _ = cancel.cancelled() => {
                    return cancelled_outcome(entries, output, failures);
                }
            }
        }
    }

    TranslationOutcome {
        entries: output,
        status: RunStatus::Completed,
        failures,
    }
}

/// Pad the translated prefix with the untranslated remainder and tag the
/// result as cancelled
fn cancelled_outcome(
    entries: &[SubtitleEntry],
    mut output: Vec<SubtitleEntry>,
    failures: Vec<EntryFailure>,
) -> TranslationOutcome {
    warn!(
        "Translation cancelled after {} of {} entries",
        output.len(),
        entries.len()
    );
    output.extend(entries[output.len()..].iter().cloned());

    TranslationOutcome {
        entries: output,
        status: RunStatus::Cancelled,
        failures,
    }
}

/// Translate one batch. Blank entries are never sent to the backend and
/// come back verbatim at their original positions.
async fn translate_one_batch(
    batch: &[SubtitleEntry],
    batch_start: usize,
    backend: &dyn TranslationBackend,
    source_language: &str,
    target_language: &str,
) -> (Vec<SubtitleEntry>, Vec<EntryFailure>) {
    // Positions within the batch that carry translatable text
    let translatable: Vec<usize> = batch
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.has_text())
        .map(|(pos, _)| pos)
        .collect();

    if translatable.is_empty() {
        return (batch.to_vec(), Vec::new());
    }

    let joined = translatable
        .iter()
        .map(|&pos| batch[pos].text.as_str())
        .collect::<Vec<&str>>()
        .join(BATCH_SEPARATOR);

    match backend
        .translate_batch(&joined, source_language, target_language)
        .await
    {
        Ok(combined) => {
            let parts: Vec<&str> = combined.split(BATCH_SEPARATOR).collect();

            if parts.len() == translatable.len() {
                let mut out = batch.to_vec();
                for (&pos, part) in translatable.iter().zip(parts.iter()) {
                    out[pos] = batch[pos].with_text(part.trim());
                }
                return (out, Vec::new());
            }

            // The backend merged or dropped separators. Applying the
            // parts anyway would misalign entry and translation, so the
            // whole batch is redone one entry at a time.
            warn!(
                "Batch returned {} segment(s) for {} input(s), retrying entries individually",
                parts.len(),
                translatable.len()
            );
        }
        Err(e) => {
            warn!(
                "Batch translation call failed ({}), retrying entries individually",
                e
            );
        }
    }

    translate_individually(
        batch,
        batch_start,
        &translatable,
        backend,
        source_language,
        target_language,
    )
    .await
}

/// Fallback path: one backend call per entry. An entry whose call fails
/// keeps its original text and is recorded as a failure.
async fn translate_individually(
    batch: &[SubtitleEntry],
    batch_start: usize,
    translatable: &[usize],
    backend: &dyn TranslationBackend,
    source_language: &str,
    target_language: &str,
) -> (Vec<SubtitleEntry>, Vec<EntryFailure>) {
    let mut out = batch.to_vec();
    let mut failures = Vec::new();

    for &pos in translatable {
        match backend
            .translate_batch(&batch[pos].text, source_language, target_language)
            .await
        {
            Ok(translated) => {
                out[pos] = batch[pos].with_text(translated.trim());
            }
            Err(e) => {
                warn!(
                    "Entry {} failed to translate, keeping original text: {}",
                    batch[pos].index, e
                );
                failures.push(EntryFailure {
                    position: batch_start + pos,
                    index: batch[pos].index.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    (out, failures)
}
