/*!
 * Tests for the batch translation pipeline
 */

use std::sync::{Arc, Mutex};
use std::time::Duration;

use subtran::providers::mock::MockTranslator;
use subtran::subtitle_processor::SubtitleEntry;
use subtran::translation::{
    translate_entries, CancellationToken, PipelineOptions, RunStatus, BATCH_SEPARATOR,
};

use crate::common::make_entries;

fn options(batch_size: usize, delay_ms: u64) -> PipelineOptions {
    PipelineOptions::new(batch_size, Duration::from_millis(delay_ms))
}

/// The concrete scenario: 7 entries, batch size 3, zero delay, an
/// identity-but-uppercasing translator. Batches [0..3), [3..6), [6..7);
/// progress exactly (3,7), (6,7), (7,7); text uppercased, index and
/// timing unchanged.
#[tokio::test]
async fn test_translate_withSevenEntriesBatchThree_shouldUppercaseAndReportProgress() {
    let entries = make_entries(7);
    let backend = MockTranslator::uppercasing();
    let cancel = CancellationToken::new();
    let progress_calls = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&progress_calls);

    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        options(3, 0),
        &cancel,
        move |done, total| recorder.lock().unwrap().push((done, total)),
    )
    .await;

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.entries.len(), 7);
    assert!(outcome.failures.is_empty());

    for (i, entry) in outcome.entries.iter().enumerate() {
        assert_eq!(entry.text, format!("LINE {}", i));
        assert_eq!(entry.index, entries[i].index);
        assert_eq!(entry.time_range, entries[i].time_range);
    }

    assert_eq!(*progress_calls.lock().unwrap(), vec![(3, 7), (6, 7), (7, 7)]);

    // 3 batches, one call each
    assert_eq!(backend.call_count(), 3);
}

/// Order preservation holds for every batch size from 1 to len
#[tokio::test]
async fn test_translate_withAllBatchSizes_shouldPreserveOrder() {
    let entries = make_entries(6);

    for batch_size in 1..=entries.len() {
        let backend = MockTranslator::uppercasing();
        let cancel = CancellationToken::new();

        let outcome = translate_entries(
            &entries,
            &backend,
            "en",
            "tr",
            options(batch_size, 0),
            &cancel,
            |_, _| {},
        )
        .await;

        assert_eq!(outcome.entries.len(), entries.len());
        for (i, entry) in outcome.entries.iter().enumerate() {
            assert_eq!(entry.index, entries[i].index, "batch_size={}", batch_size);
            assert_eq!(entry.text, format!("LINE {}", i), "batch_size={}", batch_size);
        }
    }
}

/// A backend that merges segments trips the alignment check; the batch is
/// redone entry by entry and still yields one output per input
#[tokio::test]
async fn test_translate_withSeparatorDroppingBackend_shouldFallBackPerEntry() {
    let entries = make_entries(4);
    let backend = MockTranslator::separator_dropping();
    let cancel = CancellationToken::new();

    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        options(4, 0),
        &cancel,
        |_, _| {},
    )
    .await;

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.entries.len(), 4);
    assert!(outcome.failures.is_empty());

    // Single-entry fallback calls carry no separator, so each one
    // translates cleanly
    for (i, entry) in outcome.entries.iter().enumerate() {
        assert_eq!(entry.text, format!("LINE {}", i));
    }

    // 1 rejected batch call + 4 individual calls
    assert_eq!(backend.call_count(), 5);
}

/// A failing batch call degrades to per-entry translation for that batch
#[tokio::test]
async fn test_translate_withBatchRejectingBackend_shouldStillTranslateEverything() {
    let entries = make_entries(5);
    let backend = MockTranslator::batch_rejecting();
    let cancel = CancellationToken::new();

    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        options(5, 0),
        &cancel,
        |_, _| {},
    )
    .await;

    assert_eq!(outcome.status, RunStatus::Completed);
    assert!(outcome.failures.is_empty());
    for (i, entry) in outcome.entries.iter().enumerate() {
        assert_eq!(entry.text, format!("LINE {}", i));
    }
}

/// When even individual calls fail, originals are kept, failures are
/// recorded, and the run still completes
#[tokio::test]
async fn test_translate_withFailingBackend_shouldKeepOriginalsAndRecordFailures() {
    let entries = make_entries(4);
    let backend = MockTranslator::failing();
    let cancel = CancellationToken::new();

    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        options(2, 0),
        &cancel,
        |_, _| {},
    )
    .await;

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.entries.len(), 4);
    assert_eq!(outcome.failures.len(), 4);

    for (i, entry) in outcome.entries.iter().enumerate() {
        assert_eq!(entry.text, format!("line {}", i));
    }

    assert_eq!(outcome.failures[0].position, 0);
    assert_eq!(outcome.failures[3].position, 3);
    assert_eq!(outcome.failures[3].index, "4");
}

/// Blank entries are never sent to the translator and pass through
/// verbatim at their original positions
#[tokio::test]
async fn test_translate_withBlankEntries_shouldPassThroughUntouched() {
    let mut entries = make_entries(5);
    entries[1] = entries[1].with_text("");
    entries[3] = entries[3].with_text("   ");

    let backend = MockTranslator::uppercasing();
    let cancel = CancellationToken::new();

    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        options(5, 0),
        &cancel,
        |_, _| {},
    )
    .await;

    assert_eq!(outcome.entries.len(), 5);
    assert_eq!(outcome.entries[0].text, "LINE 0");
    assert_eq!(outcome.entries[1].text, "");
    assert_eq!(outcome.entries[2].text, "LINE 2");
    assert_eq!(outcome.entries[3].text, "   ");
    assert_eq!(outcome.entries[4].text, "LINE 4");

    // The joined call carried only the three non-blank texts
    for received in backend.received_texts() {
        assert!(!received.trim().is_empty());
        assert!(!received.contains("line 1"));
    }
}

/// An all-blank batch makes no backend call at all
#[tokio::test]
async fn test_translate_withAllBlankBatch_shouldMakeNoCalls() {
    let entries: Vec<SubtitleEntry> = make_entries(3)
        .into_iter()
        .map(|e| e.with_text(""))
        .collect();

    let backend = MockTranslator::uppercasing();
    let cancel = CancellationToken::new();

    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        options(3, 0),
        &cancel,
        |_, _| {},
    )
    .await;

    assert_eq!(outcome.entries.len(), 3);
    assert_eq!(backend.call_count(), 0);
}

/// Cancelling after batch k yields Cancelled with exactly k batches
/// translated and the remainder unchanged
#[tokio::test]
async fn test_translate_withCancellationAfterFirstBatch_shouldReturnPartialResult() {
    let entries = make_entries(7);
    let backend = MockTranslator::uppercasing();
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();

    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        options(3, 0),
        &cancel,
        move |done, _total| {
            if done == 3 {
                canceller.cancel();
            }
        },
    )
    .await;

    assert_eq!(outcome.status, RunStatus::Cancelled);
    assert!(outcome.is_cancelled());
    assert_eq!(outcome.entries.len(), 7);

    // First batch translated, the rest untouched
    for (i, entry) in outcome.entries.iter().enumerate() {
        if i < 3 {
            assert_eq!(entry.text, format!("LINE {}", i));
        } else {
            assert_eq!(entry.text, format!("line {}", i));
        }
    }

    assert_eq!(backend.call_count(), 1);
}

/// Cancellation during the inter-batch delay interrupts the sleep instead
/// of blocking until it elapses
#[tokio::test]
async fn test_translate_withCancellationDuringDelay_shouldStopPromptly() {
    let entries = make_entries(6);
    let backend = MockTranslator::uppercasing();
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();

    // Long delay; cancel shortly after the first batch reports progress
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        options(3, 60_000),
        &cancel,
        |_, _| {},
    )
    .await;

    assert_eq!(outcome.status, RunStatus::Cancelled);
    assert_eq!(outcome.entries.len(), 6);
    assert!(started.elapsed() < Duration::from_secs(10));
}

/// Empty input completes immediately with no calls and no progress
#[tokio::test]
async fn test_translate_withNoEntries_shouldCompleteImmediately() {
    let backend = MockTranslator::uppercasing();
    let cancel = CancellationToken::new();
    let mut progress_called = false;

    let outcome = translate_entries(
        &[],
        &backend,
        "en",
        "tr",
        options(3, 0),
        &cancel,
        |_, _| progress_called = true,
    )
    .await;

    assert_eq!(outcome.status, RunStatus::Completed);
    assert!(outcome.entries.is_empty());
    assert!(!progress_called);
    assert_eq!(backend.call_count(), 0);
}

/// The joined batch text uses the sentinel separator between segments
#[tokio::test]
async fn test_translate_shouldJoinBatchWithSeparator() {
    let entries = make_entries(3);
    let backend = MockTranslator::uppercasing();
    let cancel = CancellationToken::new();

    translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        options(3, 0),
        &cancel,
        |_, _| {},
    )
    .await;

    let received = backend.received_texts();
    assert_eq!(received.len(), 1);
    assert_eq!(
        received[0],
        format!(
            "line 0{}line 1{}line 2",
            BATCH_SEPARATOR, BATCH_SEPARATOR
        )
    );
}
