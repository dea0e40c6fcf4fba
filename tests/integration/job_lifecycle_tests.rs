/*!
 * Job lifecycle tests against the running pipeline
 */

use std::time::Duration;

use subtran::jobs::{JobManager, JobStatus};
use subtran::providers::mock::MockTranslator;
use subtran::translation::{translate_entries, PipelineOptions, RunStatus};

use crate::common;

/// A job driven by the pipeline walks Pending -> Running -> Completed
/// and mirrors the pipeline's progress
#[tokio::test]
async fn test_job_withCompletedRun_shouldReachCompleted() {
    let manager = JobManager::new();
    let job = manager.create_job();
    assert_eq!(job.status(), JobStatus::Pending);

    let entries = common::make_entries(7);
    let backend = MockTranslator::uppercasing();

    job.start();
    assert_eq!(job.status(), JobStatus::Running);

    let progress_job = job.clone();
    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        PipelineOptions::new(3, Duration::ZERO),
        &job.cancellation_token(),
        move |done, total| progress_job.set_progress(done, total),
    )
    .await;

    job.finish(outcome.status);

    let snapshot = job.snapshot();
    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.completed, 7);
    assert_eq!(snapshot.total, 7);
}

/// Requesting cancellation through the registry stops the run at the
/// next batch boundary and the job ends Cancelled
#[tokio::test]
async fn test_job_withCancelThroughManager_shouldEndCancelled() {
    let manager = JobManager::new();
    let job = manager.create_job();
    let job_id = job.id();

    let entries = common::make_entries(6);
    let backend = MockTranslator::uppercasing();

    job.start();

    // Cancel via the registry as an outside caller would
    let canceller_manager = manager.list();
    assert_eq!(canceller_manager.len(), 1);
    assert!(manager.cancel(job_id));

    let outcome = translate_entries(
        &entries,
        &backend,
        "en",
        "tr",
        PipelineOptions::new(2, Duration::ZERO),
        &job.cancellation_token(),
        |_, _| {},
    )
    .await;

    assert_eq!(outcome.status, RunStatus::Cancelled);
    job.finish(outcome.status);
    assert_eq!(job.status(), JobStatus::Cancelled);

    // The partial result still covers every entry
    assert_eq!(outcome.entries.len(), 6);
}

/// Concurrent jobs own their tokens and never interfere
#[tokio::test]
async fn test_jobs_runningConcurrently_shouldStayIndependent() {
    let manager = JobManager::new();

    let cancelled_job = manager.create_job();
    let free_job = manager.create_job();

    cancelled_job.start();
    free_job.start();
    cancelled_job.request_cancel();

    let entries = common::make_entries(4);
    let backend_a = MockTranslator::uppercasing();
    let backend_b = MockTranslator::uppercasing();

    let entries_a = entries.clone();
    let token_a = cancelled_job.cancellation_token();
    let run_a = async move {
        translate_entries(
            &entries_a,
            &backend_a,
            "en",
            "tr",
            PipelineOptions::new(2, Duration::ZERO),
            &token_a,
            |_, _| {},
        )
        .await
    };

    let entries_b = entries.clone();
    let token_b = free_job.cancellation_token();
    let run_b = async move {
        translate_entries(
            &entries_b,
            &backend_b,
            "en",
            "es",
            PipelineOptions::new(2, Duration::ZERO),
            &token_b,
            |_, _| {},
        )
        .await
    };

    let (outcome_a, outcome_b) = tokio::join!(run_a, run_b);

    assert_eq!(outcome_a.status, RunStatus::Cancelled);
    assert_eq!(outcome_b.status, RunStatus::Completed);

    cancelled_job.finish(outcome_a.status);
    free_job.finish(outcome_b.status);

    assert_eq!(cancelled_job.status(), JobStatus::Cancelled);
    assert_eq!(free_job.status(), JobStatus::Completed);
}

/// A failed backend construction maps to a Failed job with its error
#[tokio::test]
async fn test_job_withUnavailableBackend_shouldEndFailed() {
    use subtran::app_config::TranslationConfig;
    use subtran::translation::TranslationService;

    let manager = JobManager::new();
    let job = manager.create_job();
    job.start();

    let mut config = TranslationConfig::default();
    config.endpoint = "not a url".to_string();

    match TranslationService::new(&config) {
        Ok(_) => panic!("expected backend construction to fail"),
        Err(e) => {
            job.fail(e.to_string());
        }
    }

    let snapshot = job.snapshot();
    assert_eq!(snapshot.status, JobStatus::Failed);
    assert!(snapshot.error.unwrap().contains("unavailable"));
}
