/*!
 * Translation run tracking.
 *
 * Each run is a job: `Pending -> Running -> {Completed | Cancelled |
 * Failed}`. Terminal states are final; attempted transitions out of them
 * are rejected, not silently applied. Every job owns its entries and its
 * cancellation token, so concurrent jobs never share mutable state.
 */

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::translation::{CancellationToken, RunStatus};

/// Lifecycle state of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Created, not started
    Pending,
    /// Run in progress; re-entered once per batch via progress updates
    Running,
    /// Run finished over every batch
    Completed,
    /// Run stopped at a batch boundary on request; partial result exists
    Cancelled,
    /// Run could not proceed; error payload attached
    Failed,
}

impl JobStatus {
    /// Whether this state admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Point-in-time view of a job for listings
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    /// Job id
    pub id: Uuid,
    /// Current state
    pub status: JobStatus,
    /// Entries done so far
    pub completed: usize,
    /// Entries in total
    pub total: usize,
    /// Last progress message
    pub message: String,
    /// Error payload for failed jobs
    pub error: Option<String>,
    /// Creation time
    pub created_at: DateTime<Local>,
}

#[derive(Debug)]
struct JobState {
    status: JobStatus,
    completed: usize,
    total: usize,
    message: String,
    error: Option<String>,
}

/// Shared handle to one job's state
#[derive(Debug, Clone)]
pub struct JobHandle {
    id: Uuid,
    created_at: DateTime<Local>,
    state: Arc<RwLock<JobState>>,
    cancel: CancellationToken,
}

impl JobHandle {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Local::now(),
            state: Arc::new(RwLock::new(JobState {
                status: JobStatus::Pending,
                completed: 0,
                total: 0,
                message: "Created".to_string(),
                error: None,
            })),
            cancel: CancellationToken::new(),
        }
    }

    /// Job id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The job's cancellation token, for handing to the pipeline
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current state
    pub fn status(&self) -> JobStatus {
        self.state.read().status
    }

    /// Request cooperative cancellation. The job transitions to
    /// `Cancelled` only once the run acknowledges at a batch boundary.
    pub fn request_cancel(&self) {
        self.cancel.cancel();
    }

    /// Move `Pending -> Running`. Returns false from any other state.
    pub fn start(&self) -> bool {
        let mut state = self.state.write();
        if state.status != JobStatus::Pending {
            return false;
        }
        state.status = JobStatus::Running;
        state.message = "Translating...".to_string();
        true
    }

    /// Record batch progress while running
    pub fn set_progress(&self, completed: usize, total: usize) {
        let mut state = self.state.write();
        if state.status != JobStatus::Running {
            return;
        }
        state.completed = completed;
        state.total = total;
        state.message = format!("Translated {}/{} entries", completed, total);
    }

    /// Finish the job with the run's terminal status
    pub fn finish(&self, run_status: RunStatus) -> bool {
        let target = match run_status {
            RunStatus::Completed => JobStatus::Completed,
            RunStatus::Cancelled => JobStatus::Cancelled,
        };
        self.transition_terminal(target, None)
    }

    /// Fail the job with an error payload
    pub fn fail(&self, error: impl Into<String>) -> bool {
        let error = error.into();
        self.transition_terminal(JobStatus::Failed, Some(error))
    }

    fn transition_terminal(&self, target: JobStatus, error: Option<String>) -> bool {
        let mut state = self.state.write();
        if state.status.is_terminal() {
            return false;
        }
        state.status = target;
        state.message = match target {
            JobStatus::Completed => "Translation completed".to_string(),
            JobStatus::Cancelled => "Translation cancelled".to_string(),
            JobStatus::Failed => "Translation failed".to_string(),
            _ => state.message.clone(),
        };
        state.error = error;
        true
    }

    /// Point-in-time copy of the job state
    pub fn snapshot(&self) -> JobSnapshot {
        let state = self.state.read();
        JobSnapshot {
            id: self.id,
            status: state.status,
            completed: state.completed,
            total: state.total,
            message: state.message.clone(),
            error: state.error.clone(),
            created_at: self.created_at,
        }
    }
}

/// Registry of jobs. Many jobs may run concurrently; the registry only
/// hands out handles and never holds a lock across an await point.
#[derive(Debug, Default)]
pub struct JobManager {
    jobs: RwLock<HashMap<Uuid, JobHandle>>,
}

impl JobManager {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a new pending job
    pub fn create_job(&self) -> JobHandle {
        let handle = JobHandle::new();
        self.jobs.write().insert(handle.id(), handle.clone());
        handle
    }

    /// Look up a job by id
    pub fn get(&self, id: Uuid) -> Option<JobHandle> {
        self.jobs.read().get(&id).cloned()
    }

    /// Request cancellation of a job; false when the id is unknown
    pub fn cancel(&self, id: Uuid) -> bool {
        match self.get(id) {
            Some(handle) => {
                handle.request_cancel();
                true
            }
            None => false,
        }
    }

    /// Request cancellation of every non-terminal job
    pub fn cancel_all(&self) {
        for handle in self.jobs.read().values() {
            if !handle.status().is_terminal() {
                handle.request_cancel();
            }
        }
    }

    /// Snapshots of every known job, newest first
    pub fn list(&self) -> Vec<JobSnapshot> {
        let mut snapshots: Vec<JobSnapshot> =
            self.jobs.read().values().map(|h| h.snapshot()).collect();
        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        snapshots
    }
}
