/*!
 * Cooperative cancellation for translation runs.
 *
 * A token is shared between the caller (GUI thread, web job, ctrl-c
 * handler) and the pipeline. Cancellation never pre-empts an in-flight
 * backend call; the pipeline checks the token at batch boundaries and
 * while sleeping between batches.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shared cancellation flag with an async wakeup.
///
/// Clones observe the same flag; each run owns its own token, so
/// concurrent runs never interfere.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake every waiter.
    /// Idempotent; there is no way back from cancelled.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once cancellation is requested.
    /// Usable inside `tokio::select!` to make sleeps interruptible.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }

        loop {
            let notified = self.inner.notify.notified();
            // Re-check after arming the waiter so a cancel between the
            // flag check and the await is not lost
            if self.is_cancelled() {
                return;
            }
            notified.await;
            if self.is_cancelled() {
                return;
            }
        }
    }
}
