/*!
 * Mock translation backend for testing.
 *
 * This module provides a mock backend that simulates different behaviors:
 * - `MockTranslator::uppercasing()` - Succeeds, uppercasing the input
 * - `MockTranslator::separator_dropping()` - Merges two segments by eating a separator
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::intermittent(n)` - Fails every nth request
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;
use crate::translation::pipeline::BATCH_SEPARATOR;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, uppercasing every segment
    Uppercasing,
    /// Succeeds but drops the first separator, merging two segments
    SeparatorDropping,
    /// Always fails with an error
    Failing,
    /// Rejects joined batch calls but translates single segments,
    /// forcing the per-entry fallback to do the work
    BatchRejecting,
    /// Fails intermittently (every nth request)
    Intermittent { fail_every: usize },
    /// Simulates slow responses (for cancellation/timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock backend for testing pipeline behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every text received, shared between clones
    received: Arc<Mutex<Vec<String>>>,
}

impl MockTranslator {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that uppercases every segment
    pub fn uppercasing() -> Self {
        Self::new(MockBehavior::Uppercasing)
    }

    /// Create a mock that merges two segments by dropping a separator
    pub fn separator_dropping() -> Self {
        Self::new(MockBehavior::SeparatorDropping)
    }

    /// Create a mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that errors on joined batches but translates
    /// individual segments
    pub fn batch_rejecting() -> Self {
        Self::new(MockBehavior::BatchRejecting)
    }

    /// Create a mock that fails every nth request
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that sleeps before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Every text this mock has been asked to translate
    pub fn received_texts(&self) -> Vec<String> {
        self.received.lock().clone()
    }

    fn uppercase(text: &str) -> String {
        text.split(BATCH_SEPARATOR)
            .map(|segment| segment.to_uppercase())
            .collect::<Vec<String>>()
            .join(BATCH_SEPARATOR)
    }
}

impl Clone for MockTranslator {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            received: Arc::clone(&self.received),
        }
    }
}

#[async_trait]
impl TranslationBackend for MockTranslator {
    async fn translate_batch(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(text.to_string());

        match self.behavior {
            MockBehavior::Uppercasing => Ok(Self::uppercase(text)),

            MockBehavior::SeparatorDropping => {
                // Merge the first two segments, the way a real machine
                // translator sometimes eats sentinel tokens
                Ok(Self::uppercase(&text.replacen(BATCH_SEPARATOR, " ", 1)))
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated backend failure".to_string(),
            }),

            MockBehavior::BatchRejecting => {
                if text.contains(BATCH_SEPARATOR) {
                    Err(ProviderError::ApiError {
                        status_code: 502,
                        message: "Simulated batch rejection".to_string(),
                    })
                } else {
                    Ok(Self::uppercase(text))
                }
            }

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                    })
                } else {
                    Ok(Self::uppercase(text))
                }
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(format!("[{}] {}", target_language, text))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}
