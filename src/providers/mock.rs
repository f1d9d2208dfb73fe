/*!
 * Mock backend implementations for testing.
 *
 * This module provides mock backends that simulate different behaviors:
 * - `MockBackend::working()` - Always succeeds with translated text
 * - `MockBackend::empty()` - Returns blank output
 * - `MockBackend::empty_at(n)` - Blank output for the nth request only
 * - `MockBackend::failing()` - Always fails with an API error
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Backend;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a marked-up translation
    Working,
    /// Always returns whitespace-only output
    Empty,
    /// Returns blank output for the nth request (0-based), succeeds otherwise
    EmptyAt(usize),
    /// Fails intermittently (every nth request)
    Intermittent {
        /// Fail every this many requests
        fail_every: usize,
    },
    /// Always fails with an API error
    Failing,
    /// Simulates a slow response (for timeout testing)
    Slow {
        /// Delay before responding
        delay_ms: u64,
    },
}

/// Mock backend for testing dispatch behavior
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared across clones
    request_count: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock backend that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that returns whitespace-only output
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that returns blank output for one specific request
    pub fn empty_at(index: usize) -> Self {
        Self::new(MockBehavior::EmptyAt(index))
    }

    /// Create an intermittently failing mock backend
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock backend that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Number of requests dispatched so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn translate(&self, payload: &str, model: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(format!("[{}] {}", model, payload)),

            MockBehavior::Empty => Ok("   \n".to_string()),

            MockBehavior::EmptyAt(index) => {
                if count == index {
                    Ok(String::new())
                } else {
                    Ok(format!("[{}] {}", model, payload))
                }
            }

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                    })
                } else {
                    Ok(format!("[{}] {}", model, payload))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(format!("[{}] {}", model, payload))
            }
        }
    }
}
