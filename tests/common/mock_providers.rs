/*!
 * Scripted backends for exercising dispatcher retry behavior.
 */

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use lexis::errors::ProviderError;
use lexis::providers::Backend;

/// A backend that fails with connection errors a fixed number of times
/// before succeeding. Used to verify the single-retry policy.
#[derive(Debug)]
pub struct FlakyBackend {
    failures_remaining: AtomicUsize,
    request_count: AtomicUsize,
}

impl FlakyBackend {
    pub fn new(failures: usize) -> Self {
        Self {
            failures_remaining: AtomicUsize::new(failures),
            request_count: AtomicUsize::new(0),
        }
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for FlakyBackend {
    fn name(&self) -> &str {
        "Flaky"
    }

    async fn translate(&self, payload: &str, _model: &str) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ProviderError::ConnectionError(
                "simulated connection reset".to_string(),
            ));
        }
        Ok(format!("ok: {}", payload))
    }
}

/// A backend that records every payload it receives and echoes it back.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    payloads: Mutex<Vec<String>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    fn name(&self) -> &str {
        "Recording"
    }

    async fn translate(&self, payload: &str, _model: &str) -> Result<String, ProviderError> {
        self.payloads.lock().unwrap().push(payload.to_string());
        Ok(payload.to_string())
    }
}
