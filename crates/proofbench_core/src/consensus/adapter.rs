//! Model Adapter Trait Abstraction
//!
//! Every semantic evaluator is reached through `ModelAdapter`:
//! - Production code uses `HttpModelAdapter` (Ollama / OpenAI-compatible)
//! - Test code uses `FakeModelAdapter` with pre-configured scores
//!
//! The aggregator depends only on this trait, never on vendor types.

use crate::error::AdapterError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Model Adapter Trait
// ============================================================================

/// Raw answer from one adapter, before clamping
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterVerdict {
    pub score: f64,
    pub reasoning: Option<String>,
}

impl AdapterVerdict {
    pub fn score(score: f64) -> Self {
        Self {
            score,
            reasoning: None,
        }
    }
}

/// Scoring oracle for a single claim
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Identifier recorded in ModelResult
    fn name(&self) -> &str;

    /// Score the logical soundness of a claim
    async fn evaluate(&self, claim: &str) -> Result<AdapterVerdict, AdapterError>;
}

// ============================================================================
// Fake Model Adapter (Testing)
// ============================================================================

/// Deterministic adapter for tests
///
/// Responses are served in order; the last one repeats once the queue is
/// down to a single entry.
pub struct FakeModelAdapter {
    name: String,
    responses: Mutex<VecDeque<Result<AdapterVerdict, AdapterError>>>,
    delay: Option<Duration>,
    call_count: AtomicUsize,
}

impl FakeModelAdapter {
    pub fn new(name: &str, responses: Vec<Result<AdapterVerdict, AdapterError>>) -> Self {
        Self {
            name: name.to_string(),
            responses: Mutex::new(responses.into()),
            delay: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Always answer with the same score
    pub fn scoring(name: &str, score: f64) -> Self {
        Self::new(name, vec![Ok(AdapterVerdict::score(score))])
    }

    /// Always fail with the given error
    pub fn failing(name: &str, error: AdapterError) -> Self {
        Self::new(name, vec![Err(error)])
    }

    /// Sleep before answering (to exercise out-of-order completion)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> Result<AdapterVerdict, AdapterError> {
        let mut responses = match self.responses.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match responses.len() {
            0 => Err(AdapterError::Malformed("no scripted response".to_string())),
            1 => responses[0].clone(),
            _ => responses
                .pop_front()
                .unwrap_or_else(|| Err(AdapterError::Malformed("no scripted response".to_string()))),
        }
    }
}

#[async_trait]
impl ModelAdapter for FakeModelAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, _claim: &str) -> Result<AdapterVerdict, AdapterError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_repeats_last_response() {
        let adapter = FakeModelAdapter::scoring("fake", 82.0);
        assert_eq!(adapter.evaluate("a").await.unwrap().score, 82.0);
        assert_eq!(adapter.evaluate("b").await.unwrap().score, 82.0);
        assert_eq!(adapter.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fake_serves_queue_in_order() {
        let adapter = FakeModelAdapter::new(
            "fake",
            vec![
                Ok(AdapterVerdict::score(10.0)),
                Err(AdapterError::Timeout(5)),
                Ok(AdapterVerdict::score(90.0)),
            ],
        );
        assert_eq!(adapter.evaluate("x").await.unwrap().score, 10.0);
        assert!(adapter.evaluate("x").await.is_err());
        assert_eq!(adapter.evaluate("x").await.unwrap().score, 90.0);
        assert_eq!(adapter.evaluate("x").await.unwrap().score, 90.0);
    }
}
