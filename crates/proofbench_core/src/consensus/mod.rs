//! Consensus aggregation across semantic evaluators
//!
//! Every adapter is queried once per claim, concurrently. A failing adapter
//! contributes the floor score instead of an error, so one bad adapter
//! lowers confidence without invalidating the others.

pub mod adapter;
pub mod http;

pub use adapter::{AdapterVerdict, FakeModelAdapter, ModelAdapter};
pub use http::HttpModelAdapter;

use crate::types::{ConsensusResult, ModelResult, Score};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Score substituted for an adapter that failed to answer
pub const SCORE_FLOOR: f64 = 50.0;

/// Queries a fixed, ordered set of adapters and summarizes their scores
#[derive(Clone)]
pub struct ConsensusAggregator {
    adapters: Vec<Arc<dyn ModelAdapter>>,
}

impl ConsensusAggregator {
    pub fn new(adapters: Vec<Arc<dyn ModelAdapter>>) -> Self {
        Self { adapters }
    }

    /// Evaluate one claim with every adapter
    pub async fn evaluate(&self, claim: &str) -> ConsensusResult {
        let mut slots: Vec<ModelResult> = self
            .adapters
            .iter()
            .map(|a| floor_result(a.name(), "query task did not complete"))
            .collect();

        // Dropping the set aborts any query still in flight.
        let mut join_set = JoinSet::new();

        for (index, adapter) in self.adapters.iter().enumerate() {
            let adapter = Arc::clone(adapter);
            let claim = claim.to_string();

            join_set.spawn(async move {
                let outcome = adapter.evaluate(&claim).await;
                (index, to_model_result(adapter.name(), outcome))
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = result,
                Err(e) => warn!("Adapter query task failed: {}", e),
            }
        }

        let consensus = compute_consensus(slots);
        debug!(
            mean = consensus.mean,
            variance = consensus.variance,
            coherence = consensus.coherence,
            "consensus computed"
        );
        consensus
    }
}

fn floor_result(model: &str, message: &str) -> ModelResult {
    ModelResult {
        model: model.to_string(),
        score: Score::clamped(SCORE_FLOOR),
        rationale: Some(format!("Adapter error: {}", message)),
    }
}

fn to_model_result(
    model: &str,
    outcome: Result<AdapterVerdict, crate::error::AdapterError>,
) -> ModelResult {
    match outcome {
        Ok(verdict) if verdict.score.is_finite() => ModelResult {
            model: model.to_string(),
            score: Score::clamped(verdict.score),
            rationale: Some(
                verdict
                    .reasoning
                    .unwrap_or_else(|| format!("Evaluated by {}", model)),
            ),
        },
        Ok(_) => {
            warn!(adapter = model, "adapter returned a non-finite score");
            floor_result(model, "non-finite score")
        }
        Err(e) => {
            warn!(adapter = model, "adapter failed: {}", e);
            floor_result(model, &e.to_string())
        }
    }
}

/// Mean, population variance, and variance-derived coherence
///
/// Coherence uses the unrounded variance; the stored variance is rounded to
/// one decimal.
pub fn compute_consensus(results: Vec<ModelResult>) -> ConsensusResult {
    if results.is_empty() {
        return ConsensusResult::empty();
    }

    let n = results.len() as f64;
    let scores: Vec<f64> = results.iter().map(|r| r.score.value() as f64).collect();
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let coherence = (100.0 - variance).max(0.0).round();

    ConsensusResult {
        results,
        mean: mean.round() as u8,
        variance: (variance * 10.0).round() / 10.0,
        coherence: coherence as u8,
    }
}
