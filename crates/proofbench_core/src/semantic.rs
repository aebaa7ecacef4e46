//! Semantic evaluation: pass/fail policy over a fresh consensus

use crate::config::EvaluationConfig;
use crate::consensus::ConsensusAggregator;
use crate::types::ConsensusResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticEvaluation {
    pub consensus: ConsensusResult,
    pub pass: bool,
}

#[derive(Clone)]
pub struct SemanticEvaluator {
    consensus: ConsensusAggregator,
    mean_threshold: u8,
    coherence_threshold: u8,
}

impl SemanticEvaluator {
    pub fn new(consensus: ConsensusAggregator, config: &EvaluationConfig) -> Self {
        Self {
            consensus,
            mean_threshold: config.semantic_mean_threshold,
            coherence_threshold: config.coherence_threshold,
        }
    }

    /// pass iff mean and coherence both reach their thresholds
    pub fn passes(&self, consensus: &ConsensusResult) -> bool {
        consensus.mean >= self.mean_threshold && consensus.coherence >= self.coherence_threshold
    }

    pub async fn evaluate(&self, claim: &str) -> SemanticEvaluation {
        let consensus = self.consensus.evaluate(claim).await;
        let pass = self.passes(&consensus);
        SemanticEvaluation { consensus, pass }
    }
}
