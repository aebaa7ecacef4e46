//! Hybrid combinator: symbolic + semantic evidence for one step
//!
//! combined = w_sym * (100 if symbolic valid else 0) + w_sem * consensus mean
//! pass     = combined >= threshold AND coherence >= coherence threshold
//!
//! Semantic evaluation always runs, even when the symbolic check failed.

use crate::config::EvaluationConfig;
use crate::lii::LiiEngine;
use crate::semantic::SemanticEvaluator;
use crate::symbolic::SymbolicVerifier;
use crate::types::{HybridStepResult, ProofStep, SymbolicVerificationResult};
use tracing::debug;

/// Weights and gates applied per step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridWeights {
    pub symbolic: f64,
    pub semantic: f64,
    pub pass_threshold: f64,
    pub coherence_threshold: u8,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self::from(&EvaluationConfig::default())
    }
}

impl From<&EvaluationConfig> for HybridWeights {
    fn from(config: &EvaluationConfig) -> Self {
        Self {
            symbolic: config.symbolic_weight,
            semantic: config.semantic_weight,
            pass_threshold: config.pass_threshold,
            coherence_threshold: config.coherence_threshold,
        }
    }
}

impl HybridWeights {
    pub fn combined_score(&self, symbolic_valid: bool, consensus_mean: u8) -> f64 {
        let symbolic_score = if symbolic_valid { 100.0 } else { 0.0 };
        self.symbolic * symbolic_score + self.semantic * consensus_mean as f64
    }

    /// Both gates are required; neither compensates for the other
    pub fn passes(&self, symbolic_valid: bool, consensus_mean: u8, coherence: u8) -> bool {
        self.combined_score(symbolic_valid, consensus_mean) >= self.pass_threshold
            && coherence >= self.coherence_threshold
    }
}

#[derive(Clone)]
pub struct HybridEngine {
    symbolic: SymbolicVerifier,
    semantic: SemanticEvaluator,
    lii: LiiEngine,
    weights: HybridWeights,
}

impl HybridEngine {
    pub fn new(symbolic: SymbolicVerifier, semantic: SemanticEvaluator, weights: HybridWeights) -> Self {
        Self {
            symbolic,
            semantic,
            lii: LiiEngine,
            weights,
        }
    }

    pub async fn verify_step(&self, step: &ProofStep) -> HybridStepResult {
        let domain = step.domain.unwrap_or_default();
        let claim = step.claim.as_deref().unwrap_or("");

        let symbolic = async {
            match &step.equation {
                Some(equation) => self.symbolic.verify(equation, domain).await,
                None => SymbolicVerificationResult::vacuous(),
            }
        };
        let (symbolic, semantic) = tokio::join!(symbolic, self.semantic.evaluate(claim));

        let consensus = semantic.consensus;
        let error_count = if symbolic.valid { 0 } else { 1 };
        let lii = self
            .lii
            .analyze(domain, 1, error_count, consensus.coherence as f64, 0.0);
        let pass = self
            .weights
            .passes(symbolic.valid, consensus.mean, consensus.coherence);

        debug!(
            step = %step.id,
            symbolic_valid = symbolic.valid,
            mean = consensus.mean,
            coherence = consensus.coherence,
            lii = lii.lii,
            pass,
            "step evaluated"
        );

        HybridStepResult {
            step_id: step.id.clone(),
            symbolic,
            consensus,
            lii: lii.lii,
            lci: lii.lci,
            pass,
        }
    }
}
