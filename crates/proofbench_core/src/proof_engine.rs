//! Proof orchestration
//!
//! Flow:
//! 1. Justification graph from step ids and dependencies
//! 2. Hybrid evaluation of every step (concurrent, bounded)
//! 3. One feedback message per step, in input order
//! 4. Proof-level LII from failed-step count and mean coherence
//! 5. Summary feedback; proof is valid iff LII >= 80
//!
//! Dropping the returned future aborts every in-flight step.

use crate::config::ProofBenchConfig;
use crate::consensus::{ConsensusAggregator, ModelAdapter};
use crate::error_codes::ErrorCode;
use crate::feedback::{FeedbackGenerator, FeedbackMessage};
use crate::hybrid::{HybridEngine, HybridWeights};
use crate::justification::{analyze_justifications, JustificationGraph, JustificationNode};
use crate::lii::LiiEngine;
use crate::semantic::SemanticEvaluator;
use crate::symbolic::{SymbolicSandbox, SymbolicVerifier};
use crate::types::{
    ConsensusResult, HybridStepResult, ProofEvaluationResult, ProofInput, ProofStep, StepId,
    SymbolicVerificationResult,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Minimum proof-level LII for the proof to count as valid
pub const PROOF_VALID_LII: u8 = 80;

pub struct ProofEngine {
    hybrid: Arc<HybridEngine>,
    lii: LiiEngine,
    feedback: FeedbackGenerator,
    max_concurrent_steps: usize,
}

impl ProofEngine {
    pub fn new(hybrid: HybridEngine, max_concurrent_steps: usize) -> Self {
        Self {
            hybrid: Arc::new(hybrid),
            lii: LiiEngine,
            feedback: FeedbackGenerator,
            max_concurrent_steps: max_concurrent_steps.max(1),
        }
    }

    /// Wire the whole pipeline from configuration and injected boundaries
    pub fn from_config(
        config: &ProofBenchConfig,
        adapters: Vec<Arc<dyn ModelAdapter>>,
        sandbox: Arc<dyn SymbolicSandbox>,
    ) -> Self {
        let semantic = SemanticEvaluator::new(ConsensusAggregator::new(adapters), &config.evaluation);
        let hybrid = HybridEngine::new(
            SymbolicVerifier::new(sandbox),
            semantic,
            HybridWeights::from(&config.evaluation),
        );
        Self::new(hybrid, config.evaluation.max_concurrent_steps)
    }

    pub async fn evaluate(&self, proof: &ProofInput) -> ProofEvaluationResult {
        let justification = build_justification_graph(&proof.steps);
        if justification.has_cycle {
            warn!("Justification graph contains a cycle; depth {} is a lower bound", justification.depth);
        }

        let results = self.evaluate_steps(&proof.steps).await;

        let feedback_steps: Vec<FeedbackMessage> = results
            .iter()
            .map(|r| {
                self.feedback
                    .generate(&r.step_id, r.symbolic.valid, r.consensus.coherence, &[])
            })
            .collect();

        let total_steps = results.len();
        let valid_steps = results.iter().filter(|r| r.pass).count();
        let error_count = total_steps - valid_steps;

        let aggregate_coherence = if total_steps > 0 {
            results
                .iter()
                .map(|r| r.consensus.coherence as f64)
                .sum::<f64>()
                / total_steps as f64
        } else {
            0.0
        };

        let lii = self.lii.analyze(
            proof.domain,
            total_steps,
            error_count,
            aggregate_coherence,
            0.0,
        );

        let mut feedback = feedback_steps;
        feedback.push(self.feedback.generate_summary(valid_steps, total_steps, lii.lii));

        info!(
            "Proof evaluated: {}/{} steps passed, LII {} [{}, {}]",
            valid_steps, total_steps, lii.lii, lii.lci.0, lii.lci.1
        );

        ProofEvaluationResult {
            valid: lii.lii >= PROOF_VALID_LII,
            lii: lii.lii,
            lci: lii.lci,
            coherence: aggregate_coherence.round() as u8,
            steps: results,
            feedback,
            justification,
        }
    }

    async fn evaluate_steps(&self, steps: &[ProofStep]) -> Vec<HybridStepResult> {
        let permits = Arc::new(Semaphore::new(self.max_concurrent_steps));
        let mut join_set = JoinSet::new();

        for (index, step) in steps.iter().enumerate() {
            let hybrid = Arc::clone(&self.hybrid);
            let permits = Arc::clone(&permits);
            let step = step.clone();

            join_set.spawn(async move {
                // never closed
                let _permit = permits.acquire_owned().await.ok();
                (index, hybrid.verify_step(&step).await)
            });
        }

        let mut slots: Vec<Option<HybridStepResult>> = vec![None; steps.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Step evaluation task failed: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(steps)
            .map(|(slot, step)| slot.unwrap_or_else(|| self.aborted_step(step)))
            .collect()
    }

    /// Failed result for a step whose evaluation task died
    fn aborted_step(&self, step: &ProofStep) -> HybridStepResult {
        let lii = self
            .lii
            .analyze(step.domain.unwrap_or_default(), 1, 1, 0.0, 0.0);
        HybridStepResult {
            step_id: step.id.clone(),
            symbolic: SymbolicVerificationResult {
                valid: false,
                code: Some(ErrorCode::RuntimeError),
                difference: None,
                diagnostics: Some("step evaluation aborted".to_string()),
            },
            consensus: ConsensusResult::empty(),
            lii: lii.lii,
            lci: lii.lci,
            pass: false,
        }
    }
}

/// Justification nodes from step ids and their declared dependencies
pub fn build_justification_graph(steps: &[ProofStep]) -> JustificationGraph {
    let nodes = steps
        .iter()
        .map(|step| JustificationNode {
            id: step.id.graph_key(),
            dependencies: step.dependencies.iter().map(StepId::graph_key).collect(),
        })
        .collect();
    analyze_justifications(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::FakeModelAdapter;
    use crate::symbolic::FakeSandbox;

    #[test]
    fn test_justification_graph_from_steps() {
        let steps = vec![
            ProofStep::new(1),
            ProofStep::new(2).depends_on(1),
            ProofStep::new(3).depends_on(2).depends_on("lemma"),
        ];
        let graph = build_justification_graph(&steps);
        assert!(!graph.has_cycle);
        assert_eq!(graph.depth, 3);
        assert_eq!(graph.nodes[2].dependencies, vec!["2", "lemma"]);
    }

    #[test]
    fn test_number_and_text_ids_stay_distinct_in_graph() {
        // step 1 depends on the step named "1", not on itself
        let steps = vec![ProofStep::new(1).depends_on("1"), ProofStep::new("1")];
        let graph = build_justification_graph(&steps);

        assert!(!graph.has_cycle);
        assert_eq!(graph.depth, 2);
        assert_ne!(graph.nodes[0].id, graph.nodes[1].id);
        assert_eq!(graph.nodes[0].dependencies, vec![graph.nodes[1].id.clone()]);

        let looped = build_justification_graph(&[ProofStep::new(1).depends_on(1)]);
        assert!(looped.has_cycle);
    }

    #[tokio::test]
    async fn test_zero_step_proof() {
        let engine = ProofEngine::from_config(
            &ProofBenchConfig::default(),
            vec![Arc::new(FakeModelAdapter::scoring("m", 90.0))],
            Arc::new(FakeSandbox::returning("0")),
        );
        let result = engine.evaluate(&ProofInput::default()).await;

        assert_eq!(result.coherence, 0);
        assert!(result.steps.is_empty());
        assert_eq!(result.feedback.len(), 1);
        assert_eq!(result.feedback[0].step_id, StepId::summary());
        assert!(result.feedback[0].summary.contains("0/0"));
        assert_eq!(result.justification.depth, 0);
        // no failed steps and no drift: LII is full, but coherence 0 widens the interval
        assert_eq!(result.lii, 100);
        assert_eq!(result.lci, (80, 100));
        assert!(result.valid);
    }
}
