//! Natural-language feedback for proof validation
//!
//! Classification is deterministic: the same (validity, coherence) always
//! yields the same message, and every message embeds its numbers.

use crate::types::StepId;
use serde::{Deserialize, Serialize};

const SUCCESS_COHERENCE: u8 = 80;
const WARNING_COHERENCE: u8 = 70;
const SUMMARY_SUCCESS_LII: u8 = 90;
const SUMMARY_WARNING_RATE: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Warning,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub step_id: StepId,
    pub summary: String,
    pub suggestions: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedbackGenerator;

impl FeedbackGenerator {
    /// Step-level message
    ///
    /// Extra error strings are appended to the suggestions of any
    /// non-success message.
    pub fn generate(
        &self,
        step_id: &StepId,
        symbolic_valid: bool,
        coherence: u8,
        errors: &[String],
    ) -> FeedbackMessage {
        if symbolic_valid && coherence >= SUCCESS_COHERENCE {
            return FeedbackMessage {
                kind: FeedbackKind::Success,
                step_id: step_id.clone(),
                summary: format!(
                    "Step {}: Valid algebraic transformation with high semantic coherence ({})",
                    step_id, coherence
                ),
                suggestions: Vec::new(),
            };
        }

        let (kind, summary, mut suggestions) = if !symbolic_valid {
            (
                FeedbackKind::Error,
                format!(
                    "Step {}: Symbolic verification failed (coherence {})",
                    step_id, coherence
                ),
                owned(&[
                    "Check algebraic manipulation for errors",
                    "Verify variable substitutions",
                    "Ensure proper use of mathematical properties",
                ]),
            )
        } else if coherence < WARNING_COHERENCE {
            (
                FeedbackKind::Warning,
                format!(
                    "Step {}: Low semantic coherence detected ({})",
                    step_id, coherence
                ),
                owned(&[
                    "Add justification for logical leap",
                    "Clarify reasoning steps",
                    "Provide intermediate calculations",
                ]),
            )
        } else {
            (
                FeedbackKind::Info,
                format!(
                    "Step {}: Acceptable but could be improved (coherence {})",
                    step_id, coherence
                ),
                owned(&[
                    "Consider adding more detail",
                    "Strengthen logical connections",
                ]),
            )
        };

        suggestions.extend(errors.iter().cloned());

        FeedbackMessage {
            kind,
            step_id: step_id.clone(),
            summary,
            suggestions,
        }
    }

    /// Proof-level summary message
    pub fn generate_summary(&self, valid_steps: usize, total_steps: usize, lii: u8) -> FeedbackMessage {
        let pass_rate = if total_steps > 0 {
            valid_steps as f64 / total_steps as f64 * 100.0
        } else {
            0.0
        };

        if pass_rate >= 100.0 && lii >= SUMMARY_SUCCESS_LII {
            return FeedbackMessage {
                kind: FeedbackKind::Success,
                step_id: StepId::summary(),
                summary: format!(
                    "Proof complete: All {} steps validated (LII: {})",
                    total_steps, lii
                ),
                suggestions: Vec::new(),
            };
        }

        if pass_rate >= SUMMARY_WARNING_RATE {
            return FeedbackMessage {
                kind: FeedbackKind::Warning,
                step_id: StepId::summary(),
                summary: format!(
                    "Proof mostly valid: {}/{} steps passed (LII: {})",
                    valid_steps, total_steps, lii
                ),
                suggestions: owned(&["Review failed steps for corrections"]),
            };
        }

        FeedbackMessage {
            kind: FeedbackKind::Error,
            step_id: StepId::summary(),
            summary: format!(
                "Proof incomplete: Only {}/{} steps validated (LII: {})",
                valid_steps, total_steps, lii
            ),
            suggestions: owned(&[
                "Significant revisions needed",
                "Review symbolic and semantic errors",
                "Consider restructuring proof approach",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(valid: bool, coherence: u8) -> FeedbackKind {
        FeedbackGenerator
            .generate(&StepId::Number(1), valid, coherence, &[])
            .kind
    }

    #[test]
    fn test_step_classification() {
        assert_eq!(kind(true, 85), FeedbackKind::Success);
        assert_eq!(kind(true, 80), FeedbackKind::Success);
        assert_eq!(kind(true, 79), FeedbackKind::Info);
        assert_eq!(kind(true, 75), FeedbackKind::Info);
        assert_eq!(kind(true, 70), FeedbackKind::Info);
        assert_eq!(kind(true, 69), FeedbackKind::Warning);
        assert_eq!(kind(true, 65), FeedbackKind::Warning);
        for coherence in [0, 50, 85, 100] {
            assert_eq!(kind(false, coherence), FeedbackKind::Error);
        }
    }

    #[test]
    fn test_suggestion_lists() {
        let gen = FeedbackGenerator;
        let id = StepId::from("s1");
        assert!(gen.generate(&id, true, 90, &[]).suggestions.is_empty());
        assert_eq!(gen.generate(&id, false, 90, &[]).suggestions.len(), 3);
        assert_eq!(gen.generate(&id, true, 60, &[]).suggestions.len(), 3);
        assert_eq!(gen.generate(&id, true, 75, &[]).suggestions.len(), 2);
    }

    #[test]
    fn test_extra_errors_appended() {
        let errors = vec!["Difference: x - y".to_string()];
        let msg = FeedbackGenerator.generate(&StepId::Number(4), false, 40, &errors);
        assert_eq!(msg.suggestions.last().map(String::as_str), Some("Difference: x - y"));
        assert!(msg.summary.starts_with("Step 4:"));
    }

    #[test]
    fn test_summary_classification() {
        let gen = FeedbackGenerator;
        let msg = gen.generate_summary(5, 5, 95);
        assert_eq!(msg.kind, FeedbackKind::Success);
        assert_eq!(msg.step_id, StepId::summary());
        assert!(msg.summary.contains("All 5 steps"));
        assert!(msg.summary.contains("LII: 95"));

        // full pass rate but low LII falls through to warning
        assert_eq!(gen.generate_summary(5, 5, 85).kind, FeedbackKind::Warning);
        assert_eq!(gen.generate_summary(4, 5, 80).kind, FeedbackKind::Warning);
        assert_eq!(gen.generate_summary(3, 5, 90).kind, FeedbackKind::Error);
    }

    #[test]
    fn test_summary_zero_steps() {
        let msg = FeedbackGenerator.generate_summary(0, 0, 100);
        assert_eq!(msg.kind, FeedbackKind::Error);
        assert!(msg.summary.contains("0/0"));
    }

    #[test]
    fn test_serialized_type_field() {
        let msg = FeedbackGenerator.generate(&StepId::Number(2), true, 90, &[]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "success");
        assert_eq!(json["step_id"], 2);
    }
}
