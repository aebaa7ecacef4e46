//! Core data model for proof evaluation

use crate::error_codes::ErrorCode;
use crate::feedback::FeedbackMessage;
use crate::justification::JustificationGraph;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SCORE_MIN: u8 = 0;
pub const SCORE_MAX: u8 = 100;

/// Integer score in [0, 100]
///
/// The only constructor clamps and rounds, so an out-of-range score cannot
/// exist. Deserialization goes through the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Round to the nearest integer and clamp into [0, 100]; NaN maps to 0
    pub fn clamped(raw: f64) -> Self {
        if raw.is_nan() {
            return Score(SCORE_MIN);
        }
        let rounded = raw.round().clamp(SCORE_MIN as f64, SCORE_MAX as f64);
        Score(rounded as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<f64> for Score {
    fn from(raw: f64) -> Self {
        Score::clamped(raw)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One adapter's verdict on one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub model: String,
    pub score: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Statistical summary of all adapters' verdicts on one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// In adapter query order
    pub results: Vec<ModelResult>,
    /// Mean score, rounded to the nearest integer
    pub mean: u8,
    /// Population variance, rounded to one decimal
    pub variance: f64,
    /// Agreement in [0, 100], derived from variance
    pub coherence: u8,
}

impl ConsensusResult {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            mean: 0,
            variance: 0.0,
            coherence: 0,
        }
    }
}

/// Outcome of a symbolic equivalence check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolicVerificationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    /// Non-zero simplification remainder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

impl SymbolicVerificationResult {
    /// Result for a step without an equation
    pub fn vacuous() -> Self {
        Self {
            valid: true,
            code: None,
            difference: None,
            diagnostics: None,
        }
    }
}

/// Proof step identifier: integer or string, unique within one proof
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepId {
    Number(i64),
    Text(String),
}

impl StepId {
    /// Marker used by the proof-level summary message
    pub fn summary() -> Self {
        StepId::Text("summary".to_string())
    }

    /// Graph node key, distinct for `1` and `"1"`
    ///
    /// Text that would read as an integer, or that already starts with a
    /// quote, is written quoted. Everything else keeps its display form.
    pub fn graph_key(&self) -> String {
        match self {
            StepId::Number(n) => n.to_string(),
            StepId::Text(s) if s.parse::<i64>().is_ok() || s.starts_with('"') => {
                format!("{:?}", s)
            }
            StepId::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Number(n) => write!(f, "{}", n),
            StepId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StepId {
    fn from(n: i64) -> Self {
        StepId::Number(n)
    }
}

impl From<i32> for StepId {
    fn from(n: i32) -> Self {
        StepId::Number(n as i64)
    }
}

impl From<String> for StepId {
    fn from(s: String) -> Self {
        StepId::Text(s)
    }
}

impl From<&str> for StepId {
    fn from(s: &str) -> Self {
        StepId::Text(s.to_string())
    }
}

/// Proof domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[default]
    Algebra,
    Topology,
    Logic,
    /// Any unrecognized domain tag
    #[serde(other)]
    Other,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Algebra => "algebra",
            Domain::Topology => "topology",
            Domain::Logic => "logic",
            Domain::Other => "other",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equation carried by a step; either side may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    #[serde(default)]
    pub lhs: Option<String>,
    #[serde(default)]
    pub rhs: Option<String>,
}

impl Equation {
    pub fn new(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Self {
            lhs: Some(lhs.into()),
            rhs: Some(rhs.into()),
        }
    }
}

/// One step of a proof as submitted for evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofStep {
    pub id: StepId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equation: Option<Equation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    /// Ids of the steps this one relies on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<StepId>,
}

impl ProofStep {
    pub fn new(id: impl Into<StepId>) -> Self {
        Self {
            id: id.into(),
            equation: None,
            claim: None,
            domain: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_equation(mut self, lhs: &str, rhs: &str) -> Self {
        self.equation = Some(Equation::new(lhs, rhs));
        self
    }

    pub fn with_claim(mut self, claim: &str) -> Self {
        self.claim = Some(claim.to_string());
        self
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn depends_on(mut self, id: impl Into<StepId>) -> Self {
        self.dependencies.push(id.into());
        self
    }
}

/// A whole proof
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProofInput {
    #[serde(default)]
    pub domain: Domain,
    pub steps: Vec<ProofStep>,
}

/// Per-step fused result; created once per step evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridStepResult {
    pub step_id: StepId,
    pub symbolic: SymbolicVerificationResult,
    pub consensus: ConsensusResult,
    pub lii: u8,
    pub lci: (u8, u8),
    pub pass: bool,
}

/// Whole-proof result handed to callers and run stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofEvaluationResult {
    pub valid: bool,
    pub lii: u8,
    pub lci: (u8, u8),
    /// Mean of step coherences, rounded
    pub coherence: u8,
    pub steps: Vec<HybridStepResult>,
    /// One message per step in step order, then the summary
    pub feedback: Vec<FeedbackMessage>,
    pub justification: JustificationGraph,
}

impl ProofEvaluationResult {
    pub fn passed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.pass).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_clamps_and_rounds() {
        assert_eq!(Score::clamped(-12.0).value(), 0);
        assert_eq!(Score::clamped(140.0).value(), 100);
        assert_eq!(Score::clamped(72.5).value(), 73);
        assert_eq!(Score::clamped(72.4).value(), 72);
        assert_eq!(Score::clamped(f64::NAN).value(), 0);
        assert_eq!(Score::clamped(f64::INFINITY).value(), 100);
    }

    #[test]
    fn test_score_deserialization_is_clamped() {
        let score: Score = serde_json::from_str("250").unwrap();
        assert_eq!(score.value(), 100);
        assert_eq!(serde_json::to_string(&score).unwrap(), "100");
    }

    #[test]
    fn test_step_id_untagged() {
        let ids: Vec<StepId> = serde_json::from_str(r#"[1, "lemma-2"]"#).unwrap();
        assert_eq!(ids[0], StepId::Number(1));
        assert_eq!(ids[1], StepId::Text("lemma-2".to_string()));
        assert_eq!(StepId::summary().to_string(), "summary");
    }

    #[test]
    fn test_graph_keys_keep_number_and_text_apart() {
        assert_eq!(StepId::Number(1).graph_key(), "1");
        assert_eq!(StepId::from("1").graph_key(), "\"1\"");
        assert_eq!(StepId::from("-7").graph_key(), "\"-7\"");
        assert_eq!(StepId::from("lemma-2").graph_key(), "lemma-2");
        assert_eq!(StepId::from("1a").graph_key(), "1a");

        let quoted = StepId::from("\"1\"").graph_key();
        assert_ne!(quoted, StepId::from("1").graph_key());
    }

    #[test]
    fn test_unknown_domain_maps_to_other() {
        let domain: Domain = serde_json::from_str("\"calculus\"").unwrap();
        assert_eq!(domain, Domain::Other);
        let domain: Domain = serde_json::from_str("\"topology\"").unwrap();
        assert_eq!(domain, Domain::Topology);
    }

    #[test]
    fn test_proof_input_defaults() {
        let proof: ProofInput = serde_json::from_str(
            r#"{"steps": [{"id": 1, "equation": {"lhs": "x"}, "claim": "x is x"}]}"#,
        )
        .unwrap();
        assert_eq!(proof.domain, Domain::Algebra);
        let step = &proof.steps[0];
        assert_eq!(step.equation.as_ref().unwrap().rhs, None);
        assert!(step.dependencies.is_empty());
    }
}
