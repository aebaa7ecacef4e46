//! ProofBench Core - hybrid symbolic/semantic proof evaluation
//!
//! Pipeline:
//! 1. Expression sanitizer (lexical gate before the sandbox)
//! 2. Consensus aggregator (parallel model adapters, variance-derived coherence)
//! 3. Symbolic verifier (simplify-the-difference in an external sandbox)
//! 4. Hybrid combinator (weighted fusion + LII per step)
//! 5. Proof engine (step fan-out, proof-level LII, feedback)
//!
//! Invariants:
//! - Every score is clamped to [0, 100] at creation
//! - No adapter or sandbox failure aborts an evaluation; failures become data
//! - Results preserve input order regardless of completion order

pub mod config;
pub mod consensus;
pub mod error;
pub mod error_codes;
pub mod feedback;
pub mod hybrid;
pub mod justification;
pub mod lii;
pub mod proof_engine;
pub mod run_store;
pub mod sanitize;
pub mod semantic;
pub mod symbolic;
pub mod types;

pub use config::{AdapterConfig, AdapterKind, EvaluationConfig, ProofBenchConfig, SandboxConfig};
pub use consensus::{
    AdapterVerdict, ConsensusAggregator, FakeModelAdapter, HttpModelAdapter, ModelAdapter,
    SCORE_FLOOR,
};
pub use error::{AdapterError, ConfigError, SandboxError, SanitizeError, StoreError};
pub use error_codes::ErrorCode;
pub use feedback::{FeedbackGenerator, FeedbackKind, FeedbackMessage};
pub use hybrid::{HybridEngine, HybridWeights};
pub use justification::{analyze_justifications, JustificationGraph, JustificationNode};
pub use lii::{LiiEngine, LiiResult};
pub use proof_engine::ProofEngine;
pub use run_store::{MemoryRunStore, RunStore};
pub use sanitize::{sanitize_claim, sanitize_expr};
pub use semantic::{SemanticEvaluation, SemanticEvaluator};
pub use symbolic::{FakeSandbox, PythonSandbox, SandboxValue, SymbolicSandbox, SymbolicVerifier};
pub use types::*;
