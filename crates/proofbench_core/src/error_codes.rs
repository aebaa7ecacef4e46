//! Standardized verification result codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Code attached to a symbolic verification result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Algebraically valid
    #[serde(rename = "A")]
    Valid,
    /// Algebraic mismatch
    #[serde(rename = "E")]
    AlgebraicError,
    /// Incomplete step (missing side)
    #[serde(rename = "I")]
    Incomplete,
    /// Semantic drift; reserved, not emitted by the core
    #[serde(rename = "D")]
    Drift,
    /// Unjustified logical leap; reserved for upstream use
    #[serde(rename = "U")]
    Unjustified,
    /// Sandbox crash or timeout
    #[serde(rename = "C")]
    RuntimeError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Valid => "A",
            ErrorCode::AlgebraicError => "E",
            ErrorCode::Incomplete => "I",
            ErrorCode::Drift => "D",
            ErrorCode::Unjustified => "U",
            ErrorCode::RuntimeError => "C",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::Valid => "algebraically valid",
            ErrorCode::AlgebraicError => "algebraic mismatch",
            ErrorCode::Incomplete => "incomplete step",
            ErrorCode::Drift => "semantic drift",
            ErrorCode::Unjustified => "unjustified leap",
            ErrorCode::RuntimeError => "computation crash or timeout",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
