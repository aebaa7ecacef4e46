//! Symbolic verification
//!
//! Decides algebraic equivalence of `lhs` and `rhs` by asking the sandbox to
//! simplify `lhs - rhs`. A result of `0` means equivalent; anything else is
//! the remainder. Every failure mode is reported as a result, never raised.

pub mod python;
pub mod sandbox;

pub use python::PythonSandbox;
pub use sandbox::{FakeSandbox, SandboxValue, SymbolicSandbox};

use crate::error_codes::ErrorCode;
use crate::sanitize::sanitize_expr;
use crate::types::{Domain, Equation, SymbolicVerificationResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Symbol-set imports needed by each domain
fn domain_preamble(domain: Domain) -> &'static str {
    match domain {
        Domain::Topology => "from sympy.topology import PointSet",
        Domain::Logic => "from sympy.logic.boolalg import Implies, And, Or, Not",
        Domain::Algebra | Domain::Other => "",
    }
}

/// Generate the simplify-the-difference program for two sanitized sides
///
/// Sides go through plain `parse_expr`, so `^` keeps SymPy's XOR meaning
/// and adjacent letters stay one symbol.
pub fn build_program(lhs: &str, rhs: &str, domain: Domain) -> String {
    format!(
        "from sympy import simplify, symbols\n\
         from sympy.parsing.sympy_parser import parse_expr\n\
         {preamble}\n\
         lhs = parse_expr(\"{lhs}\")\n\
         rhs = parse_expr(\"{rhs}\")\n\
         difference = simplify(lhs - rhs)\n\
         print(str(difference))\n",
        preamble = domain_preamble(domain),
        lhs = lhs,
        rhs = rhs,
    )
}

/// True for the textual `"0"` or the number `0`
fn is_zero(value: &SandboxValue) -> bool {
    match value {
        SandboxValue::String(s) => s.trim() == "0",
        SandboxValue::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn value_text(value: &SandboxValue) -> String {
    match value {
        SandboxValue::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

#[derive(Clone)]
pub struct SymbolicVerifier {
    sandbox: Arc<dyn SymbolicSandbox>,
}

impl SymbolicVerifier {
    pub fn new(sandbox: Arc<dyn SymbolicSandbox>) -> Self {
        Self { sandbox }
    }

    pub async fn verify(&self, equation: &Equation, domain: Domain) -> SymbolicVerificationResult {
        let (lhs, rhs) = match (equation.lhs.as_deref(), equation.rhs.as_deref()) {
            (Some(l), Some(r)) if !l.is_empty() && !r.is_empty() => (l, r),
            _ => {
                return SymbolicVerificationResult {
                    valid: false,
                    code: Some(ErrorCode::Incomplete),
                    difference: None,
                    diagnostics: Some("Missing LHS or RHS".to_string()),
                }
            }
        };

        let sides = sanitize_expr(lhs).and_then(|l| sanitize_expr(rhs).map(|r| (l, r)));
        let (lhs, rhs) = match sides {
            Ok(sides) => sides,
            Err(e) => {
                warn!("Rejected expression before sandbox: {}", e);
                return runtime_error(e.to_string());
            }
        };

        let program = build_program(&lhs, &rhs, domain);
        debug!(%domain, "submitting symbolic task");

        match self.sandbox.run_task(&program).await {
            Ok(value) if is_zero(&value) => SymbolicVerificationResult {
                valid: true,
                code: Some(ErrorCode::Valid),
                difference: None,
                diagnostics: Some(domain.to_string()),
            },
            Ok(value) => SymbolicVerificationResult {
                valid: false,
                code: Some(ErrorCode::AlgebraicError),
                difference: Some(value_text(&value)),
                diagnostics: Some(domain.to_string()),
            },
            Err(e) => {
                warn!("Symbolic sandbox failed: {}", e);
                runtime_error(e.to_string())
            }
        }
    }
}

fn runtime_error(message: String) -> SymbolicVerificationResult {
    SymbolicVerificationResult {
        valid: false,
        code: Some(ErrorCode::RuntimeError),
        difference: None,
        diagnostics: Some(message),
    }
}
