//! Logic Integrity Index
//!
//! LII = (100 - 5*errors - 10*drift) * domain factor, rounded, clamped to
//! [0, 100]. The confidence interval widens as coherence drops:
//! margin = round((100 - coherence) / 5), each bound clamped on its own.

use crate::types::Domain;
use serde::{Deserialize, Serialize};

const ERROR_PENALTY: f64 = 5.0;
const DRIFT_PENALTY: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiiResult {
    pub lii: u8,
    pub lci: (u8, u8),
}

fn domain_factor(domain: Domain) -> f64 {
    match domain {
        Domain::Algebra => 1.0,
        Domain::Topology => 0.9,
        Domain::Logic => 0.95,
        Domain::Other => 0.9,
    }
}

/// Stateless LII calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct LiiEngine;

impl LiiEngine {
    /// `total_steps` is part of the contract but not yet weighted
    pub fn compute_lii(
        &self,
        domain: Domain,
        _total_steps: usize,
        error_count: usize,
        drift_score: f64,
    ) -> u8 {
        let base = 100.0 - error_count as f64 * ERROR_PENALTY - drift_score * DRIFT_PENALTY;
        let lii = (base * domain_factor(domain)).round();
        lii.clamp(0.0, 100.0) as u8
    }

    pub fn compute_lci(&self, lii: u8, coherence: f64) -> (u8, u8) {
        let margin = ((100.0 - coherence) / 5.0).round();
        let low = (lii as f64 - margin).max(0.0);
        let high = (lii as f64 + margin).min(100.0);
        (low as u8, high as u8)
    }

    pub fn analyze(
        &self,
        domain: Domain,
        total_steps: usize,
        error_count: usize,
        coherence: f64,
        drift_score: f64,
    ) -> LiiResult {
        let lii = self.compute_lii(domain, total_steps, error_count, drift_score);
        let lci = self.compute_lci(lii, coherence);
        LiiResult { lii, lci }
    }
}
