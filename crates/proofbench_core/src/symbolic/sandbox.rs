//! Symbolic sandbox boundary
//!
//! The sandbox executes a generated simplify-and-stringify program and hands
//! back its textual (or numeric) result. The verifier owns no sandbox state;
//! callers inject an `Arc<dyn SymbolicSandbox>`.

use crate::error::SandboxError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Whatever the sandbox returned: usually a string, sometimes a number
pub type SandboxValue = serde_json::Value;

#[async_trait]
pub trait SymbolicSandbox: Send + Sync {
    async fn run_task(&self, source: &str) -> Result<SandboxValue, SandboxError>;
}

// ============================================================================
// Fake Sandbox (Testing)
// ============================================================================

/// Scripted sandbox that records every submitted program
#[derive(Clone, Default)]
pub struct FakeSandbox {
    responses: Arc<Mutex<VecDeque<Result<SandboxValue, SandboxError>>>>,
    submitted: Arc<Mutex<Vec<String>>>,
}

impl FakeSandbox {
    pub fn new(responses: Vec<Result<SandboxValue, SandboxError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always return the same simplification result
    pub fn returning(text: &str) -> Self {
        Self::new(vec![Ok(SandboxValue::String(text.to_string()))])
    }

    pub fn failing(error: SandboxError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.submitted.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Programs submitted so far, in order
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SymbolicSandbox for FakeSandbox {
    async fn run_task(&self, source: &str) -> Result<SandboxValue, SandboxError> {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(source.to_string());
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| SandboxError::Crashed("fake sandbox poisoned".to_string()))?;

        match responses.len() {
            0 => Err(SandboxError::MalformedOutput("no scripted response".to_string())),
            1 => responses[0].clone(),
            _ => responses
                .pop_front()
                .unwrap_or_else(|| Err(SandboxError::MalformedOutput("no scripted response".to_string()))),
        }
    }
}
