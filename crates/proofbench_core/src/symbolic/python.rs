//! Python subprocess sandbox
//!
//! Runs the generated SymPy program with `python -c` and returns its trimmed
//! stdout as a string value.

use super::sandbox::{SandboxValue, SymbolicSandbox};
use crate::config::SandboxConfig;
use crate::error::SandboxError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error};

pub struct PythonSandbox {
    python: String,
    timeout_secs: u64,
}

impl PythonSandbox {
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            python: config.python.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

#[async_trait]
impl SymbolicSandbox for PythonSandbox {
    async fn run_task(&self, source: &str) -> Result<SandboxValue, SandboxError> {
        debug!("  Executing: {} -c <{} bytes>", self.python, source.len());

        // kill_on_drop: a cancelled evaluation takes the child down with it
        let child = Command::new(&self.python)
            .arg("-c")
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SandboxError::Spawn(format!("{}: {}", self.python, e)))?;

        let output = timeout(Duration::from_secs(self.timeout_secs), child.wait_with_output())
            .await
            .map_err(|_| SandboxError::Timeout(self.timeout_secs))?
            .map_err(|e| SandboxError::Crashed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("sandbox exited with an error")
                .trim()
                .to_string();
            error!("  Sandbox failed: {}", message);
            return Err(SandboxError::Crashed(message));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = stdout.trim();
        if text.is_empty() {
            return Err(SandboxError::MalformedOutput("empty output".to_string()));
        }

        Ok(SandboxValue::String(text.to_string()))
    }
}
