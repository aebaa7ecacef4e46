//! Configuration management for ProofBench.
//!
//! Loads settings from ./proofbench.toml, then /etc/proofbench/config.toml,
//! or falls back to defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Config file in the working directory
pub const LOCAL_CONFIG_PATH: &str = "proofbench.toml";

/// System-wide config file
pub const CONFIG_PATH: &str = "/etc/proofbench/config.toml";

/// Allowed slack when checking that the two weights sum to 1
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Scoring thresholds and weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Weight of the symbolic verdict in the combined step score
    #[serde(default = "default_symbolic_weight")]
    pub symbolic_weight: f64,

    /// Weight of the consensus mean in the combined step score
    #[serde(default = "default_semantic_weight")]
    pub semantic_weight: f64,

    /// Minimum combined score for a step to pass
    #[serde(default = "default_threshold")]
    pub pass_threshold: f64,

    /// Minimum consensus coherence for a step (or claim) to pass
    #[serde(default = "default_coherence_threshold")]
    pub coherence_threshold: u8,

    /// Minimum consensus mean for a claim to pass semantic evaluation
    #[serde(default = "default_semantic_mean_threshold")]
    pub semantic_mean_threshold: u8,

    /// Upper bound on steps evaluated at the same time
    #[serde(default = "default_max_concurrent_steps")]
    pub max_concurrent_steps: usize,
}

fn default_symbolic_weight() -> f64 {
    0.7
}

fn default_semantic_weight() -> f64 {
    0.3
}

fn default_threshold() -> f64 {
    70.0
}

fn default_coherence_threshold() -> u8 {
    70
}

fn default_semantic_mean_threshold() -> u8 {
    70
}

fn default_max_concurrent_steps() -> usize {
    4
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            symbolic_weight: default_symbolic_weight(),
            semantic_weight: default_semantic_weight(),
            pass_threshold: default_threshold(),
            coherence_threshold: default_coherence_threshold(),
            semantic_mean_threshold: default_semantic_mean_threshold(),
            max_concurrent_steps: default_max_concurrent_steps(),
        }
    }
}

/// Wire protocol spoken by a model adapter endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Ollama `/api/generate`
    Ollama,
    /// OpenAI-compatible `/v1/chat/completions`
    Openai,
}

/// One semantic evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Identifier recorded in every ModelResult
    pub name: String,

    #[serde(default = "default_adapter_kind")]
    pub kind: AdapterKind,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    pub model: String,

    /// Environment variable holding the API key (never the key itself)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default = "default_adapter_timeout")]
    pub timeout_secs: u64,
}

fn default_adapter_kind() -> AdapterKind {
    AdapterKind::Ollama
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_adapter_timeout() -> u64 {
    30
}

impl AdapterConfig {
    pub fn ollama(name: &str, model: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: AdapterKind::Ollama,
            endpoint: default_endpoint(),
            model: model.to_string(),
            api_key_env: None,
            timeout_secs: default_adapter_timeout(),
        }
    }
}

/// Python subprocess sandbox settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxConfig {
    #[serde(default = "default_python")]
    pub python: String,

    #[serde(default = "default_sandbox_timeout")]
    pub timeout_secs: u64,
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_sandbox_timeout() -> u64 {
    10
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            timeout_secs: default_sandbox_timeout(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofBenchConfig {
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    #[serde(default = "default_adapters")]
    pub adapters: Vec<AdapterConfig>,

    #[serde(default)]
    pub sandbox: SandboxConfig,
}

fn default_adapters() -> Vec<AdapterConfig> {
    vec![
        AdapterConfig::ollama("llama3", "llama3.1:8b"),
        AdapterConfig::ollama("qwen", "qwen2.5:7b-instruct"),
        AdapterConfig::ollama("mistral", "mistral:7b"),
    ]
}

impl Default for ProofBenchConfig {
    fn default() -> Self {
        Self {
            evaluation: EvaluationConfig::default(),
            adapters: default_adapters(),
            sandbox: SandboxConfig::default(),
        }
    }
}

impl ProofBenchConfig {
    /// Load config from the first existing location, or return defaults
    ///
    /// A file that exists but does not parse or validate is an error; only
    /// missing files fall through to the next location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_first(&[Path::new(LOCAL_CONFIG_PATH), Path::new(CONFIG_PATH)])
    }

    /// `load` over an explicit search list
    pub fn load_first(paths: &[&Path]) -> Result<Self, ConfigError> {
        for path in paths {
            match Self::load_from_path(path) {
                Ok(config) => return Ok(config),
                Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("No config at {}", path.display());
                }
                Err(e) => {
                    warn!("Rejected config at {}: {}", path.display(), e);
                    return Err(e);
                }
            }
        }

        info!("Config not found, using defaults");
        Ok(ProofBenchConfig::default())
    }

    /// Load and validate config from a specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ProofBenchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings the scoring rules cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let eval = &self.evaluation;

        for (name, weight) in [
            ("symbolic_weight", eval.symbolic_weight),
            ("semantic_weight", eval.semantic_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 0 and 1, got {}",
                    name, weight
                )));
            }
        }

        if (eval.symbolic_weight + eval.semantic_weight - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::Invalid(
                "symbolic_weight and semantic_weight must sum to 1.0".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&eval.pass_threshold) {
            return Err(ConfigError::Invalid(format!(
                "pass_threshold must be between 0 and 100, got {}",
                eval.pass_threshold
            )));
        }

        if eval.coherence_threshold > 100 || eval.semantic_mean_threshold > 100 {
            return Err(ConfigError::Invalid(
                "coherence and mean thresholds must be at most 100".to_string(),
            ));
        }

        if eval.max_concurrent_steps == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_steps must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for adapter in &self.adapters {
            if !seen.insert(adapter.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate adapter name: {}",
                    adapter.name
                )));
            }
        }

        if self.sandbox.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "sandbox timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
