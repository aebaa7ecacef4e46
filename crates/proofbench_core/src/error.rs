//! Error types for ProofBench.
//!
//! None of these escape an evaluation: the pipeline turns each of them into
//! data (a floor score, an error code, a failed step).

use thiserror::Error;

/// Lexical rejection of an algebraic expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("Invalid expression: empty after trimming")]
    Empty,

    #[error("Expression too long: max {max} characters")]
    TooLong { max: usize },

    #[error("Invalid characters in expression")]
    InvalidCharacters,

    #[error("Disallowed pattern detected: {0}")]
    DisallowedPattern(&'static str),
}

/// Model adapter failures (absorbed into a floor score by the aggregator)
#[derive(Error, Debug, Clone)]
pub enum AdapterError {
    #[error("adapter unreachable: {0}")]
    Unreachable(String),

    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("missing API key: environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Symbolic sandbox failures (reported as runtime-error results)
#[derive(Error, Debug, Clone)]
pub enum SandboxError {
    #[error("sandbox timeout after {0} seconds")]
    Timeout(u64),

    #[error("sandbox crashed: {0}")]
    Crashed(String),

    #[error("malformed sandbox output: {0}")]
    MalformedOutput(String),

    #[error("failed to start sandbox: {0}")]
    Spawn(String),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML render error: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Run store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("run already stored: {0}")]
    Duplicate(String),
}
