//! Command handlers for proofbenchctl.

use crate::output;
use crate::store::DirRunStore;
use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use proofbench_core::{
    analyze_justifications, sanitize_expr, HttpModelAdapter, JustificationGraph,
    JustificationNode, ModelAdapter, ProofBenchConfig, ProofEngine, ProofEvaluationResult,
    ProofInput, PythonSandbox, RunStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Resolve the effective configuration
///
/// An explicit path must load and validate; otherwise the default lookup
/// chain applies, and a file found on it must validate too.
pub fn load_config(path: Option<&Path>) -> Result<ProofBenchConfig> {
    match path {
        Some(path) => ProofBenchConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => ProofBenchConfig::load().context("Failed to load config"),
    }
}

/// One HTTP adapter per configured entry
pub fn build_adapters(config: &ProofBenchConfig) -> Result<Vec<Arc<dyn ModelAdapter>>> {
    let mut adapters: Vec<Arc<dyn ModelAdapter>> = Vec::with_capacity(config.adapters.len());
    for adapter in &config.adapters {
        match HttpModelAdapter::new(adapter.clone()) {
            Ok(built) => adapters.push(Arc::new(built)),
            Err(e) => warn!("Skipping adapter {}: {}", adapter.name, e),
        }
    }

    if adapters.is_empty() {
        bail!("No usable model adapters configured");
    }
    Ok(adapters)
}

pub fn read_proof(path: &Path) -> Result<ProofInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read proof file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse proof file {}", path.display()))
}

pub fn read_graph_nodes(path: &Path) -> Result<Vec<JustificationNode>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse graph file {}", path.display()))
}

/// Options for the evaluate command
#[derive(Debug, Clone, Default)]
pub struct EvaluateOptions {
    pub config: Option<PathBuf>,
    pub json: bool,
    pub store: Option<PathBuf>,
}

/// Evaluate a proof against the configured adapters and sandbox
///
/// Returns whether the proof is valid.
pub async fn evaluate(proof_path: &Path, options: &EvaluateOptions) -> Result<bool> {
    let config = load_config(options.config.as_deref())?;
    let proof = read_proof(proof_path)?;

    let adapters = build_adapters(&config)?;
    let sandbox = Arc::new(PythonSandbox::new(&config.sandbox));
    let engine = ProofEngine::from_config(&config, adapters, sandbox);

    info!("Evaluating {} steps from {}", proof.steps.len(), proof_path.display());
    let result = engine.evaluate(&proof).await;

    let run_id = match &options.store {
        Some(dir) => Some(store_run(dir, &result).await?),
        None => None,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", output::render_evaluation(&result, run_id.as_deref()));
    }

    Ok(result.valid)
}

/// Persist a result under a fresh run id
pub async fn store_run(dir: &Path, result: &ProofEvaluationResult) -> Result<String> {
    let store = DirRunStore::new(dir);
    let run_id = DirRunStore::new_run_id();
    store
        .save(&run_id, result)
        .await
        .with_context(|| format!("Failed to store run in {}", dir.display()))?;
    Ok(run_id)
}

/// Analyze a standalone justification graph
pub fn graph(path: &Path, json: bool) -> Result<JustificationGraph> {
    let nodes = read_graph_nodes(path)?;
    let graph = analyze_justifications(nodes);

    if json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
    } else {
        print!("{}", output::render_graph(&graph));
    }
    Ok(graph)
}

/// Run one expression through the sanitizer
///
/// Returns whether it was accepted.
pub fn check_expr(expr: &str) -> bool {
    match sanitize_expr(expr) {
        Ok(clean) => {
            println!("{} {}", "[OK]".bright_green(), clean);
            true
        }
        Err(e) => {
            println!("{} {}", "[REJECTED]".bright_red(), e);
            false
        }
    }
}

/// Print the effective configuration as TOML
pub fn show_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    let rendered = config.to_toml().context("Failed to render config")?;
    print!("{}", rendered);
    Ok(())
}
