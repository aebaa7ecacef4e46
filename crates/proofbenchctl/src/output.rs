//! Terminal rendering for evaluation results (ASCII only)

use owo_colors::OwoColorize;
use proofbench_core::{
    ErrorCode, FeedbackKind, FeedbackMessage, HybridStepResult, JustificationGraph,
    ProofEvaluationResult,
};
use std::fmt::Write;

pub const SEPARATOR: &str = "----------------------------------------------------------------";

fn status_tag(pass: bool) -> String {
    if pass {
        "[PASS]".bright_green().to_string()
    } else {
        "[FAIL]".bright_red().to_string()
    }
}

fn code_label(code: Option<ErrorCode>) -> String {
    match code {
        Some(code) => format!("{} ({})", code.as_str(), code.description()),
        None => "- (no equation)".to_string(),
    }
}

fn feedback_tag(kind: FeedbackKind) -> String {
    match kind {
        FeedbackKind::Success => "[OK]".bright_green().to_string(),
        FeedbackKind::Info => "[INFO]".cyan().to_string(),
        FeedbackKind::Warning => "[WARN]".yellow().to_string(),
        FeedbackKind::Error => "[ERROR]".bright_red().to_string(),
    }
}

fn render_step(out: &mut String, step: &HybridStepResult) {
    let _ = writeln!(
        out,
        "{} step {}  symbolic {}  mean {}  coherence {}  LII {} [{}, {}]",
        status_tag(step.pass),
        step.step_id.bold(),
        code_label(step.symbolic.code),
        step.consensus.mean,
        step.consensus.coherence,
        step.lii,
        step.lci.0,
        step.lci.1
    );
    if let Some(difference) = &step.symbolic.difference {
        let _ = writeln!(out, "       difference: {}", difference.yellow());
    }
    if step.symbolic.code == Some(ErrorCode::RuntimeError) || step.symbolic.code == Some(ErrorCode::Incomplete) {
        if let Some(diagnostics) = &step.symbolic.diagnostics {
            let _ = writeln!(out, "       {}", diagnostics.dimmed());
        }
    }
    for model in &step.consensus.results {
        let _ = writeln!(out, "       {:<12} {:>3}", model.model, model.score.value());
    }
}

fn render_feedback(out: &mut String, message: &FeedbackMessage) {
    let _ = writeln!(out, "{} {}", feedback_tag(message.kind), message.summary);
    for suggestion in &message.suggestions {
        let _ = writeln!(out, "    * {}", suggestion);
    }
}

/// Human-readable report for one evaluated proof
pub fn render_evaluation(result: &ProofEvaluationResult, run_id: Option<&str>) -> String {
    let mut out = String::new();

    let verdict = if result.valid {
        "VALID".bright_green().to_string()
    } else {
        "INVALID".bright_red().to_string()
    };
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Proof {}  LII {} [{}, {}]  coherence {}  {}/{} steps passed",
        verdict,
        result.lii,
        result.lci.0,
        result.lci.1,
        result.coherence,
        result.passed_steps(),
        result.steps.len()
    );
    if let Some(run_id) = run_id {
        let _ = writeln!(out, "run {}", run_id.dimmed());
    }
    let _ = writeln!(out, "{}", SEPARATOR.dimmed());

    for step in &result.steps {
        render_step(&mut out, step);
    }

    let _ = writeln!(out, "{}", SEPARATOR.dimmed());
    render_graph_line(&mut out, &result.justification);
    let _ = writeln!(out);

    for message in &result.feedback {
        render_feedback(&mut out, message);
    }

    out
}

fn render_graph_line(out: &mut String, graph: &JustificationGraph) {
    let cycle = if graph.has_cycle {
        "cycle detected".bright_red().to_string()
    } else {
        "acyclic".bright_green().to_string()
    };
    let _ = writeln!(
        out,
        "justification: {} nodes, depth {}, {}",
        graph.nodes.len(),
        graph.depth,
        cycle
    );
}

/// Human-readable summary of a justification graph
pub fn render_graph(graph: &JustificationGraph) -> String {
    let mut out = String::new();
    render_graph_line(&mut out, graph);
    for node in &graph.nodes {
        if node.dependencies.is_empty() {
            let _ = writeln!(out, "  {}", node.id);
        } else {
            let _ = writeln!(out, "  {} <- {}", node.id, node.dependencies.join(", "));
        }
    }
    out
}
