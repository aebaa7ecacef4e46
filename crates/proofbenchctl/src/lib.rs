//! ProofBench Control - command-line front end for proof evaluation

pub mod commands;
pub mod output;
pub mod store;

pub use store::{DirRunStore, RunEnvelope};
