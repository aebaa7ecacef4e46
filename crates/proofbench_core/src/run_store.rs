//! Persistence boundary for finished evaluations
//!
//! The engine never stores anything itself; callers that want a history
//! hand the result to a `RunStore` after `ProofEngine::evaluate` returns.

use crate::error::StoreError;
use crate::types::ProofEvaluationResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

#[async_trait]
pub trait RunStore: Send + Sync {
    /// Persist one run; a run id can only be stored once
    async fn save(&self, run_id: &str, result: &ProofEvaluationResult) -> Result<(), StoreError>;

    async fn load(&self, run_id: &str) -> Result<Option<ProofEvaluationResult>, StoreError>;

    /// Stored run ids, sorted
    async fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// In-process store for tests and one-shot tools
#[derive(Debug, Default)]
pub struct MemoryRunStore {
    runs: Mutex<HashMap<String, ProofEvaluationResult>>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.runs.lock().map(|runs| runs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> StoreError {
        StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "run store lock poisoned",
        ))
    }
}

#[async_trait]
impl RunStore for MemoryRunStore {
    async fn save(&self, run_id: &str, result: &ProofEvaluationResult) -> Result<(), StoreError> {
        let mut runs = self.runs.lock().map_err(|_| Self::poisoned())?;
        if runs.contains_key(run_id) {
            return Err(StoreError::Duplicate(run_id.to_string()));
        }
        runs.insert(run_id.to_string(), result.clone());
        debug!("Stored run {} in memory", run_id);
        Ok(())
    }

    async fn load(&self, run_id: &str) -> Result<Option<ProofEvaluationResult>, StoreError> {
        let runs = self.runs.lock().map_err(|_| Self::poisoned())?;
        Ok(runs.get(run_id).cloned())
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let runs = self.runs.lock().map_err(|_| Self::poisoned())?;
        let mut ids: Vec<String> = runs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::justification::analyze_justifications;

    fn sample_result(lii: u8) -> ProofEvaluationResult {
        ProofEvaluationResult {
            valid: lii >= 80,
            lii,
            lci: (lii, lii),
            coherence: 100,
            steps: Vec::new(),
            feedback: Vec::new(),
            justification: analyze_justifications(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemoryRunStore::new();
        assert!(store.is_empty());

        store.save("run-1", &sample_result(95)).await.unwrap();
        let loaded = store.load("run-1").await.unwrap().unwrap();
        assert_eq!(loaded.lii, 95);
        assert!(store.load("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_run_rejected() {
        let store = MemoryRunStore::new();
        store.save("run-1", &sample_result(90)).await.unwrap();

        let err = store.save("run-1", &sample_result(10)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref id) if id == "run-1"));
        // first write survives
        assert_eq!(store.load("run-1").await.unwrap().unwrap().lii, 90);
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let store = MemoryRunStore::new();
        for id in ["b", "c", "a"] {
            store.save(id, &sample_result(100)).await.unwrap();
        }
        assert_eq!(store.list().await.unwrap(), vec!["a", "b", "c"]);
        assert_eq!(store.len(), 3);
    }
}
