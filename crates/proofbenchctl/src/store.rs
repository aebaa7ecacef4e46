//! Directory-backed run history
//!
//! One pretty-printed JSON envelope per run: `<dir>/<run_id>.json`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use proofbench_core::{ProofEvaluationResult, RunStore, StoreError};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use uuid::Uuid;

/// Stored form of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEnvelope {
    pub run_id: String,
    pub evaluated_at: DateTime<Utc>,
    pub result: ProofEvaluationResult,
}

pub struct DirRunStore {
    dir: PathBuf,
}

impl DirRunStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Fresh random run id
    pub fn new_run_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn path_for(&self, run_id: &str) -> Result<PathBuf, StoreError> {
        let bad = run_id.is_empty()
            || run_id.starts_with('.')
            || run_id.contains(|c| c == '/' || c == '\\');
        if bad {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid run id: {:?}", run_id),
            )));
        }
        Ok(self.dir.join(format!("{}.json", run_id)))
    }

    /// Full envelope including the timestamp
    pub async fn load_envelope(&self, run_id: &str) -> Result<Option<RunEnvelope>, StoreError> {
        let path = self.path_for(run_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RunStore for DirRunStore {
    async fn save(&self, run_id: &str, result: &ProofEvaluationResult) -> Result<(), StoreError> {
        let path = self.path_for(run_id)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let envelope = RunEnvelope {
            run_id: run_id.to_string(),
            evaluated_at: Utc::now(),
            result: result.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;

        // create_new makes the existence check and the create one step
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::Duplicate(run_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(&bytes).await?;
        file.flush().await?;

        info!("Stored run {} at {}", run_id, path.display());
        Ok(())
    }

    async fn load(&self, run_id: &str) -> Result<Option<ProofEvaluationResult>, StoreError> {
        Ok(self.load_envelope(run_id).await?.map(|envelope| envelope.result))
    }

    async fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        debug!("Found {} stored runs in {}", ids.len(), self.dir.display());
        Ok(ids)
    }
}
