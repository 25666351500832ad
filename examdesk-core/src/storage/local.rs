//! Problem store backed by JSON files on the local filesystem

use super::{ProblemStore, StorageResult};
use crate::error::StorageError;
use crate::types::{Problem, ProblemSaveRequest};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Stores each problem as `problems/<id>.json` under a root directory
pub struct LocalProblemStore {
    root: PathBuf,
    /// Serializes id allocation and writes
    write_lock: Mutex<()>,
}

impl LocalProblemStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn problems_dir(&self) -> PathBuf {
        self.root.join("problems")
    }

    /// Path of a problem file; ids must be positive
    fn problem_path(&self, id: i64) -> StorageResult<PathBuf> {
        if id <= 0 {
            return Err(StorageError::InvalidId(id.to_string()));
        }
        Ok(self.problems_dir().join(format!("{id}.json")))
    }

    /// Read a problem file; older content generations are upgraded on read
    pub async fn read_file(path: &Path) -> StorageResult<Problem> {
        let data = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(path.display().to_string())
            } else {
                StorageError::BackendError(e.to_string())
            }
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Ids of every stored problem, ascending
    async fn stored_ids(&self) -> StorageResult<Vec<i64>> {
        let mut read_dir = match tokio::fs::read_dir(self.problems_dir()).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::BackendError(e.to_string())),
        };

        let mut ids = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?
        {
            let name = entry.file_name();
            let id = name
                .to_str()
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(|stem| stem.parse::<i64>().ok());
            if let Some(id) = id {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    /// Write a problem atomically
    /// Writes to a temp file then renames to avoid partial writes
    async fn write_problem(&self, problem: &Problem) -> StorageResult<()> {
        let path = self.problem_path(problem.id)?;
        let data = serde_json::to_string_pretty(problem)?;

        tokio::fs::create_dir_all(self.problems_dir())
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

#[async_trait]
impl ProblemStore for LocalProblemStore {
    async fn save_problem(&self, exam_id: i64, request: &ProblemSaveRequest) -> StorageResult<i64> {
        let _guard = self.write_lock.lock().await;
        let ids = self.stored_ids().await?;
        let id = match request.id {
            Some(id) if ids.binary_search(&id).is_ok() => id,
            Some(id) => return Err(StorageError::NotFound(format!("problem {id}"))),
            None => ids.last().map_or(1, |last| last + 1),
        };

        let problem = request.clone().into_problem(id, exam_id, Utc::now());
        self.write_problem(&problem).await?;
        tracing::info!(id, exam_id, number = problem.number, "Saved problem");
        Ok(id)
    }

    async fn get_problem(&self, id: i64) -> StorageResult<Problem> {
        let path = self.problem_path(id)?;
        Self::read_file(&path).await
    }

    async fn list_problems(&self, exam_id: i64) -> StorageResult<Vec<Problem>> {
        let mut problems = Vec::new();
        for id in self.stored_ids().await? {
            match self.get_problem(id).await {
                Ok(problem) if problem.exam_id == exam_id => problems.push(problem),
                Ok(_) => {}
                Err(e) => tracing::warn!(id, error = %e, "Skipping unreadable problem file"),
            }
        }
        problems.sort_by_key(|p| p.number);
        Ok(problems)
    }

    async fn delete_problem(&self, id: i64) -> StorageResult<()> {
        let path = self.problem_path(id)?;
        let _guard = self.write_lock.lock().await;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| StorageError::NotFound(format!("problem {id}: {e}")))
    }
}
