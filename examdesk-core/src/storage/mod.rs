//! Storage collaborators for problems and uploaded images

mod local;
mod upload;

pub use local::LocalProblemStore;
pub use upload::LocalUploader;

use crate::error::StorageError;
use crate::types::{Problem, ProblemSaveRequest};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// The problem storage service
///
/// Content and explanation travel as block arrays; the store does not look
/// inside them.
#[async_trait]
pub trait ProblemStore: Send + Sync {
    /// Create (no `id`) or update a problem, returning its id
    async fn save_problem(&self, exam_id: i64, request: &ProblemSaveRequest) -> StorageResult<i64>;

    async fn get_problem(&self, id: i64) -> StorageResult<Problem>;

    /// Problems of one exam, ordered by problem number
    async fn list_problems(&self, exam_id: i64) -> StorageResult<Vec<Problem>>;

    async fn delete_problem(&self, id: i64) -> StorageResult<()>;
}

/// In-memory problem store (for testing)
#[derive(Debug, Default)]
pub struct MemoryProblemStore {
    problems: RwLock<BTreeMap<i64, Problem>>,
}

impl MemoryProblemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.problems.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.problems.read().await.is_empty()
    }
}

#[async_trait]
impl ProblemStore for MemoryProblemStore {
    async fn save_problem(&self, exam_id: i64, request: &ProblemSaveRequest) -> StorageResult<i64> {
        let mut problems = self.problems.write().await;
        let id = match request.id {
            Some(id) if problems.contains_key(&id) => id,
            Some(id) => return Err(StorageError::NotFound(format!("problem {id}"))),
            None => problems.keys().next_back().map_or(1, |last| last + 1),
        };
        let problem = request.clone().into_problem(id, exam_id, Utc::now());
        problems.insert(id, problem);
        Ok(id)
    }

    async fn get_problem(&self, id: i64) -> StorageResult<Problem> {
        self.problems
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("problem {id}")))
    }

    async fn list_problems(&self, exam_id: i64) -> StorageResult<Vec<Problem>> {
        let mut problems: Vec<Problem> = self
            .problems
            .read()
            .await
            .values()
            .filter(|p| p.exam_id == exam_id)
            .cloned()
            .collect();
        problems.sort_by_key(|p| p.number);
        Ok(problems)
    }

    async fn delete_problem(&self, id: i64) -> StorageResult<()> {
        self.problems
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("problem {id}")))
    }
}
