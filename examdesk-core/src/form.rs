//! Create and edit flow for a multiple-choice problem

use crate::editor::{EditorEngine, EditorHost, ImageUploader};
use crate::error::FormError;
use crate::storage::ProblemStore;
use crate::types::{Block, Choice, Problem, ProblemSaveRequest, DEFAULT_CHOICE_COUNT};
use std::sync::Arc;

/// True when a document shows nothing: no blocks, or only blank paragraphs
pub fn is_empty_content(blocks: &[Block]) -> bool {
    blocks.iter().all(|block| match block {
        Block::Text(text) => text.is_blank(),
        _ => false,
    })
}

/// A problem being created or edited
///
/// Statement and explanation each have their own editing session. A failed
/// save keeps every field and both sessions as they were, so the same form
/// can be saved again.
pub struct ProblemForm<E: EditorEngine> {
    exam_id: i64,
    problem_id: Option<i64>,
    pub number: u32,
    pub choices: Vec<Choice>,
    content: EditorHost<E>,
    explanation: EditorHost<E>,
}

impl<E: EditorEngine + Default> ProblemForm<E> {
    /// A new problem numbered after the `existing` problems of the exam
    pub fn create(
        exam_id: Option<i64>,
        existing: usize,
        uploader: Arc<dyn ImageUploader>,
    ) -> Result<Self, FormError> {
        let exam_id = exam_id.ok_or(FormError::NoExamSelected)?;
        Ok(Self {
            exam_id,
            problem_id: None,
            number: u32::try_from(existing).map_or(0, |n| n.saturating_add(1)),
            choices: Choice::defaults(DEFAULT_CHOICE_COUNT),
            content: EditorHost::open_blocks(E::default(), &[], uploader.clone())?,
            explanation: EditorHost::open_blocks(E::default(), &[], uploader)?,
        })
    }

    /// Edit a stored problem
    pub fn edit(problem: &Problem, uploader: Arc<dyn ImageUploader>) -> Result<Self, FormError> {
        Ok(Self {
            exam_id: problem.exam_id,
            problem_id: Some(problem.id),
            number: problem.number,
            choices: problem.choices.clone(),
            content: EditorHost::open_blocks(E::default(), &problem.content, uploader.clone())?,
            explanation: EditorHost::open_blocks(E::default(), &problem.explanation, uploader)?,
        })
    }
}

impl<E: EditorEngine> ProblemForm<E> {
    pub fn exam_id(&self) -> i64 {
        self.exam_id
    }

    /// Id of the stored problem; `None` until a new problem is first saved
    pub fn problem_id(&self) -> Option<i64> {
        self.problem_id
    }

    pub fn is_new(&self) -> bool {
        self.problem_id.is_none()
    }

    /// Editing session for the problem statement
    pub fn content(&self) -> &EditorHost<E> {
        &self.content
    }

    /// Editing session for the explanation
    pub fn explanation(&self) -> &EditorHost<E> {
        &self.explanation
    }

    /// Flip whether the choice with this number is a correct answer
    pub fn toggle_answer(&mut self, number: u32) -> bool {
        match self.choices.iter_mut().find(|c| c.number == number) {
            Some(choice) => {
                choice.is_answer = !choice.is_answer;
                true
            }
            None => false,
        }
    }

    /// Validate the form and build the save payload
    ///
    /// Empty content blocks a new problem only; an existing problem may be
    /// cleared.
    pub async fn request(&self) -> Result<ProblemSaveRequest, FormError> {
        if self.number == 0 {
            return Err(FormError::MissingNumber);
        }
        if !self.choices.iter().any(|c| c.is_answer) {
            return Err(FormError::MissingAnswer);
        }
        let content = self.content.pending().await;
        if self.is_new() && is_empty_content(&content) {
            return Err(FormError::EmptyContent);
        }
        Ok(ProblemSaveRequest {
            id: self.problem_id,
            number: self.number,
            content,
            explanation: self.explanation.pending().await,
            choices: self.choices.clone(),
        })
    }

    /// Validate and save; later saves of a new problem update it
    pub async fn save(&mut self, store: &dyn ProblemStore) -> Result<i64, FormError> {
        let request = self.request().await?;
        match store.save_problem(self.exam_id, &request).await {
            Ok(id) => {
                tracing::info!(id, exam_id = self.exam_id, number = self.number, "Problem saved");
                self.problem_id = Some(id);
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(exam_id = self.exam_id, error = %e, "Problem save failed");
                Err(FormError::SaveFailed(e))
            }
        }
    }
}
