//! Exam problem and answer records exchanged with the storage service

use super::block::Block;
use super::stored::deserialize_content;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of choices a new problem starts with
pub const DEFAULT_CHOICE_COUNT: u32 = 5;

/// One answer option of a multiple-choice problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub number: u32,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub is_answer: bool,
}

impl Choice {
    /// An empty, incorrect choice
    pub fn blank(number: u32) -> Self {
        Self {
            id: None,
            number,
            content: String::new(),
            is_answer: false,
        }
    }

    /// Blank choices numbered from 1
    pub fn defaults(count: u32) -> Vec<Self> {
        (1..=count).map(Self::blank).collect()
    }
}

/// A stored problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: i64,

    pub exam_id: i64,

    pub number: u32,

    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Vec<Block>,

    #[serde(default, deserialize_with = "deserialize_content")]
    pub explanation: Vec<Block>,

    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Problem {
    /// The choices marked correct
    pub fn answers(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter().filter(|c| c.is_answer)
    }
}

/// Create or update payload; `id` is absent for new problems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSaveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub number: u32,

    pub content: Vec<Block>,

    pub explanation: Vec<Block>,

    pub choices: Vec<Choice>,
}

impl ProblemSaveRequest {
    /// Materialize the stored record for this request
    pub fn into_problem(self, id: i64, exam_id: i64, saved_at: DateTime<Utc>) -> Problem {
        Problem {
            id,
            exam_id,
            number: self.number,
            content: self.content,
            explanation: self.explanation,
            choices: self.choices,
            updated_at: Some(saved_at),
        }
    }
}

/// An administrator's answer on the Q&A board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i64,

    pub username: String,

    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Vec<Block>,

    pub created_at: DateTime<Utc>,
}
