//! Question storage and questionnaire assembly

mod quiz;
mod store;

pub use quiz::{build_questionnaire, verify_use, Questionnaire, QuizQuestion, ACCEPTED_LENGTHS};
pub use store::JsonlQuestionStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// One stored quiz question
///
/// `response_d` and `remark` are optional; a question with no D option
/// renders as a three-choice entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[validate(length(min = 1, message = "question text is required"))]
    pub question: String,
    #[validate(length(min = 1, message = "subject is required"))]
    pub subject: String,
    #[serde(rename = "use")]
    #[validate(length(min = 1, message = "use is required"))]
    pub use_: String,
    #[validate(length(min = 1, message = "correct answer is required"))]
    pub correct: String,
    #[validate(length(min = 1, message = "response A is required"))]
    pub response_a: String,
    #[validate(length(min = 1, message = "response B is required"))]
    pub response_b: String,
    #[validate(length(min = 1, message = "response C is required"))]
    pub response_c: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Flat question table with uniform sampling and append-only writes
///
/// Reads never block behind appends; appends serialize only against each
/// other.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Unique test types, first-seen order
    async fn list_uses(&self) -> Vec<String>;

    /// Unique subjects for a test type, first-seen order
    async fn list_subjects(&self, use_: &str) -> Vec<String>;

    /// Uniform sample without replacement, capped at `count`
    async fn sample(&self, use_: &str, subjects: &[String], count: usize) -> Vec<Question>;

    /// Append one question to the store
    async fn append(&self, question: Question) -> Result<(), AppError>;
}
