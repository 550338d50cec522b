//! Questionnaire assembly
//!
//! Thin validation wrapper over the question store: check the requested
//! test type and subjects, sample, and shape the response.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::AppError;
use crate::questions::{Question, QuestionStore};

/// Questionnaire lengths the service will hand out
pub const ACCEPTED_LENGTHS: [usize; 3] = [5, 10, 20];

/// One questionnaire entry as returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(rename = "A")]
    pub option_a: String,
    #[serde(rename = "B")]
    pub option_b: String,
    #[serde(rename = "C")]
    pub option_c: String,
    #[serde(rename = "D", skip_serializing_if = "Option::is_none")]
    pub option_d: Option<String>,
}

impl From<Question> for QuizQuestion {
    fn from(question: Question) -> Self {
        Self {
            question: question.question,
            option_a: question.response_a,
            option_b: question.response_b,
            option_c: question.response_c,
            // An empty D column means a three-choice question
            option_d: question.response_d.filter(|d| !d.is_empty()),
        }
    }
}

/// Assembled questionnaire
///
/// Serializes as an ordered mapping `"Question 1"` .. `"Question N"`.
#[derive(Debug)]
pub struct Questionnaire {
    entries: Vec<QuizQuestion>,
}

impl Questionnaire {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            entries: questions.into_iter().map(QuizQuestion::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Questionnaire {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (index, entry) in self.entries.iter().enumerate() {
            map.serialize_entry(&format!("Question {}", index + 1), entry)?;
        }
        map.end()
    }
}

/// Check that a test type exists in the store
pub async fn verify_use(store: &dyn QuestionStore, use_: &str) -> Result<(), AppError> {
    let uses = store.list_uses().await;
    if !uses.iter().any(|u| u == use_) {
        return Err(AppError::NotFound(format!(
            "The type of test chosen is not in the store ({})",
            uses.join(", ")
        )));
    }
    Ok(())
}

/// Assemble a randomized questionnaire
///
/// The requested subjects must be non-empty and belong to the test type,
/// and the resulting sample must hit one of the accepted lengths.
pub async fn build_questionnaire(
    store: &dyn QuestionStore,
    use_: &str,
    subjects: &[String],
    count: usize,
) -> Result<Questionnaire, AppError> {
    verify_use(store, use_).await?;

    let known = store.list_subjects(use_).await;
    if subjects.is_empty() || !subjects.iter().all(|s| known.contains(s)) {
        return Err(AppError::NotFound(
            "One or several subjects not in the type selected.".to_string(),
        ));
    }

    let picked = store.sample(use_, subjects, count).await;
    if !ACCEPTED_LENGTHS.contains(&picked.len()) {
        return Err(AppError::NotFound(
            "Not enough questions to generate a questionnaire or wrong number of questions (5, 10 or 20).".to_string(),
        ));
    }

    Ok(Questionnaire::new(picked))
}
