//! Records that flow through the generation, scoring and summary pipeline.

use serde::{Deserialize, Serialize};

/// One multiple-choice question as handed to clients. `options` is already
/// shuffled; `correct_answer` is expected, but not guaranteed, to be one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GeneratedQuestion {
    pub(crate) question: String,
    #[serde(default)]
    pub(crate) options: Vec<String>,
    pub(crate) correct_answer: String,
}

impl GeneratedQuestion {
    pub(crate) fn answer_in_options(&self) -> bool {
        self.options.iter().any(|option| option == &self.correct_answer)
    }
}

/// A graded answer to a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ResponseRecord {
    pub(crate) question: String,
    pub(crate) correct_answer: String,
    pub(crate) user_answer: String,
    pub(crate) is_correct: bool,
}

impl ResponseRecord {
    /// Correctness is exact string equality: case and whitespace both matter.
    pub(crate) fn graded(question: String, correct_answer: String, user_answer: String) -> Self {
        let is_correct = user_answer == correct_answer;
        Self { question, correct_answer, user_answer, is_correct }
    }
}

/// An answer as submitted, before grading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubmittedResponse {
    pub(crate) user_answer: String,
    pub(crate) correct_answer: String,
}
