use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub(crate) struct AnswerPayload {
    pub(crate) question: String,
    #[validate(length(max = 100, message = "correct_answer must be at most 100 characters"))]
    pub(crate) correct_answer: String,
    #[serde(alias = "userAnswer")]
    #[validate(length(max = 100, message = "user_answer must be at most 100 characters"))]
    pub(crate) user_answer: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SaveResponseRequest {
    #[serde(default)]
    pub(crate) student_id: Option<i64>,
    #[validate(length(min = 1, max = 50, message = "subject must be 1..50 characters"))]
    pub(crate) subject: String,
    #[validate(length(min = 1, max = 50, message = "grade_level must be 1..50 characters"))]
    pub(crate) grade_level: String,
    #[validate(length(min = 1, message = "responses must not be empty"), nested)]
    pub(crate) responses: Vec<AnswerPayload>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveResponseResponse {
    pub(crate) message: String,
    pub(crate) saved: u64,
    pub(crate) correct: usize,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProgressReportQuery {
    #[serde(default)]
    pub(crate) subject: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummaryResponse {
    pub(crate) summary: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentProgressReportResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) progress_report: String,
}
