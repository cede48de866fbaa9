use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::records::GeneratedQuestion;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GenerateQuestionsRequest {
    #[validate(length(min = 1, max = 50, message = "subject must be 1..50 characters"))]
    pub(crate) subject: String,
    #[validate(length(min = 1, max = 50, message = "grade_level must be 1..50 characters"))]
    pub(crate) grade_level: String,
    #[validate(range(min = 1, message = "num_questions must be at least 1"))]
    pub(crate) num_questions: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateQuestionsResponse {
    pub(crate) questions: Vec<GeneratedQuestion>,
}
