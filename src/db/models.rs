use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::AssignmentStatus;
use crate::services::records::{GeneratedQuestion, ResponseRecord};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Student {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assignment {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) subject: String,
    pub(crate) grade_level: String,
    pub(crate) questions: Json<Vec<GeneratedQuestion>>,
    pub(crate) responses: Option<Json<Vec<ResponseRecord>>>,
    pub(crate) score: Option<f64>,
    pub(crate) status: AssignmentStatus,
    pub(crate) student_id: Option<i64>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentAssignment {
    pub(crate) id: i64,
    pub(crate) student_id: i64,
    pub(crate) assignment_id: i64,
    pub(crate) status: AssignmentStatus,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentProgress {
    pub(crate) id: i64,
    pub(crate) student_id: Option<i64>,
    pub(crate) subject: String,
    pub(crate) grade_level: String,
    pub(crate) question: String,
    pub(crate) correct_answer: String,
    pub(crate) user_answer: String,
    pub(crate) is_correct: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

impl StudentProgress {
    pub(crate) fn into_subject_record(self) -> (String, ResponseRecord) {
        (
            self.subject,
            ResponseRecord {
                question: self.question,
                correct_answer: self.correct_answer,
                user_answer: self.user_answer,
                is_correct: self.is_correct,
            },
        )
    }
}

impl Assignment {
    /// Graded responses paired with this assignment's subject, in stored order.
    pub(crate) fn subject_records(&self) -> Vec<(String, ResponseRecord)> {
        self.responses
            .as_ref()
            .map(|responses| {
                responses.0.iter().map(|record| (self.subject.clone(), record.clone())).collect()
            })
            .unwrap_or_default()
    }
}
