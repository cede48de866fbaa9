use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Assignment, StudentAssignment};
use crate::db::types::AssignmentStatus;
use crate::schemas::progress::AnswerPayload;
use crate::services::records::{GeneratedQuestion, ResponseRecord};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SaveAssignmentRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "title must be at most 100 characters"))]
    pub(crate) title: Option<String>,
    #[validate(length(min = 1, max = 50, message = "subject must be 1..50 characters"))]
    pub(crate) subject: String,
    #[validate(length(min = 1, max = 50, message = "grade_level must be 1..50 characters"))]
    pub(crate) grade_level: String,
    #[validate(length(min = 1, message = "questions must not be empty"))]
    pub(crate) questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CreateAssignmentRequest {
    #[validate(length(min = 1, max = 100, message = "title must be 1..100 characters"))]
    pub(crate) title: String,
    #[validate(length(min = 1, max = 50, message = "subject must be 1..50 characters"))]
    pub(crate) subject: String,
    #[validate(length(min = 1, max = 50, message = "grade_level must be 1..50 characters"))]
    pub(crate) grade_level: String,
    #[validate(length(min = 1, message = "questions must not be empty"))]
    pub(crate) questions: Vec<GeneratedQuestion>,
    #[validate(length(min = 1, message = "student_ids must not be empty"))]
    pub(crate) student_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteAssignmentRequest {
    pub(crate) id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignToStudentsRequest {
    #[serde(default)]
    pub(crate) assignment_id: Option<i64>,
    #[serde(default)]
    pub(crate) student_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitAssignmentRequest {
    pub(crate) assignment_id: i64,
    pub(crate) student_id: i64,
    #[serde(default)]
    pub(crate) responses: Vec<AnswerPayload>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentSummaryResponse {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) subject: String,
    pub(crate) grade_level: String,
    pub(crate) questions: Vec<GeneratedQuestion>,
    pub(crate) status: AssignmentStatus,
}

impl AssignmentSummaryResponse {
    pub(crate) fn from_db(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            title: assignment.title,
            subject: assignment.subject,
            grade_level: assignment.grade_level,
            questions: assignment.questions.0,
            status: assignment.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) subject: String,
    pub(crate) grade_level: String,
    pub(crate) questions: Vec<GeneratedQuestion>,
    pub(crate) responses: Option<Vec<ResponseRecord>>,
    pub(crate) score: Option<f64>,
    pub(crate) status: AssignmentStatus,
    pub(crate) student_id: Option<i64>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) assigned_students: Option<Vec<i64>>,
}

impl AssignmentResponse {
    pub(crate) fn from_db(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            title: assignment.title,
            subject: assignment.subject,
            grade_level: assignment.grade_level,
            questions: assignment.questions.0,
            responses: assignment.responses.map(|responses| responses.0),
            score: assignment.score,
            status: assignment.status,
            student_id: assignment.student_id,
            created_at: format_primitive(assignment.created_at),
            updated_at: format_primitive(assignment.updated_at),
            assigned_students: None,
        }
    }

    pub(crate) fn with_links(mut self, links: Vec<StudentAssignment>) -> Self {
        self.assigned_students = Some(links.into_iter().map(|link| link.student_id).collect());
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveAssignmentResponse {
    pub(crate) message: String,
    pub(crate) id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateAssignmentResponse {
    pub(crate) message: String,
    pub(crate) assignments: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignToStudentsResponse {
    pub(crate) message: String,
    pub(crate) assigned: Vec<i64>,
    pub(crate) skipped: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitAssignmentResponse {
    pub(crate) message: String,
    pub(crate) score: f64,
    pub(crate) correct: usize,
    pub(crate) total: usize,
}
