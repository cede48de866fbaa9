use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Assignment, Student};
use crate::db::types::AssignmentStatus;
use crate::services::records::ResponseRecord;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AddStudentRequest {
    #[validate(length(min = 1, max = 50, message = "name must be 1..50 characters"))]
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: String,
}

impl StudentResponse {
    pub(crate) fn from_db(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            created_at: format_primitive(student.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddStudentResponse {
    pub(crate) message: String,
    pub(crate) student: StudentResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentScoreEntry {
    pub(crate) assignment_id: i64,
    pub(crate) title: String,
    pub(crate) subject: String,
    pub(crate) grade_level: String,
    pub(crate) status: AssignmentStatus,
    pub(crate) score: Option<f64>,
    pub(crate) responses: Option<Vec<ResponseRecord>>,
}

impl StudentScoreEntry {
    pub(crate) fn from_db(assignment: Assignment) -> Self {
        Self {
            assignment_id: assignment.id,
            title: assignment.title,
            subject: assignment.subject,
            grade_level: assignment.grade_level,
            status: assignment.status,
            score: assignment.score,
            responses: assignment.responses.map(|responses| responses.0),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentScoresResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) assignments: Vec<StudentScoreEntry>,
}
