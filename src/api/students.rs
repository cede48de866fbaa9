use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::get, routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::validation::{require_text, validate_payload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Student;
use crate::repositories;
use crate::schemas::assignment::AssignmentResponse;
use crate::schemas::student::{
    AddStudentRequest, AddStudentResponse, StudentResponse, StudentScoreEntry,
    StudentScoresResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/add_student", post(add_student))
        .route("/get_students", get(list_students))
        .route("/get_student_assignments/:student_id", get(student_assignments))
        .route("/get_student_scores/:student_id", get(student_scores))
}

/// Loads the student or fails with 404.
pub(crate) async fn require_student(state: &AppState, student_id: i64) -> Result<Student, ApiError> {
    repositories::students::find_by_id(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))
}

async fn add_student(
    State(state): State<AppState>,
    Json(payload): Json<AddStudentRequest>,
) -> Result<(StatusCode, Json<AddStudentResponse>), ApiError> {
    validate_payload(&payload)?;
    let name = require_text("name", &payload.name)?;

    let student = repositories::students::create(state.db(), &name, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to add student"))?;
    tracing::info!(student_id = student.id, "Student added");

    Ok((
        StatusCode::CREATED,
        Json(AddStudentResponse {
            message: "Student added successfully".to_string(),
            student: StudentResponse::from_db(student),
        }),
    ))
}

async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = repositories::students::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(students.into_iter().map(StudentResponse::from_db).collect()))
}

async fn student_assignments(
    Path(student_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    require_student(&state, student_id).await?;

    let assignments = repositories::assignments::list_for_student(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list student assignments"))?;

    Ok(Json(assignments.into_iter().map(AssignmentResponse::from_db).collect()))
}

async fn student_scores(
    Path(student_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StudentScoresResponse>, ApiError> {
    let student = require_student(&state, student_id).await?;

    let assignments = repositories::assignments::list_for_student(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list student assignments"))?;

    Ok(Json(StudentScoresResponse {
        id: student.id,
        name: student.name,
        assignments: assignments.into_iter().map(StudentScoreEntry::from_db).collect(),
    }))
}

#[cfg(test)]
mod tests;
