use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{routing::get, routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::students::require_student;
use crate::api::validation::{require_text, validate_payload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::repositories::progress::ProgressFilter;
use crate::schemas::progress::{
    ProgressReportQuery, SaveResponseRequest, SaveResponseResponse,
    StudentProgressReportResponse, SummaryResponse,
};
use crate::schemas::MessageResponse;
use crate::services::records::ResponseRecord;
use crate::services::summary::{self, SummaryError};

pub(crate) const NO_ASSIGNMENTS_SUMMARY: &str = "No assignments found.";
pub(crate) const NO_RESPONSES_SUMMARY: &str = "No responses recorded.";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/save_response", post(save_response))
        .route("/clear_data", post(clear_data))
        .route("/progress_report", get(progress_report))
        .route("/get_student_progress/:student_id", get(student_progress))
        .route("/get_student_progress_report/:student_id", get(student_progress_report))
}

async fn save_response(
    State(state): State<AppState>,
    Json(payload): Json<SaveResponseRequest>,
) -> Result<(StatusCode, Json<SaveResponseResponse>), ApiError> {
    validate_payload(&payload)?;
    let subject = require_text("subject", &payload.subject)?;
    let grade_level = require_text("grade_level", &payload.grade_level)?;

    if let Some(student_id) = payload.student_id {
        require_student(&state, student_id).await?;
    }

    let graded: Vec<ResponseRecord> = payload
        .responses
        .into_iter()
        .map(|answer| ResponseRecord::graded(answer.question, answer.correct_answer, answer.user_answer))
        .collect();
    let correct = graded.iter().filter(|record| record.is_correct).count();

    let saved = repositories::progress::save_responses(
        state.db(),
        repositories::progress::SaveResponses {
            student_id: payload.student_id,
            subject: &subject,
            grade_level: &grade_level,
            responses: &graded,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save responses"))?;

    Ok((
        StatusCode::CREATED,
        Json(SaveResponseResponse {
            message: "Responses saved successfully".to_string(),
            saved,
            correct,
        }),
    ))
}

async fn clear_data(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    let removed = repositories::progress::delete_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear student data"))?;
    tracing::info!(removed, "Student progress cleared");

    Ok(Json(MessageResponse::new("Student data cleared successfully")))
}

async fn progress_report(
    State(state): State<AppState>,
    Query(query): Query<ProgressReportQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let filter = ProgressFilter {
        student_id: None,
        subject: query.subject.map(|subject| subject.trim().to_string()).filter(|s| !s.is_empty()),
    };
    let rows = repositories::progress::list_responses(state.db(), &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load responses"))?;
    let records = rows.into_iter().map(|row| row.into_subject_record()).collect();

    let summary = summarize(&state, records, NO_RESPONSES_SUMMARY).await?;
    Ok(Json(SummaryResponse { summary }))
}

async fn student_progress(
    Path(student_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let records = student_records(&state, student_id).await?;

    let summary = summarize(&state, records, NO_ASSIGNMENTS_SUMMARY).await?;
    Ok(Json(SummaryResponse { summary }))
}

async fn student_progress_report(
    Path(student_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<StudentProgressReportResponse>, ApiError> {
    let student = require_student(&state, student_id).await?;
    let records = student_records(&state, student_id).await?;

    let progress_report = summarize(&state, records, NO_ASSIGNMENTS_SUMMARY).await?;
    Ok(Json(StudentProgressReportResponse { id: student.id, name: student.name, progress_report }))
}

async fn student_records(
    state: &AppState,
    student_id: i64,
) -> Result<Vec<(String, ResponseRecord)>, ApiError> {
    let assignments = repositories::assignments::list_for_student(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list student assignments"))?;

    Ok(assignments.iter().flat_map(|assignment| assignment.subject_records()).collect())
}

/// Runs the summary pipeline, answering with `placeholder` when there is nothing to summarize.
pub(crate) async fn summarize(
    state: &AppState,
    records: Vec<(String, ResponseRecord)>,
    placeholder: &str,
) -> Result<String, ApiError> {
    match summary::generate_summary(state.completion(), records).await {
        Ok(summary) => Ok(summary),
        Err(SummaryError::NoResponses) => Ok(placeholder.to_string()),
        Err(SummaryError::Completion(err)) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests;
