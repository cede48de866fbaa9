use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{routing::get, routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::validation::{dedup_ids, require_text, validate_payload};
use crate::core::metrics::SUBMISSIONS_SCORED_TOTAL;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::AssignmentStatus;
use crate::repositories;
use crate::schemas::assignment::{
    AssignToStudentsRequest, AssignToStudentsResponse, AssignmentResponse,
    AssignmentSummaryResponse, CreateAssignmentRequest, CreateAssignmentResponse,
    DeleteAssignmentRequest, SaveAssignmentRequest, SaveAssignmentResponse,
    SubmitAssignmentRequest, SubmitAssignmentResponse,
};
use crate::schemas::MessageResponse;
use crate::services::records::{ResponseRecord, SubmittedResponse};
use crate::services::scoring;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/save_assignment", post(save_assignment))
        .route("/create_assignment", post(create_assignment))
        .route("/get_assignments", get(list_assignments))
        .route("/get_assignment/:assignment_id", get(get_assignment))
        .route("/delete_assignment", post(delete_assignment))
        .route("/clear_all_assignments", post(clear_all_assignments))
        .route("/assign_to_student", post(assign_to_students))
        .route("/submit_assignment", post(submit_assignment))
}

async fn save_assignment(
    State(state): State<AppState>,
    Json(payload): Json<SaveAssignmentRequest>,
) -> Result<(StatusCode, Json<SaveAssignmentResponse>), ApiError> {
    validate_payload(&payload)?;
    let subject = require_text("subject", &payload.subject)?;
    let grade_level = require_text("grade_level", &payload.grade_level)?;
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{subject} ({grade_level})"));

    let assignment = repositories::assignments::create(
        state.db(),
        repositories::assignments::CreateAssignment {
            title: &title,
            subject: &subject,
            grade_level: &grade_level,
            questions: &payload.questions,
            student_id: None,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save assignment"))?;

    tracing::info!(assignment_id = assignment.id, %subject, "Assignment saved");

    Ok((
        StatusCode::CREATED,
        Json(SaveAssignmentResponse {
            message: "Assignment saved successfully".to_string(),
            id: assignment.id,
        }),
    ))
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<CreateAssignmentResponse>), ApiError> {
    validate_payload(&payload)?;
    let title = require_text("title", &payload.title)?;
    let subject = require_text("subject", &payload.subject)?;
    let grade_level = require_text("grade_level", &payload.grade_level)?;
    let student_ids = dedup_ids(&payload.student_ids);

    let existing: HashSet<i64> = repositories::students::existing_ids(state.db(), &student_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to look up students"))?
        .into_iter()
        .collect();
    let missing: Vec<String> = student_ids
        .iter()
        .filter(|id| !existing.contains(id))
        .map(|id| id.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::NotFound(format!("Students not found: {}", missing.join(", "))));
    }

    let now = primitive_now_utc();
    let mut tx =
        state.db().begin().await.map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;
    let mut created = Vec::with_capacity(student_ids.len());
    for student_id in student_ids {
        let assignment = repositories::assignments::create(
            &mut *tx,
            repositories::assignments::CreateAssignment {
                title: &title,
                subject: &subject,
                grade_level: &grade_level,
                questions: &payload.questions,
                student_id: Some(student_id),
                now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create assignment"))?;
        created.push(assignment.id);
    }
    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit assignments"))?;

    tracing::info!(count = created.len(), %subject, "Assignments created for students");

    Ok((
        StatusCode::CREATED,
        Json(CreateAssignmentResponse {
            message: "Assignments created and assigned to students successfully".to_string(),
            assignments: created,
        }),
    ))
}

async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentSummaryResponse>>, ApiError> {
    let assignments = repositories::assignments::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;

    Ok(Json(assignments.into_iter().map(AssignmentSummaryResponse::from_db).collect()))
}

async fn get_assignment(
    Path(assignment_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    let assignment = repositories::assignments::find_by_id(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;
    let links = repositories::student_assignments::list_for_assignment(state.db(), assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignment links"))?;

    Ok(Json(AssignmentResponse::from_db(assignment).with_links(links)))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Json(payload): Json<DeleteAssignmentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = repositories::assignments::delete(state.db(), payload.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete assignment"))?;
    if !deleted {
        return Err(ApiError::NotFound("Assignment not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Assignment deleted successfully")))
}

async fn clear_all_assignments(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = repositories::assignments::delete_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to clear assignments"))?;
    tracing::info!(removed, "All assignments cleared");

    Ok(Json(MessageResponse::new("All assignments cleared successfully")))
}

async fn assign_to_students(
    State(state): State<AppState>,
    Json(payload): Json<AssignToStudentsRequest>,
) -> Result<Json<AssignToStudentsResponse>, ApiError> {
    let assignment_id = payload
        .assignment_id
        .ok_or_else(|| ApiError::BadRequest("assignment_id is required".to_string()))?;
    let student_ids = payload
        .student_ids
        .as_deref()
        .filter(|ids| !ids.is_empty())
        .map(dedup_ids)
        .ok_or_else(|| ApiError::BadRequest("student_ids must not be empty".to_string()))?;

    repositories::assignments::find_by_id(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    let existing: HashSet<i64> = repositories::students::existing_ids(state.db(), &student_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to look up students"))?
        .into_iter()
        .collect();

    let now = primitive_now_utc();
    let mut assigned = Vec::new();
    let mut skipped = Vec::new();
    for student_id in student_ids {
        if !existing.contains(&student_id) {
            tracing::warn!(student_id, assignment_id, "Skipping unknown student");
            skipped.push(student_id);
            continue;
        }

        let link = repositories::student_assignments::create_if_absent(
            state.db(),
            student_id,
            assignment_id,
            now,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to assign assignment"))?;

        if link.is_some() {
            assigned.push(student_id);
        } else {
            tracing::info!(student_id, assignment_id, "Assignment already linked to student");
            skipped.push(student_id);
        }
    }

    Ok(Json(AssignToStudentsResponse {
        message: "Assignment assigned to students successfully".to_string(),
        assigned,
        skipped,
    }))
}

async fn submit_assignment(
    State(state): State<AppState>,
    Json(payload): Json<SubmitAssignmentRequest>,
) -> Result<Json<SubmitAssignmentResponse>, ApiError> {
    let submitted: Vec<SubmittedResponse> = payload
        .responses
        .iter()
        .map(|response| SubmittedResponse {
            user_answer: response.user_answer.clone(),
            correct_answer: response.correct_answer.clone(),
        })
        .collect();
    let result = scoring::score(&submitted)?;

    repositories::students::find_by_id(state.db(), payload.student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let target = repositories::assignments::find_by_id(state.db(), payload.assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;
    if target.student_id != Some(payload.student_id) {
        let linked = repositories::student_assignments::exists(
            state.db(),
            payload.student_id,
            target.id,
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check assignment link"))?;
        if !linked {
            tracing::warn!(
                assignment_id = target.id,
                student_id = payload.student_id,
                "Submission for an assignment not given to this student"
            );
            return Err(ApiError::NotFound("Assignment not found for this student".to_string()));
        }
    }

    let graded: Vec<ResponseRecord> = payload
        .responses
        .into_iter()
        .map(|response| {
            ResponseRecord::graded(response.question, response.correct_answer, response.user_answer)
        })
        .collect();

    let assignment = repositories::assignments::record_submission(
        state.db(),
        repositories::assignments::RecordSubmission {
            id: target.id,
            responses: &graded,
            score: result.percentage,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record submission"))?
    .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    repositories::student_assignments::set_status(
        state.db(),
        payload.student_id,
        assignment.id,
        AssignmentStatus::Completed,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update assignment link"))?;

    metrics::counter!(SUBMISSIONS_SCORED_TOTAL).increment(1);
    tracing::info!(
        assignment_id = assignment.id,
        student_id = payload.student_id,
        correct = result.correct,
        total = result.total,
        score = result.percentage,
        "Assignment submitted"
    );

    Ok(Json(SubmitAssignmentResponse {
        message: "Assignment submitted successfully".to_string(),
        score: result.percentage,
        correct: result.correct,
        total: result.total,
    }))
}
