use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::{summarize, NO_ASSIGNMENTS_SUMMARY, NO_RESPONSES_SUMMARY};
use crate::api::errors::ApiError;
use crate::services::records::ResponseRecord;
use crate::test_support;

const SUMMARY: &str = "Strengths:\n- Subtraction\n\nAreas of Improvement:\n- Division";

#[tokio::test]
async fn empty_records_yield_placeholder_without_calling_out() {
    let ctx = test_support::lazy_context().await;

    let summary =
        summarize(&ctx.state, Vec::new(), NO_ASSIGNMENTS_SUMMARY).await.expect("summary");

    assert_eq!(summary, "No assignments found.");
    assert!(ctx.completion.prompts().is_empty());
}

#[tokio::test]
async fn records_are_summarized_by_completion() {
    let ctx = test_support::lazy_context_with_replies(vec![SUMMARY]).await;
    let records = vec![(
        "Math".to_string(),
        ResponseRecord::graded("What is 12 / 3?".into(), "4".into(), "3".into()),
    )];

    let summary = summarize(&ctx.state, records, NO_RESPONSES_SUMMARY).await.expect("summary");

    assert_eq!(summary, SUMMARY);
    let prompts = ctx.completion.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Subject: Math\n"));
    assert!(prompts[0]
        .contains("Question: What is 12 / 3?, Correct Answer: 4, User Answer: 3, Correct: False"));
}

#[tokio::test]
async fn completion_failure_surfaces_as_bad_gateway() {
    let ctx = test_support::lazy_context().await;
    let records = vec![(
        "Science".to_string(),
        ResponseRecord::graded("Boiling point of water?".into(), "100C".into(), "100C".into()),
    )];

    let err = summarize(&ctx.state, records, NO_RESPONSES_SUMMARY).await.unwrap_err();

    assert!(matches!(err, ApiError::BadGateway(_)));
}

#[tokio::test]
async fn save_response_requires_responses() {
    let ctx = test_support::lazy_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/save_response",
            Some(json!({"subject": "Math", "grade_level": "5th", "responses": []})),
        ))
        .await
        .expect("save response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a local Postgres test database"]
async fn saved_responses_feed_the_class_report() {
    let ctx = test_support::db_context(vec![SUMMARY]).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/progress_report", None))
        .await
        .expect("empty report");
    let empty = test_support::read_json(response).await;
    assert_eq!(empty["summary"], "No responses recorded.");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/save_response",
            Some(json!({
                "subject": "Math",
                "grade_level": "5th",
                "responses": [
                    {"question": "What is 9 - 4?", "correct_answer": "5", "userAnswer": "5", "isCorrect": false},
                    {"question": "What is 12 / 3?", "correct_answer": "4", "user_answer": "3"}
                ]
            })),
        ))
        .await
        .expect("save response");
    let status = response.status();
    let saved = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {saved}");
    assert_eq!(saved["saved"], 2);
    assert_eq!(saved["correct"], 1);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/progress_report", None))
        .await
        .expect("report");
    let report = test_support::read_json(response).await;
    assert_eq!(report["summary"], SUMMARY);
    let prompts = ctx.completion.prompts();
    assert!(prompts[0].contains("Correct: True"));
    assert!(prompts[0].contains("Correct: False"));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, "/api/clear_data", None))
        .await
        .expect("clear");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/progress_report", None))
        .await
        .expect("report after clear");
    let cleared = test_support::read_json(response).await;
    assert_eq!(cleared["summary"], "No responses recorded.");
}

#[tokio::test]
#[ignore = "requires a local Postgres test database"]
async fn student_report_uses_submitted_assignments() {
    let ctx = test_support::db_context(vec![SUMMARY]).await;
    let ada = test_support::insert_student(ctx.state.db(), "Ada").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/get_student_progress_report/{}", ada.id),
            None,
        ))
        .await
        .expect("empty report");
    let empty = test_support::read_json(response).await;
    assert_eq!(empty["progress_report"], "No assignments found.");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/create_assignment",
            Some(json!({
                "title": "Quiz",
                "subject": "Math",
                "grade_level": "5th",
                "questions": [{"question": "What is 12 / 3?", "options": ["3", "4"], "correct_answer": "4"}],
                "student_ids": [ada.id]
            })),
        ))
        .await
        .expect("create");
    let created = test_support::read_json(response).await;
    let assignment_id = created["assignments"][0].as_i64().expect("assignment id");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/submit_assignment",
            Some(json!({
                "assignment_id": assignment_id,
                "student_id": ada.id,
                "responses": [{"question": "What is 12 / 3?", "correct_answer": "4", "user_answer": "3"}]
            })),
        ))
        .await
        .expect("submit");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/get_student_progress_report/{}", ada.id),
            None,
        ))
        .await
        .expect("report");
    let report = test_support::read_json(response).await;
    assert_eq!(report["name"], "Ada");
    assert_eq!(report["progress_report"], SUMMARY);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/get_student_progress_report/999",
            None,
        ))
        .await
        .expect("unknown student report");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/get_student_progress/999", None))
        .await
        .expect("unknown student progress");
    let status = response.status();
    let progress = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {progress}");
    assert_eq!(progress["summary"], "No assignments found.");
    assert_eq!(ctx.completion.prompts().len(), 1);
}
