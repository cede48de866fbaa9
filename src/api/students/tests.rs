use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::test_support;

#[tokio::test]
async fn add_student_rejects_blank_name() {
    let ctx = test_support::lazy_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/add_student",
            Some(json!({"name": "  "})),
        ))
        .await
        .expect("add student");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "name must not be blank");
}

#[tokio::test]
#[ignore = "requires a local Postgres test database"]
async fn students_and_scores() {
    let ctx = test_support::db_context(Vec::new()).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/add_student",
            Some(json!({"name": " Grace "})),
        ))
        .await
        .expect("add student");
    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["student"]["name"], "Grace");
    let student_id = created["student"]["id"].as_i64().expect("student id");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/get_students", None))
        .await
        .expect("list students");
    let students = test_support::read_json(response).await;
    assert_eq!(students.as_array().expect("students").len(), 1);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/get_student_scores/{student_id}"),
            None,
        ))
        .await
        .expect("scores");
    let status = response.status();
    let scores = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {scores}");
    assert_eq!(scores["name"], "Grace");
    assert_eq!(scores["assignments"], json!([]));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/get_student_assignments/{student_id}"),
            None,
        ))
        .await
        .expect("assignments");
    assert_eq!(test_support::read_json(response).await, json!([]));

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/get_student_scores/777", None))
        .await
        .expect("unknown scores");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
