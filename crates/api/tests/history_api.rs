//! HTTP-level integration tests for the content history endpoints.
//!
//! Runs against the full middleware stack with an in-memory history store,
//! covering authentication, role enforcement, snapshot creation, history
//! listing, comparison, and point lookup.

mod common;

use axum::http::StatusCode;
use common::{
    assert_status_json, body_json, build_test_app, get, get_auth, make_token, post_json_auth,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Authentication and authorization
// ---------------------------------------------------------------------------

/// Requests without an Authorization header are rejected with 401.
#[tokio::test]
async fn missing_token_returns_401() {
    let app = build_test_app();
    let response = get(app, "/api/v1/topics/1/history").await;

    let json = assert_status_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

/// A garbage token is rejected with 401.
#[tokio::test]
async fn invalid_token_returns_401() {
    let app = build_test_app();
    let response = get_auth(app, "/api/v1/topics/1/history", "not-a-real-token").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Students can authenticate but may not read history.
#[tokio::test]
async fn student_role_returns_403() {
    let app = build_test_app();
    let token = make_token(7, "Sam Student", "student");
    let response = get_auth(app, "/api/v1/topics/1/history", &token).await;

    let json = assert_status_json(response, StatusCode::FORBIDDEN).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

/// A token carrying a role this service does not know is rejected with 403.
#[tokio::test]
async fn unknown_role_returns_403() {
    let app = build_test_app();
    let token = make_token(7, "Mallory", "superuser");
    let response = get_auth(app, "/api/v1/topics/1/history", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Students may not create snapshots either.
#[tokio::test]
async fn student_cannot_create_snapshot() {
    let app = build_test_app();
    let token = make_token(7, "Sam Student", "student");
    let body = json!({
        "action": "create",
        "data": { "title": "Algebra I" },
    });
    let response = post_json_auth(app, "/api/v1/topics/1/snapshot", &token, body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Snapshot creation and history listing
// ---------------------------------------------------------------------------

/// An editor records two topic edits; the history lists both, newest first,
/// with dense version numbers and the editor's identity denormalized in.
#[tokio::test]
async fn snapshot_then_history_roundtrip() {
    let app = build_test_app();
    let token = make_token(12, "Eve Editor", "teacher_editor");

    let create = json!({
        "action": "create",
        "data": { "title": "Algebra I", "summary": "Linear equations" },
    });
    let response = post_json_auth(app.clone(), "/api/v1/topics/5/snapshot", &token, create).await;
    let created = assert_status_json(response, StatusCode::CREATED).await;
    assert_eq!(created["data"]["topic_record"]["version"], 1);
    assert_eq!(created["data"]["topic_record"]["subject_type"], "topic");

    let update = json!({
        "action": "update",
        "data": { "title": "Algebra I", "summary": "Linear equations" },
        "changes": { "summary": "Linear and quadratic equations" },
    });
    let response = post_json_auth(app.clone(), "/api/v1/topics/5/snapshot", &token, update).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app, "/api/v1/topics/5/history", &token).await;
    let json = assert_status_json(response, StatusCode::OK).await;

    let records = json["data"].as_array().expect("data should be an array");
    assert_eq!(records.len(), 2);
    // Newest first.
    assert_eq!(records[0]["version"], 2);
    assert_eq!(records[1]["version"], 1);
    assert_eq!(records[0]["action"], "update");
    assert_eq!(records[0]["edited_by_id"], 12);
    assert_eq!(records[0]["edited_by_name"], "Eve Editor");
    assert_eq!(records[0]["edited_by_role"], "teacher_editor");
    assert_eq!(
        records[0]["current_data"]["summary"],
        "Linear and quadratic equations"
    );
}

/// A subject that was never snapshotted has an empty history, not a 404.
#[tokio::test]
async fn unsnapshotted_subject_has_empty_history() {
    let app = build_test_app();
    let token = make_token(1, "Ada Admin", "admin");
    let response = get_auth(app, "/api/v1/resources/999/history", &token).await;

    let json = assert_status_json(response, StatusCode::OK).await;
    assert_eq!(json["data"], json!([]));
}

/// A snapshot with neither previous data nor changes is rejected with 400.
#[tokio::test]
async fn empty_snapshot_is_rejected() {
    let app = build_test_app();
    let token = make_token(1, "Ada Admin", "admin");
    let body = json!({
        "action": "update",
        "data": {},
    });
    let response = post_json_auth(app, "/api/v1/topics/5/snapshot", &token, body).await;

    let json = assert_status_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// Child records carry the topic record's id as their group key and get
/// their own per-subject version sequences.
#[tokio::test]
async fn snapshot_groups_children_under_topic_record() {
    let app = build_test_app();
    let token = make_token(12, "Eve Editor", "teacher_editor");

    let body = json!({
        "action": "update",
        "data": { "title": "Algebra I" },
        "changes": { "title": "Algebra I (revised)" },
        "resources": [
            { "id": 31, "data": { "url": "https://example.org/worksheet.pdf" } }
        ],
        "activities": [
            { "id": 44, "data": { "kind": "quiz", "questions": 10 } }
        ],
    });
    let response = post_json_auth(app.clone(), "/api/v1/topics/5/snapshot", &token, body).await;
    let json = assert_status_json(response, StatusCode::CREATED).await;

    let topic_id = json["data"]["topic_record"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["topic_record"]["group_key"], json!(null));

    let resources = json["data"]["resource_records"].as_array().unwrap();
    let activities = json["data"]["activity_records"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(activities.len(), 1);
    assert_eq!(resources[0]["group_key"], topic_id);
    assert_eq!(activities[0]["group_key"], topic_id);
    assert_eq!(resources[0]["version"], 1);

    // Children are also visible through their own ledgers.
    let response = get_auth(app, "/api/v1/activities/44/history", &token).await;
    let json = assert_status_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Comparing two versions reports field-level from/to differences.
#[tokio::test]
async fn compare_versions_reports_differences() {
    let app = build_test_app();
    let token = make_token(1, "Ada Admin", "admin");

    let v1 = json!({
        "action": "create",
        "data": { "title": "Cells", "level": 1 },
    });
    let v2 = json!({
        "action": "update",
        "data": { "title": "Cells", "level": 1 },
        "changes": { "level": 2 },
    });
    post_json_auth(app.clone(), "/api/v1/topics/9/snapshot", &token, v1).await;
    post_json_auth(app.clone(), "/api/v1/topics/9/snapshot", &token, v2).await;

    let response = get_auth(
        app,
        "/api/v1/topics/9/history/compare?from=1&to=2",
        &token,
    )
    .await;
    let json = assert_status_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["subject_id"], 9);
    assert_eq!(json["data"]["record_a"]["version"], 1);
    assert_eq!(json["data"]["record_b"]["version"], 2);
    assert_eq!(json["data"]["differences"]["level"]["from"], 1);
    assert_eq!(json["data"]["differences"]["level"]["to"], 2);
    // Unchanged fields are not reported.
    assert!(json["data"]["differences"].get("title").is_none());
}

/// Comparing against a version that does not exist returns 404.
#[tokio::test]
async fn compare_missing_version_returns_404() {
    let app = build_test_app();
    let token = make_token(1, "Ada Admin", "admin");

    let v1 = json!({ "action": "create", "data": { "title": "Cells" } });
    post_json_auth(app.clone(), "/api/v1/topics/9/snapshot", &token, v1).await;

    let response = get_auth(
        app,
        "/api/v1/topics/9/history/compare?from=1&to=2",
        &token,
    )
    .await;
    let json = assert_status_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

/// Version numbers below 1 fail query validation with 400.
#[tokio::test]
async fn compare_rejects_non_positive_versions() {
    let app = build_test_app();
    let token = make_token(1, "Ada Admin", "admin");

    let response = get_auth(
        app,
        "/api/v1/topics/9/history/compare?from=0&to=1",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Point lookup
// ---------------------------------------------------------------------------

/// A record fetched by id matches the one returned at creation.
#[tokio::test]
async fn get_version_by_id_returns_record() {
    let app = build_test_app();
    let token = make_token(1, "Ada Admin", "admin");

    let body = json!({ "action": "create", "data": { "title": "Cells" } });
    let response = post_json_auth(app.clone(), "/api/v1/topics/9/snapshot", &token, body).await;
    let created = body_json(response).await;
    let record_id = created["data"]["topic_record"]["id"].as_i64().unwrap();

    let response = get_auth(app, &format!("/api/v1/history/{record_id}"), &token).await;
    let json = assert_status_json(response, StatusCode::OK).await;

    assert_eq!(json["data"]["id"], record_id);
    assert_eq!(json["data"]["subject_type"], "topic");
    assert_eq!(json["data"]["version"], 1);
}

/// Fetching an id that was never assigned returns 404.
#[tokio::test]
async fn get_version_by_unknown_id_returns_404() {
    let app = build_test_app();
    let token = make_token(1, "Ada Admin", "admin");
    let response = get_auth(app, "/api/v1/history/123456", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// General HTTP behaviour
// ---------------------------------------------------------------------------

/// Unknown routes fall through to 404.
#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Every response carries an x-request-id header set by the middleware.
#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app();
    let token = make_token(1, "Ada Admin", "admin");
    let response = get_auth(app, "/api/v1/topics/1/history", &token).await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response must carry x-request-id");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
