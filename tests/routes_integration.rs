//! End-to-end endpoint tests against the router with the in-memory backend.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use mission_control::api::Planet;
use mission_control::db::repositories::LocalRepository;
use mission_control::db::repository::FullRepository;
use mission_control::db::services;
use mission_control::http::{create_router, AppState};

fn test_app() -> (Router, Arc<LocalRepository>) {
    let repo = Arc::new(LocalRepository::new());
    let state = AppState::new(repo.clone() as Arc<dyn FullRepository>);
    (create_router(state), repo)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_scientist(app: &Router, name: &str, field_of_study: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/scientists",
        Some(json!({"name": name, "field_of_study": field_of_study})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn seed_planet(repo: &LocalRepository, name: &str) -> i64 {
    let summary = services::create_planet(
        repo,
        Planet {
            id: None,
            name: Some(name.to_string()),
            distance_from_earth: Some(225_000_000),
            nearest_star: Some("Sol".to_string()),
        },
    )
    .await
    .unwrap();
    summary.id.value()
}

#[tokio::test]
async fn landing_returns_empty_object() {
    let (app, _repo) = test_app();
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn health_reports_connected_store() {
    let (app, _repo) = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn create_scientist_returns_created_record() {
    let (app, _repo) = test_app();
    let body = create_scientist(&app, "Ada", "Physics").await;

    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["field_of_study"], "Physics");
    assert_eq!(body["missions"], json!([]));
}

#[tokio::test]
async fn create_scientist_without_field_of_study_persists_nothing() {
    let (app, _repo) = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/scientists",
        Some(json!({"name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());

    let (status, body) = send(&app, Method::GET, "/scientists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_scientist_with_empty_name_is_rejected() {
    let (app, _repo) = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/scientists",
        Some(json!({"name": "", "field_of_study": "Physics"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn list_scientists_returns_flat_summaries() {
    let (app, _repo) = test_app();
    create_scientist(&app, "Ada", "Physics").await;
    create_scientist(&app, "Mae", "Medicine").await;

    let (status, body) = send(&app, Method::GET, "/scientists", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "Ada");
    // Summaries carry no relations.
    assert!(list[0].get("missions").is_none());
}

#[tokio::test]
async fn get_scientist_by_id_returns_detail() {
    let (app, _repo) = test_app();
    let created = create_scientist(&app, "Ada", "Physics").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/scientists/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["missions"], json!([]));
}

#[tokio::test]
async fn get_unknown_scientist_returns_404() {
    let (app, _repo) = test_app();
    let (status, body) = send(&app, Method::GET, "/scientists/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn patch_nonexistent_scientist_returns_404() {
    let (app, _repo) = test_app();
    let (status, _body) = send(
        &app,
        Method::PATCH,
        "/scientists/999",
        Some(json!({"name": "Grace"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_unknown_field_aborts_without_partial_write() {
    let (app, _repo) = test_app();
    let created = create_scientist(&app, "Ada", "Physics").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/scientists/{id}"),
        Some(json!({"name": "Grace", "favorite_color": "teal"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid field: favorite_color");

    let (_, current) = send(&app, Method::GET, &format!("/scientists/{id}"), None).await;
    assert_eq!(current["name"], "Ada");
}

#[tokio::test]
async fn patch_empty_value_aborts_without_partial_write() {
    let (app, _repo) = test_app();
    let created = create_scientist(&app, "Ada", "Physics").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/scientists/{id}"),
        Some(json!({"name": "", "field_of_study": "Chemistry"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());

    let (_, current) = send(&app, Method::GET, &format!("/scientists/{id}"), None).await;
    assert_eq!(current["name"], "Ada");
    assert_eq!(current["field_of_study"], "Physics");
}

#[tokio::test]
async fn patch_known_fields_returns_202_with_updated_record() {
    let (app, _repo) = test_app();
    let created = create_scientist(&app, "Ada", "Physics").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/scientists/{id}"),
        Some(json!({"field_of_study": "Mathematics"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["field_of_study"], "Mathematics");
}

#[tokio::test]
async fn delete_scientist_removes_record_and_missions() {
    let (app, repo) = test_app();
    let created = create_scientist(&app, "Ada", "Physics").await;
    let id = created["id"].as_i64().unwrap();
    let planet_id = seed_planet(repo.as_ref(), "Mars").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/missions",
        Some(json!({"name": "Ares I", "scientist_id": id, "planet_id": planet_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::DELETE, &format!("/scientists/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &format!("/scientists/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The scientist's missions were deleted with it.
    let (_, missions) = send(&app, Method::GET, "/missions", None).await;
    assert_eq!(missions, json!([]));
}

#[tokio::test]
async fn delete_unknown_scientist_returns_404() {
    let (app, _repo) = test_app();
    let (status, _) = send(&app, Method::DELETE, "/scientists/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_planets_returns_summaries() {
    let (app, repo) = test_app();
    seed_planet(repo.as_ref(), "Mars").await;

    let (status, body) = send(&app, Method::GET, "/planets", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Mars");
    assert_eq!(list[0]["nearest_star"], "Sol");
    assert!(list[0].get("missions").is_none());
}

#[tokio::test]
async fn create_mission_without_scientist_id_is_rejected() {
    let (app, repo) = test_app();
    let planet_id = seed_planet(repo.as_ref(), "Mars").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/missions",
        Some(json!({"name": "Ares I", "planet_id": planet_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn create_mission_with_unknown_scientist_is_rejected() {
    let (app, repo) = test_app();
    let planet_id = seed_planet(repo.as_ref(), "Mars").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/missions",
        Some(json!({"name": "Ares I", "scientist_id": 999, "planet_id": planet_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn create_mission_expands_scientist_and_planet_without_back_references() {
    let (app, repo) = test_app();
    let created = create_scientist(&app, "Ada", "Physics").await;
    let scientist_id = created["id"].as_i64().unwrap();
    let planet_id = seed_planet(repo.as_ref(), "Mars").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/missions",
        Some(json!({"name": "Ares I", "scientist_id": scientist_id, "planet_id": planet_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "Ares I");
    assert_eq!(body["scientist"]["name"], "Ada");
    assert_eq!(body["planet"]["name"], "Mars");

    // The nested scientist must never expand its own mission list.
    assert!(body["scientist"].get("missions").is_none());
    assert!(body["planet"].get("missions").is_none());

    let (status, missions) = send(&app, Method::GET, "/missions", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = missions.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert!(list[0]["scientist"].get("missions").is_none());
}

#[tokio::test]
async fn scientist_detail_lists_missions_without_scientist_back_reference() {
    let (app, repo) = test_app();
    let created = create_scientist(&app, "Ada", "Physics").await;
    let scientist_id = created["id"].as_i64().unwrap();
    let planet_id = seed_planet(repo.as_ref(), "Mars").await;

    send(
        &app,
        Method::POST,
        "/missions",
        Some(json!({"name": "Ares I", "scientist_id": scientist_id, "planet_id": planet_id})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/scientists/{scientist_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let missions = body["missions"].as_array().unwrap();
    assert_eq!(missions.len(), 1);
    assert_eq!(missions[0]["name"], "Ares I");
    assert_eq!(missions[0]["planet"]["name"], "Mars");
    assert!(missions[0].get("scientist").is_none());
}
