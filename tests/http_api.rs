use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use cat_agency::api::{create_router, AppState};
use cat_agency::error::{AgencyError, Result};
use cat_agency::persistence::MemoryStore;
use cat_agency::services::BreedValidator;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct FixedBreeds(&'static [&'static str]);

#[async_trait]
impl BreedValidator for FixedBreeds {
    async fn is_known_breed(&self, breed: &str) -> Result<bool> {
        Ok(self.0.iter().any(|b| b.eq_ignore_ascii_case(breed)))
    }
}

struct BrokenBreeds;

#[async_trait]
impl BreedValidator for BrokenBreeds {
    async fn is_known_breed(&self, _breed: &str) -> Result<bool> {
        Err(AgencyError::ServiceUnavailable("connection refused".into()))
    }
}

fn app() -> Router {
    app_with(Some(Arc::new(FixedBreeds(&["Siamese", "Bengal"]))))
}

fn app_with(breeds: Option<Arc<dyn BreedValidator>>) -> Router {
    let state = AppState::from_store(Arc::new(MemoryStore::new()), breeds);
    create_router(state, None)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

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

async fn create_agent(app: &Router, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/agents",
        Some(json!({"name": name, "breed": "Siamese", "years_of_experience": 3, "salary": 1200})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

async fn create_mission(app: &Router, targets: Value) -> i64 {
    let (status, body) = send(app, Method::POST, "/missions", Some(json!({ "targets": targets }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn agent_crud_round_trip() {
    let app = app();
    let id = create_agent(&app, "Tom").await;

    let (status, agent) = send(&app, Method::GET, &format!("/agents/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(agent["name"], "Tom");
    assert_eq!(agent["breed"], "Siamese");

    let (status, agent) = send(
        &app,
        Method::PATCH,
        &format!("/agents/{id}"),
        Some(json!({"salary": 1750.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(agent["salary"], "1750.5");

    let (status, list) = send(&app, Method::GET, "/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/agents/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/agents/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "The requested resource does not exist.");
}

#[tokio::test]
async fn salary_outside_column_precision_is_bad_request() {
    let app = app();
    let id = create_agent(&app, "Tom").await;
    let uri = format!("/agents/{id}");

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"salary": "1750.555"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({"salary": "12345678901.5"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, agent) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(agent["salary"], "1200");
}

#[tokio::test]
async fn unknown_breed_is_bad_request() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/agents",
        Some(json!({"name": "Rex", "breed": "Dragon", "years_of_experience": 1, "salary": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("breed"));
}

#[tokio::test]
async fn breed_service_outage_is_bad_gateway() {
    let app = app_with(Some(Arc::new(BrokenBreeds)));
    let (status, _) = send(
        &app,
        Method::POST,
        "/agents",
        Some(json!({"name": "Rex", "breed": "Siamese", "years_of_experience": 1, "salary": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn malformed_bodies_are_bad_request() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/agents", Some(json!({"name": "Tom"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "The request body is invalid or missing required fields"
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/missions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/missions/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/agents/1.5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn target_cap_is_enforced() {
    let app = app();
    let id = create_mission(
        &app,
        json!([{"name": "A", "country": "X"}, {"name": "B", "country": "Y"}]),
    )
    .await;

    let uri = format!("/missions/{id}/targets");
    let (status, _) = send(&app, Method::POST, &uri, Some(json!({"name": "C", "country": "Z"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, &uri, Some(json!({"name": "D", "country": "W"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("maximum"));

    let (_, mission) = send(&app, Method::GET, &format!("/missions/{id}"), None).await;
    assert_eq!(mission["targets"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn too_many_initial_targets_is_rejected() {
    let app = app();
    let targets = json!([
        {"name": "A", "country": "X"},
        {"name": "B", "country": "X"},
        {"name": "C", "country": "X"},
        {"name": "D", "country": "X"}
    ]);
    let (status, _) = send(&app, Method::POST, "/missions", Some(json!({ "targets": targets }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mission_completion_flow() {
    let app = app();
    let id = create_mission(&app, json!([{"name": "A", "country": "X"}])).await;
    let (_, mission) = send(&app, Method::GET, &format!("/missions/{id}"), None).await;
    let target = mission["targets"][0]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/missions/{id}"),
        Some(json!({"complete": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let target_uri = format!("/missions/{id}/targets/{target}");
    let (status, updated) = send(
        &app,
        Method::PATCH,
        &target_uri,
        Some(json!({"notes": "spotted", "complete": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "spotted");

    let (status, _) = send(
        &app,
        Method::PATCH,
        &target_uri,
        Some(json!({"notes": "again", "complete": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, mission) = send(
        &app,
        Method::PATCH,
        &format!("/missions/{id}"),
        Some(json!({"complete": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mission["complete"], true);

    let (status, _) = send(&app, Method::DELETE, &target_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn assignment_rules() {
    let app = app();
    let agent = create_agent(&app, "Tom").await;
    let first = create_mission(&app, json!([])).await;
    let second = create_mission(&app, json!([])).await;

    let (status, mission) = send(
        &app,
        Method::PATCH,
        &format!("/missions/{first}"),
        Some(json!({"agent_id": agent})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mission["agent_id"], agent);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/missions/{second}"),
        Some(json!({"agent_id": agent})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already assigned"));

    let (status, _) = send(&app, Method::DELETE, &format!("/missions/{first}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, mission) = send(
        &app,
        Method::PATCH,
        &format!("/missions/{first}"),
        Some(json!({"agent_id": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(mission["agent_id"].is_null());

    let (status, _) = send(&app, Method::DELETE, &format!("/missions/{first}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/missions/{first}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_agent_unassigns_missions() {
    let app = app();
    let agent = create_agent(&app, "Tom").await;
    let mission = create_mission(&app, json!([])).await;
    send(
        &app,
        Method::PATCH,
        &format!("/missions/{mission}"),
        Some(json!({"agent_id": agent})),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, &format!("/agents/{agent}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, loaded) = send(&app, Method::GET, &format!("/missions/{mission}"), None).await;
    assert!(loaded["agent_id"].is_null());
    let (status, _) = send(&app, Method::DELETE, &format!("/missions/{mission}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn list_missions_omits_targets() {
    let app = app();
    create_mission(&app, json!([{"name": "A", "country": "X"}])).await;

    let (status, list) = send(&app, Method::GET, "/missions", None).await;
    assert_eq!(status, StatusCode::OK);
    let first = &list.as_array().unwrap()[0];
    assert_eq!(first["complete"], false);
    assert!(first.get("targets").is_none());
}

#[tokio::test]
async fn health_reports_connected_store() {
    let app = app_with(None);
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "connected");
}
