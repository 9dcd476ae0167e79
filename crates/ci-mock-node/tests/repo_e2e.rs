//! End-to-end tests for the repository endpoints (repos, crons, settings, keys).

use axum::{body::Body, http::Request};
use ci_mock_node::api::{create_router, AppState};
use ci_mock_store::{FixtureSet, FixtureStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_app() -> axum::Router {
    let fixtures = FixtureSet::default_scenario().unwrap();
    let store = FixtureStore::with_fixtures(fixtures).unwrap();
    create_router(AppState::new(Arc::new(store)))
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ==================== Repositories ====================

#[tokio::test]
async fn test_list_repositories() {
    let app = create_test_app();

    let response = app.oneshot(get("/repos")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body = json_body(response).await;
    let repositories = body["repositories"].as_array().unwrap();
    assert_eq!(repositories.len(), 2);
    assert_eq!(repositories[0]["slug"], "travis-ci/travis-web");
}

#[tokio::test]
async fn test_repository_by_slug() {
    let app = create_test_app();

    for uri in ["/repo/travis-ci/travis-api", "/repo/travis-ci%2Ftravis-api"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), 200, "uri {}", uri);

        let body = json_body(response).await;
        assert_eq!(body["@type"], "repository");
        assert_eq!(body["@href"], "/repository/2");
        assert_eq!(body["slug"], "travis-ci/travis-api");
        assert_eq!(body["name"], "travis-api");
    }
}

#[tokio::test]
async fn test_repository_by_unknown_slug() {
    let app = create_test_app();

    let response = app.oneshot(get("/repo/nobody/nothing")).await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(json_body(response).await, json!({}));
}

#[tokio::test]
async fn test_v3_repository() {
    let app = create_test_app();

    let response = app.clone().oneshot(get("/v3/repo/1")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["@type"], "repository");
    assert_eq!(body["@href"], "/repository/1");
    assert_eq!(body["id"], 1);

    let response = app.oneshot(get("/v3/repo/42")).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_repository_envelope_is_repeatable() {
    let app = create_test_app();

    let first = json_body(app.clone().oneshot(get("/v3/repo/1")).await.unwrap()).await;
    let second = json_body(app.oneshot(get("/v3/repo/1")).await.unwrap()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_branches() {
    let app = create_test_app();

    let response = app.oneshot(get("/v3/repo/1/branches")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    let branches = body["branches"].as_array().unwrap();
    assert_eq!(branches.len(), 2);
    assert_eq!(branches[0]["name"], "master");
}

// ==================== Crons ====================

#[tokio::test]
async fn test_repository_crons_envelope() {
    let app = create_test_app();

    let response = app.oneshot(get("/v3/repo/1/crons")).await.unwrap();
    assert_eq!(response.status(), 200);

    let body = json_body(response).await;
    assert_eq!(body["@type"], "crons");
    assert_eq!(body["@href"], "/crons");
    assert_eq!(body["@pagination"]["count"], 2);

    let crons = body["crons"].as_array().unwrap();
    assert_eq!(crons.len(), 2);
    assert_eq!(crons[0]["@type"], "crons");
    assert_eq!(crons[0]["@href"], "/crons/1");
    assert_eq!(crons[0]["branch"], json!({ "@href": 1 }));
    assert_eq!(crons[1]["branch"], json!({ "@href": 2 }));
}

#[tokio::test]
async fn test_repository_without_crons() {
    let app = create_test_app();

    let response = app.oneshot(get("/v3/repo/2/crons")).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["@pagination"]["count"], 0);
    assert_eq!(body["crons"], json!([]));
}

#[tokio::test]
async fn test_get_cron() {
    let app = create_test_app();

    let response = app.oneshot(get("/cron/2")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["@type"], "crons");
    assert_eq!(body["@href"], "/crons/2");
    assert_eq!(body["interval"], "weekly");
}

#[tokio::test]
async fn test_get_unknown_cron() {
    let app = create_test_app();

    let response = app.oneshot(get("/cron/99")).await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(json_body(response).await, json!({}));
}

// ==================== Settings ====================

#[tokio::test]
async fn test_repository_settings() {
    let app = create_test_app();

    let response = app.oneshot(get("/repos/2/settings")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["settings"]["repositoryId"], 2);
    assert_eq!(body["settings"]["build_pull_requests"], false);
}

#[tokio::test]
async fn test_env_vars_for_repository() {
    let app = create_test_app();

    let response = app
        .oneshot(get("/settings/env_vars?repository_id=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = json_body(response).await;
    let env_vars = body["env_vars"].as_array().unwrap();
    assert_eq!(env_vars.len(), 2);
    assert!(env_vars.iter().all(|v| v["repository_id"] == 1));
    assert_eq!(env_vars[0]["name"], "DRIVER");
}

#[tokio::test]
async fn test_custom_ssh_key() {
    let app = create_test_app();

    let response = app.clone().oneshot(get("/settings/ssh_key/1")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(body["ssh_key"]["type"], "custom");
    assert_eq!(body["ssh_key"]["description"], "Deploy key");

    let response = app.oneshot(get("/settings/ssh_key/2")).await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_default_key() {
    let app = create_test_app();

    let response = app.oneshot(get("/repos/1/key")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body = json_body(response).await;
    assert_eq!(
        body["fingerprint"],
        "aa:bb:cc:dd:ee:ff:00:11:22:33:44:55:66:77:88:99"
    );
    assert!(body["key"].as_str().unwrap().contains("BEGIN PUBLIC KEY"));
    assert_eq!(body.as_object().unwrap().len(), 2);
}
