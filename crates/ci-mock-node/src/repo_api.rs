//! # Repository API
//!
//! Endpoints for repositories and the resources hanging off them.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/repos` | All repositories |
//! | GET | `/repo/{slug}` | Repository by slug, as a `repository` envelope |
//! | GET | `/v3/repo/{id}` | Repository by id, as a `repository` envelope |
//! | GET | `/v3/repo/{id}/crons` | The repository's crons, as a `crons` collection envelope |
//! | GET | `/v3/repo/{id}/branches` | All branches |
//! | GET | `/cron/{id}` | A cron, as a `crons` envelope |
//! | GET | `/repos/{id}/settings` | Repository settings |
//! | GET | `/repos/{id}/key` | Key and fingerprint of the default SSH key |
//! | GET | `/settings/env_vars?repository_id=` | Environment variables of a repository |
//! | GET | `/settings/ssh_key/{id}` | The repository's custom SSH key |
//!
//! Slugs contain a `/`, so `/repo/{slug}` takes the rest of the path; an
//! encoded `travis-ci%2Ftravis-web` resolves to the same repository.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use ci_mock_store::Collection;
use ci_mock_types::{normalize, Envelope, Payload, HREF_KEY};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiError, AppState};

const REPOSITORY_TYPE: &str = "repository";
const CRON_TYPE: &str = "crons";

/// Creates the repository API routes.
pub fn repo_routes() -> Router<AppState> {
    Router::new()
        .route("/repos", get(list_repositories))
        .route("/repo/{*slug}", get(get_repository_by_slug))
        .route("/v3/repo/{id}", get(get_repository))
        .route("/v3/repo/{id}/crons", get(list_crons))
        .route("/v3/repo/{id}/branches", get(list_branches))
        .route("/cron/{id}", get(get_cron))
        .route("/repos/{id}/settings", get(get_settings))
        .route("/repos/{id}/key", get(get_default_key))
        .route("/settings/env_vars", get(list_env_vars))
        .route("/settings/ssh_key/{id}", get(get_custom_ssh_key))
}

/// Query parameters for listing environment variables.
#[derive(Debug, Deserialize)]
pub struct EnvVarsQuery {
    pub repository_id: Option<String>,
}

async fn list_repositories(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "repositories": state.fixtures.all(Collection::Repositories) }))
}

async fn get_repository_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let repository = state
        .fixtures
        .get_where(Collection::Repositories, &[("slug", Value::String(slug))])?;
    Ok(Json(normalize(REPOSITORY_TYPE, Payload::One(&repository))))
}

async fn get_repository(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let repository = state.fixtures.get(Collection::Repositories, &id)?;
    Ok(Json(normalize(REPOSITORY_TYPE, Payload::One(&repository))))
}

async fn list_crons(State(state): State<AppState>, Path(id): Path<String>) -> Json<Envelope> {
    let crons: Vec<_> = state
        .fixtures
        .where_all(Collection::Crons, &[("repositoryId", Value::String(id))])
        .into_iter()
        .map(|mut cron| {
            let branch = cron.get("branchId").cloned().unwrap_or(Value::Null);
            cron.insert("branch", json!({ HREF_KEY: branch }));
            cron
        })
        .collect();

    Json(normalize(CRON_TYPE, Payload::Many(&crons)))
}

async fn list_branches(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "branches": state.fixtures.all(Collection::Branches) }))
}

async fn get_cron(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope>, ApiError> {
    let cron = state
        .fixtures
        .find(Collection::Crons, &id)
        .ok_or_else(|| ApiError::NotFound(format!("cron {}", id)))?;
    Ok(Json(normalize(CRON_TYPE, Payload::One(&cron))))
}

async fn get_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let settings = state
        .fixtures
        .get_where(Collection::Settings, &[("repositoryId", Value::String(id))])?;
    Ok(Json(json!({ "settings": settings })))
}

async fn get_default_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let key = state.fixtures.get_where(
        Collection::SshKeys,
        &[("repositoryId", Value::String(id)), ("type", json!("default"))],
    )?;

    Ok(Json(json!({
        "key": key.get("key").cloned().unwrap_or(Value::Null),
        "fingerprint": key.get("fingerprint").cloned().unwrap_or(Value::Null),
    })))
}

async fn list_env_vars(
    State(state): State<AppState>,
    Query(query): Query<EnvVarsQuery>,
) -> Json<Value> {
    let env_vars = match query.repository_id {
        Some(repository_id) => state.fixtures.where_all(
            Collection::EnvVars,
            &[("repositoryId", Value::String(repository_id))],
        ),
        None => state.fixtures.all(Collection::EnvVars),
    };

    let env_vars: Vec<_> = env_vars
        .into_iter()
        .map(|mut env_var| {
            let repository_id = env_var.get("repositoryId").cloned().unwrap_or(Value::Null);
            env_var.insert("repository_id", repository_id);
            env_var
        })
        .collect();

    Json(json!({ "env_vars": env_vars }))
}

async fn get_custom_ssh_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let key = state.fixtures.get_where(
        Collection::SshKeys,
        &[("repositoryId", Value::String(id)), ("type", json!("custom"))],
    )?;
    Ok(Json(json!({ "ssh_key": key })))
}
