//! # Build API
//!
//! Endpoints for builds, their jobs, and job logs.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/builds` | All builds plus all commits |
//! | GET | `/builds/{id}` | A build with its jobs and commit |
//! | POST | `/builds/{id}/restart` | Acknowledge a restart |
//! | GET | `/jobs` | All jobs |
//! | GET | `/jobs/{id}` | A job with its commit |
//! | GET | `/jobs/{id}/log` | The job log as a single part |
//! | GET | `/v3/repo/{id}/builds?branch.name=` | Builds of a branch, newest first, as a `build` collection envelope |
//!
//! A build's commit is the first entry of its `commitIds` that names a stored
//! commit. Resolved builds carry it as `commit_id`.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use ci_mock_store::{Collection, FixtureStore};
use ci_mock_types::{normalize, value_text, Envelope, Payload, Record};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiError, AppState};

const BUILD_TYPE: &str = "build";
const RESTART_NOTICE: &str = "The build was successfully restarted.";

/// Creates the build API routes.
pub fn build_routes() -> Router<AppState> {
    Router::new()
        .route("/builds", get(list_builds))
        .route("/builds/{id}", get(get_build))
        .route("/builds/{id}/restart", post(restart_build))
        .route("/jobs", get(list_jobs))
        .route("/jobs/{id}", get(get_job))
        .route("/jobs/{id}/log", get(get_job_log))
        .route("/v3/repo/{id}/builds", get(list_branch_builds))
}

/// Query parameters for listing the builds of a branch.
#[derive(Debug, Deserialize)]
pub struct BranchBuildsQuery {
    #[serde(rename = "branch.name")]
    pub branch_name: Option<String>,
}

/// The commit a build points at, if any of its commit ids resolve.
fn resolve_commit(store: &FixtureStore, build: &Record) -> Option<Record> {
    let candidates: Vec<&Value> = match build.get("commitIds") {
        Some(Value::Array(ids)) => ids.iter().collect(),
        _ => build
            .get("commitId")
            .or_else(|| build.get("commit_id"))
            .into_iter()
            .collect(),
    };

    candidates
        .into_iter()
        .filter_map(value_text)
        .find_map(|id| store.find(Collection::Commits, &id))
}

/// Resolve the build's commit and record its id on the build as `commit_id`.
fn attach_commit(store: &FixtureStore, build: &mut Record) -> Option<Record> {
    let commit = resolve_commit(store, build)?;
    if let Some(id) = commit.id() {
        build.insert("commit_id", id.clone());
    }
    Some(commit)
}

async fn list_builds(State(state): State<AppState>) -> Json<Value> {
    let store = &state.fixtures;
    let builds: Vec<Record> = store
        .all(Collection::Builds)
        .into_iter()
        .map(|mut build| {
            attach_commit(store, &mut build);
            build
        })
        .collect();

    Json(json!({
        "builds": builds,
        "commits": store.all(Collection::Commits),
    }))
}

async fn get_build(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let store = &state.fixtures;
    let mut build = store.get(Collection::Builds, &id)?;
    let jobs = store.where_all(Collection::Jobs, &[("build_id", Value::String(id))]);
    let commit = attach_commit(store, &mut build);

    Ok(Json(json!({
        "build": build,
        "jobs": jobs,
        "commit": commit,
    })))
}

async fn restart_build(Path(id): Path<String>) -> Json<Value> {
    tracing::info!(build = %id, "Build restart requested");
    Json(json!({
        "flash": [{ "notice": RESTART_NOTICE }],
        "result": true,
    }))
}

async fn list_jobs(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "jobs": state.fixtures.all(Collection::Jobs) }))
}

async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let store = &state.fixtures;
    let job = store.get(Collection::Jobs, &id)?;
    let commit = job
        .get("commit_id")
        .and_then(value_text)
        .and_then(|commit_id| store.find(Collection::Commits, &commit_id));

    Ok(Json(json!({ "job": job, "commit": commit })))
}

async fn get_job_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let log = state
        .fixtures
        .find(Collection::Logs, &id)
        .ok_or_else(|| ApiError::NotFound(format!("log {}", id)))?;

    Ok(Json(json!({
        "log": {
            "parts": [{
                "id": log.id().cloned().unwrap_or(Value::Null),
                "number": 1,
                "content": log.get("content").cloned().unwrap_or(Value::Null),
            }]
        }
    })))
}

async fn list_branch_builds(
    State(state): State<AppState>,
    Query(query): Query<BranchBuildsQuery>,
) -> Result<Json<Envelope>, ApiError> {
    let store = &state.fixtures;
    let name = query
        .branch_name
        .ok_or_else(|| ApiError::NotFound("branch.name not given".into()))?;
    let branch = store.get_where(Collection::Branches, &[("name", Value::String(name))])?;
    let branch_id = branch.id().cloned().unwrap_or(Value::Null);

    let mut builds = store.where_all(Collection::Builds, &[("branchId", branch_id)]);
    builds.reverse();

    Ok(Json(normalize(BUILD_TYPE, Payload::Many(&builds))))
}
