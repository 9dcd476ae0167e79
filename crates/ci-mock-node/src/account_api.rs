//! # Account API
//!
//! Endpoints for the signed-in user and the accounts they can see.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/accounts` | Users (tagged `type: "user"`) followed by organization accounts |
//! | GET | `/hooks?owner_name=` | Hooks owned by an account |
//! | PUT | `/hooks/{id}` | Shallow-merge the body's `hook` object into a hook |
//! | GET | `/users/{id}` | A user; requires `Authorization: token <token>` |
//! | GET | `/users/permissions` | The permissions record |
//! | GET | `/v3/broadcasts` | Always empty |
//!
//! ## Example: Deactivating a hook
//!
//! ```bash
//! curl -X PUT http://localhost:8080/hooks/1 \
//!   -H "Content-Type: application/json" \
//!   -d '{"hook": {"active": false}}'
//! ```

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, put},
    Json, Router,
};
use ci_mock_store::Collection;
use ci_mock_types::Record;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::{ApiError, AppState};
use crate::auth::require_token;

/// Id of the permissions record served by `/users/permissions`.
const PERMISSIONS_ID: &str = "1";

/// Creates the account API routes.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/hooks", get(list_hooks))
        .route("/hooks/{id}", put(update_hook))
        .route("/users/permissions", get(get_permissions))
        .route("/users/{id}", get(get_user))
        .route("/v3/broadcasts", get(list_broadcasts))
}

// ==================== Request Types ====================

/// Query parameters for listing hooks.
#[derive(Debug, Deserialize)]
pub struct ListHooksQuery {
    pub owner_name: Option<String>,
}

/// Request to update a hook.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateHookRequest {
    #[serde(default)]
    pub hook: Map<String, Value>,
}

// ==================== Handlers ====================

async fn list_accounts(State(state): State<AppState>) -> Json<Value> {
    let users = state
        .fixtures
        .all(Collection::Users)
        .into_iter()
        .map(|mut user| {
            user.insert("type", "user");
            user
        });
    let accounts: Vec<Record> = users
        .chain(state.fixtures.all(Collection::Accounts))
        .collect();

    Json(json!({ "accounts": accounts }))
}

async fn list_hooks(
    State(state): State<AppState>,
    Query(query): Query<ListHooksQuery>,
) -> Json<Value> {
    let hooks = match query.owner_name {
        Some(owner) => state
            .fixtures
            .where_all(Collection::Hooks, &[("owner_name", Value::String(owner))]),
        None => state.fixtures.all(Collection::Hooks),
    };

    Json(json!({ "hooks": hooks }))
}

async fn update_hook(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateHookRequest>,
) -> Result<Json<Value>, ApiError> {
    let hook = state.fixtures.update(Collection::Hooks, &id, &req.hook)?;

    if state.options.hook_update_creates_repository {
        let id_value = hook.id().cloned().unwrap_or(Value::String(id));
        let (repository, created) = state
            .fixtures
            .insert_if_absent(Collection::Repositories, Record::with_id(id_value))?;
        if created {
            tracing::info!(id = ?repository.id(), "Repository created for hook");
        }
    }

    Ok(Json(json!({ "hook": hook })))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_token(&headers, &state.options.auth_token)?;

    let user = state.fixtures.get(Collection::Users, &id)?;
    Ok(Json(json!({ "user": user })))
}

async fn get_permissions(State(state): State<AppState>) -> Result<Json<Record>, ApiError> {
    let permissions = state.fixtures.get(Collection::Permissions, PERMISSIONS_ID)?;
    Ok(Json(permissions))
}

async fn list_broadcasts() -> Json<Value> {
    Json(json!({ "broadcasts": [] }))
}
