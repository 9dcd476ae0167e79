//! HTTP API for the mock node.
//!
//! Builds the router from the route groups, and owns the shared state and
//! error mapping every handler uses.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ci_mock_store::{FixtureStore, StoreError};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{ServerConfig, DEFAULT_AUTH_TOKEN};
use crate::observability::{metrics_handler, metrics_middleware, request_id_middleware};
use crate::{account_api, build_api, repo_api};

/// Behaviour switches for the handlers.
#[derive(Debug, Clone)]
pub struct ApiOptions {
    /// Token accepted by `GET /users/{id}`.
    pub auth_token: String,
    /// `PUT /hooks/{id}` also ensures a repository with the hook's id exists.
    pub hook_update_creates_repository: bool,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
            hook_update_creates_repository: true,
            cors: true,
        }
    }
}

impl From<&ServerConfig> for ApiOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            auth_token: config.auth_token.clone(),
            hook_update_creates_repository: config.hook_update_creates_repository,
            cors: config.cors,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Fixture store.
    pub fixtures: Arc<FixtureStore>,
    /// Handler options.
    pub options: Arc<ApiOptions>,
}

impl AppState {
    /// Create state over a store with default options.
    pub fn new(fixtures: Arc<FixtureStore>) -> Self {
        Self::with_options(fixtures, ApiOptions::default())
    }

    /// Create state over a store with explicit options.
    pub fn with_options(fixtures: Arc<FixtureStore>, options: ApiOptions) -> Self {
        Self {
            fixtures,
            options: Arc::new(options),
        }
    }
}

/// API error type.
///
/// Every error renders as an empty JSON object with the matching status; the
/// detail only goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// The HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(e) => StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({}))).into_response()
    }
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = state.options.cors;

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .merge(account_api::account_routes())
        .merge(repo_api::repo_routes())
        .merge(build_api::build_routes())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "fixtures": state.fixtures.stats(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ci_mock_store::Collection;

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            ApiError::Forbidden("token".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("cron 9".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );

        let missing = ApiError::from(StoreError::NotFound {
            collection: Collection::Jobs,
            id: "4".into(),
        });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let duplicate = ApiError::from(StoreError::DuplicateId {
            collection: Collection::Jobs,
            id: "4".into(),
        });
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_options_from_config() {
        let config = ServerConfig {
            auth_token: "other".into(),
            hook_update_creates_repository: false,
            ..ServerConfig::default()
        };
        let options = ApiOptions::from(&config);
        assert_eq!(options.auth_token, "other");
        assert!(!options.hook_update_creates_repository);
        assert!(options.cors);
    }
}
