//! # Observability Module
//!
//! - **Structured Logging**: pretty or JSON logs, filtered by level or `RUST_LOG`
//! - **Prometheus Metrics**: HTTP request counts and latency
//! - **Request Tracing**: request IDs on every span and response
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::Router;
//! use ci_mock_node::observability::{init_logging, request_id_middleware, LogFormat};
//!
//! init_logging("info", LogFormat::Json);
//!
//! let app: Router<()> =
//!     Router::new().layer(axum::middleware::from_fn(request_id_middleware));
//! ```

mod logging;
mod metrics;
pub mod middleware;

pub use logging::{init_logging, LogFormat};
pub use metrics::{MetricsState, METRICS, UNMATCHED_PATH};
pub use middleware::{
    metrics_handler, metrics_middleware, request_id_middleware, REQUEST_ID_HEADER,
};
