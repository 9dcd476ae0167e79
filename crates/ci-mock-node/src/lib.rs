//! # CI Mock Node
//!
//! Mock HTTP backend for a CI web client.
//!
//! The node serves canned fixture data in the shapes the client expects, so
//! the client can be developed and tested without a real CI backend. State
//! lives in an in-memory [`ci_mock_store::FixtureStore`] seeded from a
//! fixture file or the built-in scenario; a few routes mutate it.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                 HTTP API Layer                │
//! │  • Accounts, hooks, users, broadcasts         │
//! │  • Repositories, crons, settings, keys        │
//! │  • Builds, jobs, logs                         │
//! │  • /health and /metrics                       │
//! └───────────────────────────────────────────────┘
//!                        │
//! ┌───────────────────────────────────────────────┐
//! │   Envelope normalizer   │   Fixture store     │
//! │   (ci-mock-types)       │   (ci-mock-store)   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run --bin ci-mock-node -- --api-addr 127.0.0.1:8080
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Router, shared state and error mapping
//! - [`account_api`] - Accounts, hooks, users, permissions, broadcasts
//! - [`repo_api`] - Repositories, crons, branches, settings, keys
//! - [`build_api`] - Builds, jobs and logs
//! - [`auth`] - Token check for the user endpoint
//! - [`config`] - Layered server configuration
//! - [`observability`] - Structured logging, metrics, and request tracing
//!
//! ## Example: Serving the default scenario
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ci_mock_store::{FixtureSet, FixtureStore};
//! use ci_mock_node::api::{create_router, AppState};
//!
//! let fixtures = FixtureSet::default_scenario().unwrap();
//! let store = FixtureStore::with_fixtures(fixtures).unwrap();
//! let app = create_router(AppState::new(Arc::new(store)));
//! ```

pub mod account_api;
pub mod api;
pub mod auth;
pub mod build_api;
pub mod config;
pub mod observability;
pub mod repo_api;
