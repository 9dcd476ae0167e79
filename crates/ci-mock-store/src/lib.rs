//! # ci-mock Store
//!
//! In-memory fixture store backing the ci-mock HTTP node.
//!
//! The store holds one insertion-ordered table per [`Collection`] and answers
//! the handful of queries the route handlers need: lookup by id, lookup by
//! field match, shallow update and insert. Fixtures are seeded from YAML or
//! JSON documents ([`FixtureSet`]).
//!
//! ## Example
//!
//! ```rust
//! use ci_mock_store::{FixtureSet, FixtureStore};
//! use ci_mock_types::{Collection, Record};
//! use serde_json::json;
//!
//! let fixtures = FixtureSet::from_yaml_str(
//!     "branches:\n  - id: 1\n    name: master\n",
//! ).unwrap();
//! let store = FixtureStore::with_fixtures(fixtures).unwrap();
//!
//! store.insert(Collection::Builds, Record::new().with("branchId", 1)).unwrap();
//!
//! let branch = store
//!     .first_where(Collection::Branches, &[("name", json!("master"))])
//!     .unwrap();
//! let branch_id = branch.id().cloned().unwrap();
//! let builds = store.where_all(Collection::Builds, &[("branchId", branch_id)]);
//! assert_eq!(builds.len(), 1);
//! ```

pub mod error;
pub mod fixtures;
pub mod store;

pub use ci_mock_types::Collection;
pub use error::{Result, StoreError};
pub use fixtures::FixtureSet;
pub use store::{Condition, FixtureStore};
