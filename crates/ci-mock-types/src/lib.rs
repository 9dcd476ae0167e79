//! # ci-mock Types
//!
//! Common types shared by the ci-mock fixture store and HTTP node.
//!
//! - **Records**: schemaless fixture entities keyed by field name
//! - **Collections**: the fixed set of entity tables the mock backend serves
//! - **Envelopes**: the v3 response shape (`@type`, `@href`, `@pagination`)
//! - **Inflection**: English pluralization of entity type names
//!
//! ## Example
//!
//! ```rust
//! use ci_mock_types::{normalize, Envelope, Payload, Record};
//!
//! let repo = Record::with_id(1).with("slug", "travis-ci/travis-web");
//!
//! match normalize("repository", Payload::One(&repo)) {
//!     Envelope::Single(record) => {
//!         assert_eq!(record.get_str("@href"), Some("/repository/1"));
//!     }
//!     Envelope::Collection(_) => unreachable!(),
//! }
//!
//! // The stored record is never modified.
//! assert!(repo.get("@type").is_none());
//! ```

pub mod collection;
pub mod envelope;
pub mod error;
pub mod inflect;
pub mod record;

pub use collection::Collection;
pub use envelope::{
    normalize, normalize_many, normalize_one, CollectionEnvelope, Envelope, Pagination, Payload,
    HREF_KEY, PAGINATION_KEY, TYPE_KEY,
};
pub use error::{Result, TypesError};
pub use inflect::pluralize;
pub use record::{loosely_equal, value_text, Record, ID_FIELD};
