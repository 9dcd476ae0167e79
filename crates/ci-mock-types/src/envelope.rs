//! v3 response envelopes.
//!
//! The web client's v3 adapter expects every record to carry `@type` and
//! `@href` metadata, and collections to be wrapped with a pluralized type, a
//! collection href and a `@pagination` summary:
//!
//! ```text
//! {
//!   "@type": "builds",
//!   "@href": "/builds",
//!   "builds": [ { "@type": "build", "@href": "/build/1", "id": 1, ... } ],
//!   "@pagination": { "count": 1 }
//! }
//! ```
//!
//! Normalization always works on copies; stored records are never tagged.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::inflect::pluralize;
use crate::record::{value_text, Record};

/// Envelope key holding the type tag.
pub const TYPE_KEY: &str = "@type";

/// Envelope key holding the resource href.
pub const HREF_KEY: &str = "@href";

/// Envelope key holding the pagination summary.
pub const PAGINATION_KEY: &str = "@pagination";

/// What a handler is normalizing: exactly one record, or a sequence.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    One(&'a Record),
    Many(&'a [Record]),
}

/// A normalized response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    /// A single tagged record.
    Single(Record),
    /// A tagged collection wrapper.
    Collection(CollectionEnvelope),
}

impl Envelope {
    /// The envelope's `@type`.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Envelope::Single(record) => record.get_str(TYPE_KEY),
            Envelope::Collection(collection) => Some(&collection.type_name),
        }
    }

    /// The envelope's `@href`.
    pub fn href(&self) -> Option<&str> {
        match self {
            Envelope::Single(record) => record.get_str(HREF_KEY),
            Envelope::Collection(collection) => Some(&collection.href),
        }
    }
}

/// Pagination summary attached to collection envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub count: usize,
}

/// A collection envelope.
///
/// Serialized with the items under a key named after the pluralized type, so
/// the serialization is written by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEnvelope {
    /// Pluralized type name; also the items key.
    pub type_name: String,
    /// Collection href, `"/" + type_name`.
    pub href: String,
    /// Tagged records, in input order.
    pub items: Vec<Record>,
    pub pagination: Pagination,
}

impl Serialize for CollectionEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(TYPE_KEY, &self.type_name)?;
        map.serialize_entry(HREF_KEY, &self.href)?;
        map.serialize_entry(&self.type_name, &self.items)?;
        map.serialize_entry(PAGINATION_KEY, &self.pagination)?;
        map.end()
    }
}

/// Normalize a payload under `type_name`.
pub fn normalize(type_name: &str, payload: Payload<'_>) -> Envelope {
    match payload {
        Payload::One(record) => Envelope::Single(normalize_one(type_name, record)),
        Payload::Many(records) => Envelope::Collection(normalize_many(type_name, records)),
    }
}

/// Tag a copy of `record` with `@type` and `@href`.
///
/// A record without an id gets an href with an empty id segment.
pub fn normalize_one(type_name: &str, record: &Record) -> Record {
    let id = record.id().and_then(value_text).unwrap_or_default();
    let mut tagged = record.clone();
    tagged.insert(TYPE_KEY, type_name);
    tagged.insert(HREF_KEY, format!("/{}/{}", type_name, id));
    tagged
}

/// Tag copies of every record and wrap them in a collection envelope.
pub fn normalize_many(type_name: &str, records: &[Record]) -> CollectionEnvelope {
    let plural = pluralize(type_name);
    let items: Vec<Record> = records
        .iter()
        .map(|record| normalize_one(type_name, record))
        .collect();

    CollectionEnvelope {
        href: format!("/{}", plural),
        pagination: Pagination { count: items.len() },
        type_name: plural,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn build(id: u64, number: &str) -> Record {
        Record::with_id(id).with("number", number).with("state", "passed")
    }

    #[test]
    fn test_single_record() {
        let repo = Record::with_id(1).with("slug", "travis-ci/travis-web");
        let envelope = normalize("repository", Payload::One(&repo));

        assert_eq!(envelope.type_name(), Some("repository"));
        assert_eq!(envelope.href(), Some("/repository/1"));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "id": 1,
                "slug": "travis-ci/travis-web",
                "@type": "repository",
                "@href": "/repository/1"
            })
        );
    }

    #[test]
    fn test_collection() {
        let builds = vec![build(2, "2"), build(1, "1")];
        let envelope = normalize("build", Payload::Many(&builds));

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "@type": "builds",
                "@href": "/builds",
                "builds": [
                    {"id": 2, "number": "2", "state": "passed", "@type": "build", "@href": "/build/2"},
                    {"id": 1, "number": "1", "state": "passed", "@type": "build", "@href": "/build/1"}
                ],
                "@pagination": {"count": 2}
            })
        );
    }

    #[test]
    fn test_empty_collection() {
        let envelope = normalize_many("build", &[]);
        assert_eq!(envelope.pagination.count, 0);
        assert_eq!(envelope.href, "/builds");
        assert!(envelope.items.is_empty());
    }

    #[test]
    fn test_already_plural_type_name() {
        let crons = vec![Record::with_id(5)];
        let envelope = normalize_many("crons", &crons);

        assert_eq!(envelope.type_name, "crons");
        assert_eq!(envelope.href, "/crons");
        assert_eq!(envelope.items[0].get_str(HREF_KEY), Some("/crons/5"));
    }

    #[test]
    fn test_missing_id_gives_empty_segment() {
        let record = Record::new().with("name", "orphan");
        let tagged = normalize_one("branch", &record);
        assert_eq!(tagged.get_str(HREF_KEY), Some("/branch/"));
    }

    #[test]
    fn test_renormalizing_under_another_type() {
        let record = Record::with_id(4);
        let first = normalize_one("build", &record);
        let second = normalize_one("job", &first);

        assert_eq!(second.get_str(TYPE_KEY), Some("job"));
        assert_eq!(second.get_str(HREF_KEY), Some("/job/4"));
        assert_eq!(second.len(), 3);
    }

    fn record_strategy() -> impl Strategy<Value = Record> {
        (
            prop_oneof![
                any::<u32>().prop_map(Value::from),
                "[a-z0-9]{1,8}".prop_map(Value::from),
            ],
            prop::collection::btree_map("[a-z_]{1,10}", "[ -~]{0,16}", 0..6),
        )
            .prop_map(|(id, fields)| {
                let mut record = Record::with_id(id);
                for (field, value) in fields {
                    if field != "id" {
                        record.insert(field, value);
                    }
                }
                record
            })
    }

    proptest! {
        /// Pagination count and hrefs follow the inputs.
        #[test]
        fn prop_collection_shape(
            type_name in prop_oneof![Just("build"), Just("repository"), Just("job"), Just("branch")],
            records in prop::collection::vec(record_strategy(), 0..20)
        ) {
            let envelope = normalize_many(type_name, &records);
            let plural = pluralize(type_name);

            prop_assert_eq!(envelope.pagination.count, records.len());
            prop_assert_eq!(&envelope.href, &format!("/{}", plural));
            prop_assert_eq!(&envelope.type_name, &plural);

            for (original, tagged) in records.iter().zip(envelope.items.iter()) {
                let expected = format!("/{}/{}", type_name, original.id_text().unwrap());
                prop_assert_eq!(tagged.get_str(HREF_KEY), Some(expected.as_str()));
                prop_assert_eq!(tagged.get_str(TYPE_KEY), Some(type_name));
            }
        }

        /// Original fields are preserved and the input is untouched.
        #[test]
        fn prop_single_preserves_fields(record in record_strategy()) {
            let before = record.clone();
            let tagged = normalize_one("job", &record);

            prop_assert_eq!(&record, &before);
            for (field, value) in record.fields() {
                prop_assert_eq!(tagged.get(field), Some(value));
            }
            prop_assert_eq!(tagged.len(), record.len() + 2);
        }
    }
}
