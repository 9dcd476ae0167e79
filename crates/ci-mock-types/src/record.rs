//! Fixture records.
//!
//! A [`Record`] is one fixture entity (a user, a build, a log...). Records are
//! schemaless: fields are whatever the fixture data declares. Ids may be JSON
//! strings or numbers, so every id and field comparison goes through the
//! value's textual form ([`value_text`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, TypesError};

/// Name of the identifying field.
pub const ID_FIELD: &str = "id";

/// One fixture entity: a mapping from field name to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record holding only an id.
    pub fn with_id(id: impl Into<Value>) -> Self {
        Self::new().with(ID_FIELD, id)
    }

    /// Builder-style field assignment.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Convert a JSON value into a record. Only objects are records.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(TypesError::NotAnObject("null")),
            Value::Bool(_) => Err(TypesError::NotAnObject("bool")),
            Value::Number(_) => Err(TypesError::NotAnObject("number")),
            Value::String(_) => Err(TypesError::NotAnObject("string")),
            Value::Array(_) => Err(TypesError::NotAnObject("array")),
        }
    }

    /// The raw `id` value.
    pub fn id(&self) -> Option<&Value> {
        self.0.get(ID_FIELD)
    }

    /// The `id` in textual form (`1` and `"1"` both give `"1"`).
    pub fn id_text(&self) -> Option<String> {
        self.id().and_then(value_text)
    }

    /// Check whether this record's id equals `id` textually.
    pub fn has_id(&self, id: &str) -> bool {
        self.id_text().as_deref() == Some(id)
    }

    /// Get a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Shallow-merge `attrs` into this record.
    ///
    /// The `id` field is never overwritten.
    pub fn merge(&mut self, attrs: &Map<String, Value>) {
        for (field, value) in attrs {
            if field == ID_FIELD {
                continue;
            }
            self.0.insert(field.clone(), value.clone());
        }
    }

    /// Check whether `field` loosely equals `expected` (see [`loosely_equal`]).
    ///
    /// A missing field only matches `null`.
    pub fn field_matches(&self, field: &str, expected: &Value) -> bool {
        match self.0.get(field) {
            Some(value) => loosely_equal(value, expected),
            None => expected.is_null(),
        }
    }

    /// Borrow the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwrap into the field map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

/// Textual form of a scalar value. Arrays, objects and `null` have none.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Compare two values, treating scalars with the same text as equal.
///
/// Query and path parameters arrive as strings while fixtures usually carry
/// numeric ids, so `json!(1)` and `json!("1")` must match.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (value_text(a), value_text(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
