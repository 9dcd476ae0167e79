//! The in-memory fixture store.

use ci_mock_types::{value_text, Collection, Record, ID_FIELD};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, StoreError};
use crate::fixtures::FixtureSet;

/// A field condition: the field must loosely equal the value.
pub type Condition<'a> = (&'a str, Value);

/// One collection's records, in insertion order.
#[derive(Debug)]
struct Table {
    records: Vec<Record>,
    /// Next id handed out to records inserted without one.
    next_id: u64,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl Table {
    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.has_id(id))
    }

    /// Append a record, assigning the next id when it has none.
    fn push(&mut self, collection: Collection, mut record: Record) -> Result<Record> {
        let id = match record.id_text() {
            Some(id) => id,
            None => {
                let id = self.next_id.to_string();
                record.insert(ID_FIELD, id.clone());
                id
            }
        };

        if self.position(&id).is_some() {
            return Err(StoreError::DuplicateId { collection, id });
        }

        self.observe_id(&id);
        self.records.push(record.clone());
        Ok(record)
    }

    /// Keep generated ids clear of explicit numeric ids.
    fn observe_id(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.next_id = self.next_id.max(n.saturating_add(1));
        }
    }
}

/// In-memory fixture store.
///
/// Every collection keeps its records in insertion order. Records are
/// returned as copies, so callers can reshape them freely without touching the
/// stored data.
#[derive(Debug, Default)]
pub struct FixtureStore {
    tables: RwLock<HashMap<Collection, Table>>,
}

impl FixtureStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a fixture set.
    pub fn with_fixtures(fixtures: FixtureSet) -> Result<Self> {
        let store = Self::new();
        store.load(fixtures)?;
        Ok(store)
    }

    /// Append a record.
    ///
    /// Records without an id get the next numeric id, as a string. Inserting
    /// an id that is already present fails.
    pub fn insert(&self, collection: Collection, record: Record) -> Result<Record> {
        let mut tables = self.tables.write();
        tables.entry(collection).or_default().push(collection, record)
    }

    /// Insert `record` unless one with the same id exists.
    ///
    /// Returns the stored record and whether it was created. The lookup and
    /// the insert happen under one write lock.
    pub fn insert_if_absent(
        &self,
        collection: Collection,
        record: Record,
    ) -> Result<(Record, bool)> {
        let mut tables = self.tables.write();
        let table = tables.entry(collection).or_default();

        let existing = record
            .id_text()
            .and_then(|id| table.position(&id))
            .map(|i| table.records[i].clone());
        if let Some(existing) = existing {
            return Ok((existing, false));
        }

        let created = table.push(collection, record)?;
        tracing::debug!(collection = %collection, id = ?created.id(), "Fixture created");
        Ok((created, true))
    }

    /// Find a record by id.
    pub fn find(&self, collection: Collection, id: &str) -> Option<Record> {
        let tables = self.tables.read();
        let table = tables.get(&collection)?;
        table.position(id).map(|i| table.records[i].clone())
    }

    /// Find a record by id, failing with [`StoreError::NotFound`].
    pub fn get(&self, collection: Collection, id: &str) -> Result<Record> {
        self.find(collection, id).ok_or_else(|| StoreError::NotFound {
            collection,
            id: id.to_string(),
        })
    }

    /// All records of a collection, in insertion order.
    pub fn all(&self, collection: Collection) -> Vec<Record> {
        self.tables
            .read()
            .get(&collection)
            .map(|t| t.records.clone())
            .unwrap_or_default()
    }

    /// Records matching every condition, in insertion order.
    pub fn where_all(&self, collection: Collection, conditions: &[Condition<'_>]) -> Vec<Record> {
        self.tables
            .read()
            .get(&collection)
            .map(|t| {
                t.records
                    .iter()
                    .filter(|r| matches_all(r, conditions))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First record matching every condition.
    pub fn first_where(
        &self,
        collection: Collection,
        conditions: &[Condition<'_>],
    ) -> Option<Record> {
        let tables = self.tables.read();
        tables
            .get(&collection)?
            .records
            .iter()
            .find(|r| matches_all(r, conditions))
            .cloned()
    }

    /// First record matching every condition, failing with [`StoreError::NoMatch`].
    pub fn get_where(
        &self,
        collection: Collection,
        conditions: &[Condition<'_>],
    ) -> Result<Record> {
        self.first_where(collection, conditions)
            .ok_or_else(|| StoreError::NoMatch {
                collection,
                query: describe(conditions),
            })
    }

    /// Shallow-merge `attrs` into a stored record and return the result.
    pub fn update(
        &self,
        collection: Collection,
        id: &str,
        attrs: &Map<String, Value>,
    ) -> Result<Record> {
        let mut tables = self.tables.write();
        let not_found = || StoreError::NotFound {
            collection,
            id: id.to_string(),
        };

        let table = tables.get_mut(&collection).ok_or_else(not_found)?;
        let index = table.position(id).ok_or_else(not_found)?;

        let record = &mut table.records[index];
        record.merge(attrs);
        Ok(record.clone())
    }

    /// Number of records in a collection.
    pub fn count(&self, collection: Collection) -> usize {
        self.tables
            .read()
            .get(&collection)
            .map(|t| t.records.len())
            .unwrap_or(0)
    }

    /// Record counts for every collection.
    pub fn stats(&self) -> BTreeMap<Collection, usize> {
        let tables = self.tables.read();
        Collection::ALL
            .iter()
            .map(|c| (*c, tables.get(c).map(|t| t.records.len()).unwrap_or(0)))
            .collect()
    }

    /// Total number of records across all collections.
    pub fn len(&self) -> usize {
        self.tables.read().values().map(|t| t.records.len()).sum()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.tables.write().clear();
    }

    /// Seed the store from a fixture set. Returns the number of records loaded.
    pub fn load(&self, fixtures: FixtureSet) -> Result<usize> {
        let mut loaded = 0;
        for (collection, records) in fixtures.into_tables() {
            for record in records {
                self.insert(collection, record)?;
                loaded += 1;
            }
        }
        tracing::debug!(records = loaded, "Fixtures loaded into store");
        Ok(loaded)
    }
}

fn matches_all(record: &Record, conditions: &[Condition<'_>]) -> bool {
    conditions
        .iter()
        .all(|(field, value)| record.field_matches(field, value))
}

fn describe(conditions: &[Condition<'_>]) -> String {
    conditions
        .iter()
        .map(|(field, value)| {
            let text = value_text(value).unwrap_or_else(|| value.to_string());
            format!("{}={}", field, text)
        })
        .collect::<Vec<_>>()
        .join(", ")
}
