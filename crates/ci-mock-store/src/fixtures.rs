//! Fixture documents.
//!
//! A fixture document is a YAML (or JSON) mapping from collection name to a
//! list of records:
//!
//! ```yaml
//! users:
//!   - id: 1
//!     login: testuser
//! builds:
//!   - id: 1
//!     number: "1"
//!     branchId: 1
//!     commitIds: [1]
//! ```
//!
//! Unknown collection names and records that are not objects are rejected
//! with [`StoreError::InvalidFixture`] so typos surface at startup.

use ci_mock_types::{Collection, Record, TypesError};
use serde_json::Value;
use std::path::Path;

use crate::error::{Result, StoreError};

/// The scenario shipped with the crate.
const DEFAULT_SCENARIO: &str = include_str!("../fixtures/default.yaml");

/// A set of fixture records, grouped by collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureSet {
    pub users: Vec<Record>,
    pub accounts: Vec<Record>,
    pub hooks: Vec<Record>,
    pub repositories: Vec<Record>,
    pub permissions: Vec<Record>,
    pub crons: Vec<Record>,
    pub settings: Vec<Record>,
    pub env_vars: Vec<Record>,
    pub ssh_keys: Vec<Record>,
    pub branches: Vec<Record>,
    pub jobs: Vec<Record>,
    pub commits: Vec<Record>,
    pub builds: Vec<Record>,
    pub logs: Vec<Record>,
}

impl FixtureSet {
    /// Create an empty fixture set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The scenario shipped with the crate: one user with an organization,
    /// two repositories, branches, builds, jobs, logs and settings.
    pub fn default_scenario() -> Result<Self> {
        Self::from_yaml_str(DEFAULT_SCENARIO)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Self::from_value(serde_yaml::from_str(source)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(source)?)
    }

    /// Build a fixture set from a parsed document.
    ///
    /// The document is a mapping from collection name to a list of objects.
    /// A `null` document, or a collection set to `null`, holds no records.
    pub fn from_value(document: Value) -> Result<Self> {
        let tables = match document {
            Value::Null => return Ok(Self::new()),
            Value::Object(tables) => tables,
            _ => {
                return Err(StoreError::InvalidFixture(
                    "document must map collection names to records".into(),
                ))
            }
        };

        let mut set = Self::new();
        for (name, records) in tables {
            let collection: Collection = name
                .parse()
                .map_err(|e: TypesError| StoreError::InvalidFixture(e.to_string()))?;

            let records = match records {
                Value::Null => Vec::new(),
                Value::Array(records) => records,
                _ => {
                    return Err(StoreError::InvalidFixture(format!(
                        "{} must be a list of records",
                        collection
                    )))
                }
            };

            for (index, record) in records.into_iter().enumerate() {
                let record = Record::from_value(record).map_err(|e| {
                    StoreError::InvalidFixture(format!("{}[{}]: {}", collection, index, e))
                })?;
                set.records_mut(collection).push(record);
            }
        }

        Ok(set)
    }

    /// Read a fixture file. `.json` files are parsed as JSON, anything else
    /// as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        }
    }

    /// Builder-style append of one record.
    pub fn with(mut self, collection: Collection, record: Record) -> Self {
        self.records_mut(collection).push(record);
        self
    }

    /// Records of one collection.
    pub fn records(&self, collection: Collection) -> &[Record] {
        match collection {
            Collection::Users => &self.users,
            Collection::Accounts => &self.accounts,
            Collection::Hooks => &self.hooks,
            Collection::Repositories => &self.repositories,
            Collection::Permissions => &self.permissions,
            Collection::Crons => &self.crons,
            Collection::Settings => &self.settings,
            Collection::EnvVars => &self.env_vars,
            Collection::SshKeys => &self.ssh_keys,
            Collection::Branches => &self.branches,
            Collection::Jobs => &self.jobs,
            Collection::Commits => &self.commits,
            Collection::Builds => &self.builds,
            Collection::Logs => &self.logs,
        }
    }

    /// Mutable records of one collection.
    pub fn records_mut(&mut self, collection: Collection) -> &mut Vec<Record> {
        match collection {
            Collection::Users => &mut self.users,
            Collection::Accounts => &mut self.accounts,
            Collection::Hooks => &mut self.hooks,
            Collection::Repositories => &mut self.repositories,
            Collection::Permissions => &mut self.permissions,
            Collection::Crons => &mut self.crons,
            Collection::Settings => &mut self.settings,
            Collection::EnvVars => &mut self.env_vars,
            Collection::SshKeys => &mut self.ssh_keys,
            Collection::Branches => &mut self.branches,
            Collection::Jobs => &mut self.jobs,
            Collection::Commits => &mut self.commits,
            Collection::Builds => &mut self.builds,
            Collection::Logs => &mut self.logs,
        }
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        Collection::ALL.iter().map(|c| self.records(*c).len()).sum()
    }

    /// Whether the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into per-collection record lists, in seeding order.
    pub fn into_tables(mut self) -> Vec<(Collection, Vec<Record>)> {
        Collection::ALL
            .iter()
            .map(|c| (*c, std::mem::take(self.records_mut(*c))))
            .collect()
    }
}
