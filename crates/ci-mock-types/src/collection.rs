//! The entity tables served by the mock backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// A fixture collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Users,
    Accounts,
    Hooks,
    Repositories,
    Permissions,
    Crons,
    Settings,
    EnvVars,
    SshKeys,
    Branches,
    Jobs,
    Commits,
    Builds,
    Logs,
}

impl Collection {
    /// Every collection, in seeding order.
    pub const ALL: [Collection; 14] = [
        Collection::Users,
        Collection::Accounts,
        Collection::Hooks,
        Collection::Repositories,
        Collection::Permissions,
        Collection::Crons,
        Collection::Settings,
        Collection::EnvVars,
        Collection::SshKeys,
        Collection::Branches,
        Collection::Jobs,
        Collection::Commits,
        Collection::Builds,
        Collection::Logs,
    ];

    /// The collection's name as used in fixture files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Accounts => "accounts",
            Collection::Hooks => "hooks",
            Collection::Repositories => "repositories",
            Collection::Permissions => "permissions",
            Collection::Crons => "crons",
            Collection::Settings => "settings",
            Collection::EnvVars => "env_vars",
            Collection::SshKeys => "ssh_keys",
            Collection::Branches => "branches",
            Collection::Jobs => "jobs",
            Collection::Commits => "commits",
            Collection::Builds => "builds",
            Collection::Logs => "logs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TypesError::UnknownCollection(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for collection in Collection::ALL {
            assert_eq!(collection.as_str().parse::<Collection>(), Ok(collection));
        }
    }

    #[test]
    fn test_unknown_collection() {
        assert_eq!(
            "pull_requests".parse::<Collection>(),
            Err(TypesError::UnknownCollection("pull_requests".into()))
        );
    }

    #[test]
    fn test_serde_name_matches_display() {
        let json = serde_json::to_string(&Collection::SshKeys).unwrap();
        assert_eq!(json, "\"ssh_keys\"");
        assert_eq!(Collection::EnvVars.to_string(), "env_vars");
    }
}
