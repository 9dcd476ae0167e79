//! Node configuration.
//!
//! Configuration is layered: built-in defaults, then an optional config file
//! (YAML, TOML or JSON, picked by extension), then `CI_MOCK_*` environment
//! variables. Command-line flags are applied on top by the binary.
//!
//! | Env Var | Default |
//! |---------|---------|
//! | `CI_MOCK_API_ADDR` | `127.0.0.1:8080` |
//! | `CI_MOCK_FIXTURES` | built-in scenario |
//! | `CI_MOCK_AUTH_TOKEN` | `testUserToken` |
//! | `CI_MOCK_LOG_LEVEL` | `info` |
//! | `CI_MOCK_LOG_FORMAT` | `pretty` |
//! | `CI_MOCK_CORS` | `true` |
//! | `CI_MOCK_HOOK_UPDATE_CREATES_REPOSITORY` | `true` |

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Prefix of environment variables read by [`ServerConfig::load`].
pub const ENV_PREFIX: &str = "CI_MOCK";

/// Token accepted by the user endpoint unless configured otherwise.
pub const DEFAULT_AUTH_TOKEN: &str = "testUserToken";

/// Configuration for the mock node.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub api_addr: SocketAddr,
    /// Fixture file; the built-in scenario is served when unset.
    pub fixtures: Option<PathBuf>,
    /// Token expected in `Authorization: token <token>`.
    pub auth_token: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (pretty, json).
    pub log_format: String,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
    /// `PUT /hooks/{id}` also ensures a repository with the hook's id exists.
    pub hook_update_creates_repository: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            fixtures: None,
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            cors: true,
            hook_update_creates_repository: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.api_addr.port(), 8080);
        assert_eq!(config.auth_token, "testUserToken");
        assert!(config.fixtures.is_none());
        assert!(config.cors);
        assert!(config.hook_update_creates_repository);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ci-mock.yaml");
        std::fs::write(
            &path,
            "api_addr: \"0.0.0.0:4000\"\nauth_token: secret\nhook_update_creates_repository: false\n",
        )
        .unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api_addr.port(), 4000);
        assert_eq!(config.auth_token, "secret");
        assert!(!config.hook_update_creates_repository);
        // Unset keys keep their defaults.
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ServerConfig::load(Some(&dir.path().join("absent.yaml")));
        assert!(result.is_err());
    }
}
