//! Server configuration from environment variables.
//!
//! | variable             | default             |
//! |----------------------|---------------------|
//! | `TAGRAPH_STORE_PATH` | `papers_ideas.csv`  |
//! | `TAGRAPH_GRAPH_PATH` | `output_graph.json` |
//! | `TAGRAPH_PORT`       | `3000`              |
//! | `TAGRAPH_DIGEST`     | `md5`               |

use std::path::PathBuf;

use tagraph_core::DigestKind;

pub const STORE_PATH_VAR: &str = "TAGRAPH_STORE_PATH";
pub const GRAPH_PATH_VAR: &str = "TAGRAPH_GRAPH_PATH";
pub const PORT_VAR: &str = "TAGRAPH_PORT";
pub const DIGEST_VAR: &str = "TAGRAPH_DIGEST";

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: '{value}' is not a valid port")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    InvalidDigest { var: &'static str, reason: String },
}

/// Resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub store_path: PathBuf,
    pub graph_path: PathBuf,
    pub port: u16,
    pub digest: DigestKind,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            store_path: PathBuf::from("papers_ideas.csv"),
            graph_path: PathBuf::from("output_graph.json"),
            port: 3000,
            digest: DigestKind::Md5,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from any variable lookup; unset variables keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();
        if let Some(path) = lookup(STORE_PATH_VAR) {
            config.store_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(GRAPH_PATH_VAR) {
            config.graph_path = PathBuf::from(path);
        }
        if let Some(port) = lookup(PORT_VAR) {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_VAR,
                value: port.clone(),
            })?;
        }
        if let Some(digest) = lookup(DIGEST_VAR) {
            config.digest = digest
                .trim()
                .parse()
                .map_err(|reason| ConfigError::InvalidDigest {
                    var: DIGEST_VAR,
                    reason,
                })?;
        }
        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store_path, PathBuf::from("papers_ideas.csv"));
        assert_eq!(config.graph_path, PathBuf::from("output_graph.json"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.digest, DigestKind::Md5);
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn overrides_are_read() {
        let config = ServerConfig::from_lookup(lookup(&[
            (STORE_PATH_VAR, "/data/kb.sqlite"),
            (GRAPH_PATH_VAR, "/srv/graph.json"),
            (PORT_VAR, "8080"),
            (DIGEST_VAR, "blake3"),
        ]))
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/data/kb.sqlite"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.digest, DigestKind::Blake3);
    }

    #[test]
    fn bad_values_fail() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(PORT_VAR, "eighty")])),
            Err(ConfigError::InvalidPort { .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[(DIGEST_VAR, "sha1")])),
            Err(ConfigError::InvalidDigest { .. })
        ));
    }
}
