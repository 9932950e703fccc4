//! Reasoner configuration

use crate::error::ConfigError;
use orbweaver_rules::DEFAULT_MAX_ROUNDS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// When edits become visible to queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferingMode {
    /// Edits are applied on the next explicit `flush()`
    #[default]
    Buffering,
    /// Every change notification flushes immediately
    NonBuffering,
}

/// How entities absent from the signature are treated by queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshEntityPolicy {
    #[default]
    Allow,
    Disallow,
}

/// How individuals are grouped into nodes in individual node sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndividualNodeSetPolicy {
    /// Individuals known to be the same share a node
    #[default]
    BySameAs,
    /// One node per individual name
    ByName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    pub buffering_mode: BufferingMode,
    pub fresh_entity_policy: FreshEntityPolicy,
    pub individual_node_set_policy: IndividualNodeSetPolicy,
    /// Forwarded to the default forward-chaining engine
    pub max_chaining_rounds: usize,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            buffering_mode: BufferingMode::default(),
            fresh_entity_policy: FreshEntityPolicy::default(),
            individual_node_set_policy: IndividualNodeSetPolicy::default(),
            max_chaining_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl ReasonerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_buffering_mode(mut self, mode: BufferingMode) -> Self {
        self.buffering_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ReasonerConfig::default();
        assert_eq!(config.buffering_mode, BufferingMode::Buffering);
        assert_eq!(config.fresh_entity_policy, FreshEntityPolicy::Allow);
        assert_eq!(config.individual_node_set_policy, IndividualNodeSetPolicy::BySameAs);
        assert_eq!(config.max_chaining_rounds, 10_000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ReasonerConfig::from_json_str(r#"{"buffering_mode": "non_buffering"}"#).unwrap();
        assert_eq!(config.buffering_mode, BufferingMode::NonBuffering);
        assert_eq!(config.max_chaining_rounds, DEFAULT_MAX_ROUNDS);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_chaining_rounds": 5, "individual_node_set_policy": "by_name"}}"#).unwrap();

        let config = ReasonerConfig::from_path(file.path()).unwrap();
        assert_eq!(config.max_chaining_rounds, 5);
        assert_eq!(config.individual_node_set_policy, IndividualNodeSetPolicy::ByName);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(ReasonerConfig::from_json_str("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            ReasonerConfig::from_path("/nonexistent/orbweaver.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
