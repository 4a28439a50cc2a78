//! Search configuration parameters.
//!
//! These parameters control how far the search looks ahead and how it
//! models each opponent.

use plysearch_core::{AgentModels, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum search depth in plies. One ply is a full round in which
    /// every agent moves once.
    pub depth: usize,

    /// Use alpha-beta pruning. Never changes the chosen action, only the
    /// number of nodes visited.
    #[serde(default)]
    pub alpha_beta: bool,

    /// Model of every opponent, agent 1 first.
    pub models: AgentModels,
}

impl SearchConfig {
    /// Create a config from explicit opponent models.
    pub fn new(depth: usize, models: AgentModels) -> Self {
        Self {
            depth,
            alpha_beta: false,
            models,
        }
    }

    /// Every opponent minimizes.
    ///
    /// # Errors
    /// Returns `SearchError::EmptyModels` if `num_agents < 2`.
    pub fn minimax(depth: usize, num_agents: usize) -> Result<Self> {
        Ok(Self::new(depth, AgentModels::adversarial(num_agents)?))
    }

    /// Every opponent moves uniformly at random.
    ///
    /// # Errors
    /// Returns `SearchError::EmptyModels` if `num_agents < 2`.
    pub fn expectimax(depth: usize, num_agents: usize) -> Result<Self> {
        Ok(Self::new(depth, AgentModels::random(num_agents)?))
    }

    /// Enable alpha-beta pruning.
    pub fn with_alpha_beta(mut self) -> Self {
        self.alpha_beta = true;
        self
    }

    /// Replace the search depth.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Parse a config from JSON.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plysearch_core::AgentModel;

    #[test]
    fn test_minimax_config() {
        let config = SearchConfig::minimax(3, 3).unwrap();
        assert_eq!(config.depth, 3);
        assert!(!config.alpha_beta);
        assert_eq!(config.models.num_agents(), 3);
        assert_eq!(config.models.model(2).unwrap(), AgentModel::Adversarial);
    }

    #[test]
    fn test_expectimax_with_alpha_beta() {
        let config = SearchConfig::expectimax(2, 2).unwrap().with_alpha_beta();
        assert!(config.alpha_beta);
        assert_eq!(config.models.model(1).unwrap(), AgentModel::Random);
    }

    #[test]
    fn test_single_agent_rejected() {
        assert!(SearchConfig::minimax(2, 1).is_err());
    }

    #[test]
    fn test_from_json() {
        let config =
            SearchConfig::from_json_str(r#"{"depth": 4, "models": ["adversarial", "greedy"]}"#).unwrap();
        assert_eq!(config.depth, 4);
        assert!(!config.alpha_beta);
        assert_eq!(config.models.model(2).unwrap(), AgentModel::Greedy);

        let config = SearchConfig::from_json_str(r#"{"depth": 1, "alpha_beta": true, "models": ["random"]}"#)
            .unwrap();
        assert!(config.alpha_beta);
    }

    #[test]
    fn test_from_json_rejects_bad_models() {
        assert!(SearchConfig::from_json_str(r#"{"depth": 2, "models": []}"#).is_err());
        assert!(SearchConfig::from_json_str(r#"{"depth": 2, "models": ["bogus"]}"#).is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_models() {
        let config = SearchConfig::new(2, "random,adversarial".parse().unwrap()).with_alpha_beta();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SearchConfig::from_json_str(&json).unwrap(), config);
    }
}
