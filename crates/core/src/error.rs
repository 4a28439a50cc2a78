use thiserror::Error;

/// Errors that can occur while configuring or running a search
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("No legal actions available for agent {0}")]
    NoLegalActions(usize),

    #[error("Agent index {agent} is out of range for a game with {num_agents} agents")]
    AgentOutOfRange { agent: usize, num_agents: usize },

    #[error("Unknown agent model: {0}")]
    UnknownAgentModel(String),

    #[error("Expected models for {expected} opponents, got {actual}")]
    ModelCountMismatch { expected: usize, actual: usize },

    #[error("At least one opponent model is required")]
    EmptyModels,
}

/// Convenience Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
