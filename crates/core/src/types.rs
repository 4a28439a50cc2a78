//! Opponent models with enforced invariants.
//!
//! - AgentModel: how the search predicts one opponent's choice
//! - AgentModels: one model per opponent, never empty, indexed by agent

use crate::{Result, SearchError, MAXIMIZER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the search models a non-maximizing agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentModel {
    /// Minimizes the maximizer's value.
    #[serde(alias = "min", alias = "minimize")]
    Adversarial,

    /// Picks uniformly among its legal actions; valued by expectation.
    #[serde(alias = "expectation", alias = "uniform")]
    Random,

    /// Follows the heuristic: takes the successor with the lowest immediate
    /// evaluation, first action on ties.
    #[serde(alias = "heuristic")]
    Greedy,
}

impl AgentModel {
    /// Canonical tag used in configs and on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            AgentModel::Adversarial => "adversarial",
            AgentModel::Random => "random",
            AgentModel::Greedy => "greedy",
        }
    }
}

impl fmt::Display for AgentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for AgentModel {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adversarial" | "min" | "minimize" => Ok(AgentModel::Adversarial),
            "random" | "expectation" | "uniform" => Ok(AgentModel::Random),
            "greedy" | "heuristic" => Ok(AgentModel::Greedy),
            _ => Err(SearchError::UnknownAgentModel(s.to_string())),
        }
    }
}

/// Models for agents `1..num_agents`, in agent order.
///
/// Invariant: at least one opponent is modeled.
///
/// # Example
/// ```
/// use plysearch_core::{AgentModel, AgentModels};
///
/// let models: AgentModels = "adversarial, random".parse().unwrap();
/// assert_eq!(models.num_agents(), 3);
/// assert_eq!(models.model(2).unwrap(), AgentModel::Random);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AgentModel>", into = "Vec<AgentModel>")]
pub struct AgentModels(Vec<AgentModel>);

impl AgentModels {
    /// Create models from one entry per opponent (agent 1 first).
    ///
    /// # Errors
    /// Returns `SearchError::EmptyModels` if no opponent is given.
    pub fn new(models: Vec<AgentModel>) -> Result<Self> {
        if models.is_empty() {
            return Err(SearchError::EmptyModels);
        }
        Ok(Self(models))
    }

    /// Model every opponent of a `num_agents` game the same way.
    ///
    /// # Errors
    /// Returns `SearchError::EmptyModels` if `num_agents < 2`.
    pub fn uniform(num_agents: usize, model: AgentModel) -> Result<Self> {
        Self::new(vec![model; num_agents.saturating_sub(1)])
    }

    /// Every opponent minimizes (classic minimax).
    pub fn adversarial(num_agents: usize) -> Result<Self> {
        Self::uniform(num_agents, AgentModel::Adversarial)
    }

    /// Every opponent is uniformly random (expectimax).
    pub fn random(num_agents: usize) -> Result<Self> {
        Self::uniform(num_agents, AgentModel::Random)
    }

    /// Number of agents these models cover, including the maximizer.
    pub fn num_agents(&self) -> usize {
        self.0.len() + 1
    }

    /// Get the model of a non-zero agent.
    ///
    /// # Errors
    /// Returns `SearchError::AgentOutOfRange` for the maximizer or for an
    /// index past the last modeled opponent.
    pub fn model(&self, agent: usize) -> Result<AgentModel> {
        if agent == MAXIMIZER {
            return Err(self.out_of_range(agent));
        }
        self.0
            .get(agent - 1)
            .copied()
            .ok_or_else(|| self.out_of_range(agent))
    }

    /// Replace the model of a non-zero agent.
    ///
    /// # Errors
    /// Returns `SearchError::AgentOutOfRange` like [`AgentModels::model`].
    pub fn set(&mut self, agent: usize, model: AgentModel) -> Result<()> {
        if agent == MAXIMIZER || agent > self.0.len() {
            return Err(self.out_of_range(agent));
        }
        self.0[agent - 1] = model;
        Ok(())
    }

    /// Check that these models cover exactly the agents of a game.
    ///
    /// # Errors
    /// Returns `SearchError::ModelCountMismatch` when the game has a
    /// different number of opponents.
    pub fn check(&self, num_agents: usize) -> Result<()> {
        let expected = num_agents.saturating_sub(1);
        if expected != self.0.len() {
            return Err(SearchError::ModelCountMismatch {
                expected,
                actual: self.0.len(),
            });
        }
        Ok(())
    }

    /// True if any opponent is valued by expectation.
    pub fn has_chance(&self) -> bool {
        self.0.contains(&AgentModel::Random)
    }

    /// Iterate over `(agent, model)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, AgentModel)> + '_ {
        self.0.iter().enumerate().map(|(i, m)| (i + 1, *m))
    }

    fn out_of_range(&self, agent: usize) -> SearchError {
        SearchError::AgentOutOfRange {
            agent,
            num_agents: self.num_agents(),
        }
    }
}

impl TryFrom<Vec<AgentModel>> for AgentModels {
    type Error = SearchError;

    fn try_from(models: Vec<AgentModel>) -> Result<Self> {
        Self::new(models)
    }
}

impl From<AgentModels> for Vec<AgentModel> {
    fn from(models: AgentModels) -> Self {
        models.0
    }
}

impl FromStr for AgentModels {
    type Err = SearchError;

    /// Parse a comma-separated list of tags, agent 1 first.
    fn from_str(s: &str) -> Result<Self> {
        let models = s
            .split(',')
            .filter(|tag| !tag.trim().is_empty())
            .map(AgentModel::from_str)
            .collect::<Result<Vec<_>>>()?;
        Self::new(models)
    }
}

impl fmt::Display for AgentModels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, model) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", model)?;
        }
        Ok(())
    }
}
