//! Adversarial search agent.
//!
//! Evaluates every legal action of the maximizer with the recursive value
//! function (plain or alpha-beta) and returns the best one. Ties go to the
//! action listed first, so the decision is deterministic for a fixed
//! legal-action order.

use crate::{
    config::SearchConfig,
    evaluator::{Evaluator, StateScore},
    minimax::{advance, alphabeta_value, minimax_value, Context},
};
use plysearch_core::{GameState, Result, SearchError, MAXIMIZER};

/// Result of a search from one seat.
#[derive(Clone, Debug)]
pub struct SearchResult<A> {
    /// Best action (first one on ties).
    pub best_action: A,

    /// Value of the best action.
    pub root_value: f32,

    /// Score of every evaluated root action, in legal-action order.
    /// Exact without pruning. With alpha-beta, an action that cannot beat
    /// the best one may carry a bound instead: an upper bound when the
    /// searching seat maximizes (`search`, or `search_as` for agent 0), a
    /// lower bound when it minimizes (`search_as` for any other agent).
    pub action_values: Vec<(A, f32)>,

    /// Number of states visited, root included.
    pub nodes_visited: u64,

    /// Depth searched, in plies.
    pub depth: usize,

    /// False if the search stopped before evaluating every root action.
    pub complete: bool,
}

impl<A: Clone + PartialEq> SearchResult<A> {
    /// Get the best action.
    pub fn best(&self) -> A {
        self.best_action.clone()
    }

    /// Score recorded for an action, if it was evaluated.
    pub fn value_of(&self, action: &A) -> Option<f32> {
        self.action_values
            .iter()
            .find(|(a, _)| a == action)
            .map(|(_, v)| *v)
    }
}

/// Bounded-depth adversarial search.
///
/// Generic over:
/// - `E`: the evaluation strategy applied at leaves
#[derive(Clone, Debug)]
pub struct AdversarialAgent<E> {
    config: SearchConfig,
    evaluator: E,
}

impl AdversarialAgent<StateScore> {
    /// Create an agent that scores leaves with the game's own score.
    pub fn with_state_score(config: SearchConfig) -> Self {
        Self::new(config, StateScore)
    }
}

impl<E> AdversarialAgent<E> {
    /// Create a new search agent.
    pub fn new(config: SearchConfig, evaluator: E) -> Self {
        Self { config, evaluator }
    }

    /// Get the search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get the evaluator.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Returns the best action for agent 0.
    ///
    /// # Errors
    /// - `SearchError::NoLegalActions` if agent 0 cannot move
    /// - `SearchError::ModelCountMismatch` if the configured models do not
    ///   cover every opponent of the game
    pub fn get_action<S>(&self, state: &S) -> Result<S::Action>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        Ok(self.search(state)?.best_action)
    }

    /// Run the search at the configured depth.
    pub fn search<S>(&self, state: &S) -> Result<SearchResult<S::Action>>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        self.search_interruptible(state, self.config.depth, &mut || false)
    }

    /// Value of `state` with `agent` to move, searched `depth` plies deep.
    ///
    /// With `depth == 0` this is the evaluation of `state` for any agent.
    pub fn value<S>(&self, state: &S, depth: usize, agent: usize) -> Result<f32>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        self.config.models.check(state.num_agents())?;
        let ctx = Context::new(&self.evaluator, &self.config.models);
        if self.config.alpha_beta {
            alphabeta_value(&ctx, state, depth, agent, f32::NEG_INFINITY, f32::INFINITY)
        } else {
            minimax_value(&ctx, state, depth, agent)
        }
    }

    /// Best action for any seat, searched at the configured depth.
    ///
    /// Shorthand for [`AdversarialAgent::search_as`] keeping only the action.
    pub fn best_response<S>(&self, state: &S, agent: usize) -> Result<S::Action>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        Ok(self.search_as(state, agent)?.best_action)
    }

    /// Search from any seat at the configured depth.
    ///
    /// Agent 0 maximizes as in [`AdversarialAgent::search`]. Any other agent
    /// picks the action minimizing the maximizer's value, whatever its
    /// configured model; the models still apply to the other opponents.
    /// Values stay on the maximizer's scale.
    ///
    /// # Errors
    /// - `SearchError::AgentOutOfRange` if `agent` is not in the game
    /// - `SearchError::NoLegalActions` if `agent` cannot move
    pub fn search_as<S>(&self, state: &S, agent: usize) -> Result<SearchResult<S::Action>>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        if agent == MAXIMIZER {
            return self.search(state);
        }
        let num_agents = state.num_agents();
        if agent >= num_agents {
            return Err(SearchError::AgentOutOfRange { agent, num_agents });
        }
        self.config.models.check(num_agents)?;

        let actions = state.legal_actions(agent);
        let ctx = Context::new(&self.evaluator, &self.config.models);
        let (next_agent, next_depth) = advance(state, agent, self.config.depth);

        let mut beta = f32::INFINITY;
        let mut best: Option<(usize, f32)> = None;
        let mut action_values = Vec::with_capacity(actions.len());
        for (i, action) in actions.iter().enumerate() {
            let child = state.successor(agent, action);
            let value = if self.config.alpha_beta {
                alphabeta_value(&ctx, &child, next_depth, next_agent, f32::NEG_INFINITY, beta)?
            } else {
                minimax_value(&ctx, &child, next_depth, next_agent)?
            };
            action_values.push((action.clone(), value));
            if best.map_or(true, |(_, b)| value < b) {
                best = Some((i, value));
                beta = beta.min(value);
            }
        }

        let (index, root_value) = best.ok_or(SearchError::NoLegalActions(agent))?;
        Ok(SearchResult {
            best_action: actions[index].clone(),
            root_value,
            action_values,
            nodes_visited: ctx.nodes() + 1,
            depth: self.config.depth,
            complete: true,
        })
    }

    /// Search at `depth`, asking `should_stop` after each root action except
    /// the last. At least one root action is always evaluated.
    pub(crate) fn search_interruptible<S>(
        &self,
        state: &S,
        depth: usize,
        should_stop: &mut dyn FnMut() -> bool,
    ) -> Result<SearchResult<S::Action>>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        self.config.models.check(state.num_agents())?;
        let actions = state.legal_actions(MAXIMIZER);
        if actions.is_empty() {
            return Err(SearchError::NoLegalActions(MAXIMIZER));
        }

        let ctx = Context::new(&self.evaluator, &self.config.models);
        let (next_agent, next_depth) = advance(state, MAXIMIZER, depth);

        let mut alpha = f32::NEG_INFINITY;
        let mut best: Option<(usize, f32)> = None;
        let mut action_values = Vec::with_capacity(actions.len());
        let mut complete = true;

        for (i, action) in actions.iter().enumerate() {
            let child = state.successor(MAXIMIZER, action);
            let value = if self.config.alpha_beta {
                alphabeta_value(&ctx, &child, next_depth, next_agent, alpha, f32::INFINITY)?
            } else {
                minimax_value(&ctx, &child, next_depth, next_agent)?
            };
            action_values.push((action.clone(), value));

            if best.map_or(true, |(_, b)| value > b) {
                best = Some((i, value));
                alpha = alpha.max(value);
            }

            if i + 1 < actions.len() && should_stop() {
                complete = false;
                break;
            }
        }

        let (index, root_value) = best.ok_or(SearchError::NoLegalActions(MAXIMIZER))?;
        Ok(SearchResult {
            best_action: actions[index].clone(),
            root_value,
            action_values,
            nodes_visited: ctx.nodes() + 1,
            depth,
            complete,
        })
    }
}
