//! Recursive value functions.
//!
//! Both variants share the same depth convention: the depth counter drops
//! by one only after the last agent has moved, so `depth` counts full
//! rounds. A state is scored with the evaluator when it is terminal, when
//! depth reaches zero, or when the agent to move has no legal action.
//!
//! Opponent nodes follow the agent's model:
//! - `Adversarial`: minimum over children
//! - `Random`: arithmetic mean over children
//! - `Greedy`: value of the child with the lowest immediate evaluation

use crate::evaluator::Evaluator;
use plysearch_core::{AgentModel, AgentModels, GameState, Result, SearchError, MAXIMIZER};
use std::cell::Cell;

/// Per-search state shared by every recursive call.
pub(crate) struct Context<'a, E> {
    pub evaluator: &'a E,
    pub models: &'a AgentModels,
    nodes: Cell<u64>,
}

impl<'a, E> Context<'a, E> {
    pub fn new(evaluator: &'a E, models: &'a AgentModels) -> Self {
        Self {
            evaluator,
            models,
            nodes: Cell::new(0),
        }
    }

    /// Number of states visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes.get()
    }

    fn visit(&self) {
        self.nodes.set(self.nodes.get() + 1);
    }
}

/// Returns the agent moving after `agent` and the depth it searches at.
pub(crate) fn advance<S: GameState>(state: &S, agent: usize, depth: usize) -> (usize, usize) {
    let next = state.next_agent(agent);
    if next == MAXIMIZER {
        (next, depth.saturating_sub(1))
    } else {
        (next, depth)
    }
}

enum Expansion<A> {
    Leaf(f32),
    Actions(Vec<A>),
}

// Scores a state without expanding it, or returns its legal actions.
fn expand<S, E>(ctx: &Context<'_, E>, state: &S, depth: usize, agent: usize) -> Expansion<S::Action>
where
    S: GameState,
    E: Evaluator<S>,
{
    ctx.visit();
    if depth == 0 || state.is_terminal() {
        return Expansion::Leaf(ctx.evaluator.evaluate(state));
    }
    let actions = state.legal_actions(agent);
    if actions.is_empty() {
        return Expansion::Leaf(ctx.evaluator.evaluate(state));
    }
    Expansion::Actions(actions)
}

// The successor a greedy opponent takes: lowest immediate evaluation, first on ties.
fn greedy_successor<S, E>(ctx: &Context<'_, E>, state: &S, agent: usize, actions: &[S::Action]) -> Result<S>
where
    S: GameState,
    E: Evaluator<S>,
{
    let (first, rest) = actions.split_first().ok_or(SearchError::NoLegalActions(agent))?;
    let mut best = state.successor(agent, first);
    let mut best_score = ctx.evaluator.evaluate(&best);
    for action in rest {
        let child = state.successor(agent, action);
        let score = ctx.evaluator.evaluate(&child);
        if score < best_score {
            best = child;
            best_score = score;
        }
    }
    Ok(best)
}

/// Plain minimax / expectimax value of `state` with `agent` to move.
pub(crate) fn minimax_value<S, E>(ctx: &Context<'_, E>, state: &S, depth: usize, agent: usize) -> Result<f32>
where
    S: GameState,
    E: Evaluator<S>,
{
    let actions = match expand(ctx, state, depth, agent) {
        Expansion::Actions(actions) => actions,
        Expansion::Leaf(value) => return Ok(value),
    };
    let (next_agent, next_depth) = advance(state, agent, depth);
    let child = |action: &S::Action| minimax_value(ctx, &state.successor(agent, action), next_depth, next_agent);

    if agent == MAXIMIZER {
        let mut best = f32::NEG_INFINITY;
        for action in &actions {
            best = best.max(child(action)?);
        }
        return Ok(best);
    }

    match ctx.models.model(agent)? {
        AgentModel::Adversarial => {
            let mut best = f32::INFINITY;
            for action in &actions {
                best = best.min(child(action)?);
            }
            Ok(best)
        }
        AgentModel::Random => {
            let mut total = 0.0;
            for action in &actions {
                total += child(action)?;
            }
            Ok(total / actions.len() as f32)
        }
        AgentModel::Greedy => {
            let next = greedy_successor(ctx, state, agent, &actions)?;
            minimax_value(ctx, &next, next_depth, next_agent)
        }
    }
}

/// Minimax value with alpha-beta pruning.
///
/// A max node stops as soon as its value exceeds `beta`, a min node as soon
/// as its value drops below `alpha`. Comparisons are strict, so equal
/// values never prune. Children of a chance node are searched with a full
/// window so the mean is taken over exact values.
pub(crate) fn alphabeta_value<S, E>(
    ctx: &Context<'_, E>,
    state: &S,
    depth: usize,
    agent: usize,
    mut alpha: f32,
    mut beta: f32,
) -> Result<f32>
where
    S: GameState,
    E: Evaluator<S>,
{
    let actions = match expand(ctx, state, depth, agent) {
        Expansion::Actions(actions) => actions,
        Expansion::Leaf(value) => return Ok(value),
    };
    let (next_agent, next_depth) = advance(state, agent, depth);
    let child = |action: &S::Action, alpha: f32, beta: f32| {
        alphabeta_value(ctx, &state.successor(agent, action), next_depth, next_agent, alpha, beta)
    };

    if agent == MAXIMIZER {
        let mut value = f32::NEG_INFINITY;
        for action in &actions {
            value = value.max(child(action, alpha, beta)?);
            if value > beta {
                // Beta cutoff
                return Ok(value);
            }
            alpha = alpha.max(value);
        }
        return Ok(value);
    }

    match ctx.models.model(agent)? {
        AgentModel::Adversarial => {
            let mut value = f32::INFINITY;
            for action in &actions {
                value = value.min(child(action, alpha, beta)?);
                if value < alpha {
                    // Alpha cutoff
                    return Ok(value);
                }
                beta = beta.min(value);
            }
            Ok(value)
        }
        AgentModel::Random => {
            let mut total = 0.0;
            for action in &actions {
                total += child(action, f32::NEG_INFINITY, f32::INFINITY)?;
            }
            Ok(total / actions.len() as f32)
        }
        AgentModel::Greedy => {
            let next = greedy_successor(ctx, state, agent, &actions)?;
            alphabeta_value(ctx, &next, next_depth, next_agent, alpha, beta)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::StateScore;
    use crate::games::explicit::{TreeSpec, TreeState};

    fn opponent_tree(scores: &[f32]) -> TreeState {
        let children = scores
            .iter()
            .enumerate()
            .map(|(i, &v)| (format!("o{i}"), TreeSpec::leaf(v)))
            .collect();
        TreeState::new(2, &TreeSpec::branch(0.0, children))
    }

    #[test]
    fn test_advance_decrements_after_last_agent() {
        let state = TreeState::new(3, &TreeSpec::leaf(0.0));
        assert_eq!(advance(&state, 0, 2), (1, 2));
        assert_eq!(advance(&state, 1, 2), (2, 2));
        assert_eq!(advance(&state, 2, 2), (0, 1));
    }

    #[test]
    fn test_random_node_is_exact_mean() {
        let models = AgentModels::random(2).unwrap();
        let ctx = Context::new(&StateScore, &models);
        let state = opponent_tree(&[2.0, 4.0, 9.0]);

        let value = minimax_value(&ctx, &state, 1, 1).unwrap();
        assert_eq!(value, 5.0);
        assert_eq!(ctx.nodes(), 4);
    }

    #[test]
    fn test_greedy_node_follows_lowest_immediate_score() {
        let models = AgentModels::uniform(2, AgentModel::Greedy).unwrap();
        let ctx = Context::new(&StateScore, &models);
        // o1 looks best to the greedy opponent (value 1) even though o2 scores lower
        // after the maximizer replies.
        let spec = TreeSpec::branch(
            0.0,
            vec![
                ("o0".to_string(), TreeSpec::leaf(6.0)),
                (
                    "o1".to_string(),
                    TreeSpec::branch(1.0, vec![("m".to_string(), TreeSpec::leaf(8.0))]),
                ),
                ("o2".to_string(), TreeSpec::leaf(3.0)),
            ],
        );
        let state = TreeState::new(2, &spec);

        assert_eq!(minimax_value(&ctx, &state, 2, 1).unwrap(), 8.0);
        assert_eq!(alphabeta_value(&ctx, &state, 2, 1, f32::NEG_INFINITY, f32::INFINITY).unwrap(), 8.0);
    }

    #[test]
    fn test_min_node_prunes_below_alpha() {
        let models = AgentModels::adversarial(2).unwrap();
        let ctx = Context::new(&StateScore, &models);
        let state = opponent_tree(&[1.0, 7.0, 9.0]);

        // With alpha = 3 the first child (1) already proves this node irrelevant.
        let value = alphabeta_value(&ctx, &state, 1, 1, 3.0, f32::INFINITY).unwrap();
        assert_eq!(value, 1.0);
        assert_eq!(ctx.nodes(), 2);
    }

    #[test]
    fn test_ties_do_not_prune() {
        let models = AgentModels::adversarial(2).unwrap();
        let ctx = Context::new(&StateScore, &models);
        let state = opponent_tree(&[3.0, 2.0]);

        // The first child equals alpha, so the second must still be searched.
        let value = alphabeta_value(&ctx, &state, 1, 1, 3.0, f32::INFINITY).unwrap();
        assert_eq!(value, 2.0);
        assert_eq!(ctx.nodes(), 3);
    }

    #[test]
    fn test_greedy_successor_keeps_first_on_ties() {
        let models = AgentModels::uniform(2, AgentModel::Greedy).unwrap();
        let ctx = Context::new(&StateScore, &models);
        let spec = TreeSpec::branch(
            0.0,
            vec![
                ("o0".to_string(), TreeSpec::leaf(5.0)),
                ("o1".to_string(), TreeSpec::branch(2.0, vec![("m".to_string(), TreeSpec::leaf(10.0))])),
                ("o2".to_string(), TreeSpec::branch(2.0, vec![("n".to_string(), TreeSpec::leaf(-10.0))])),
            ],
        );
        let state = TreeState::new(2, &spec);

        let next = greedy_successor(&ctx, &state, 1, &state.legal_actions(1)).unwrap();
        assert_eq!(next.actions(), vec!["m".to_string()]);
    }

    #[test]
    fn test_greedy_successor_without_actions_is_an_error() {
        let models = AgentModels::uniform(2, AgentModel::Greedy).unwrap();
        let ctx = Context::new(&StateScore, &models);
        let state = opponent_tree(&[1.0]);

        let err = greedy_successor(&ctx, &state, 1, &[]).unwrap_err();
        assert!(matches!(err, SearchError::NoLegalActions(1)));
    }
}
