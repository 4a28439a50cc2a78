//! Move choosers for playing full games.
//!
//! A `Player` picks an action for any seat, which lets the arena pit a
//! search agent against scripted opponents.

use crate::{evaluator::Evaluator, search::AdversarialAgent};
use plysearch_core::{GameState, Result, SearchError, MAXIMIZER};
use rand::seq::SliceRandom;
use rand::Rng;

/// Chooses an action for an agent in a given state.
pub trait Player<S: GameState> {
    /// Pick an action for `agent`.
    ///
    /// # Errors
    /// Returns `SearchError::NoLegalActions` if `agent` cannot move.
    fn choose(&mut self, state: &S, agent: usize) -> Result<S::Action>;
}

impl<S, E> Player<S> for AdversarialAgent<E>
where
    S: GameState,
    E: Evaluator<S>,
{
    fn choose(&mut self, state: &S, agent: usize) -> Result<S::Action> {
        self.best_response(state, agent)
    }
}

/// Picks uniformly among the legal actions.
#[derive(Clone, Debug)]
pub struct RandomPlayer<R> {
    rng: R,
}

impl<R: Rng> RandomPlayer<R> {
    /// Create a random player drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<S: GameState, R: Rng> Player<S> for RandomPlayer<R> {
    fn choose(&mut self, state: &S, agent: usize) -> Result<S::Action> {
        state
            .legal_actions(agent)
            .choose(&mut self.rng)
            .cloned()
            .ok_or(SearchError::NoLegalActions(agent))
    }
}

/// One-step lookahead on an evaluator.
///
/// Agent 0 takes the successor with the highest evaluation, every other
/// agent the one with the lowest. Ties go to the first legal action.
#[derive(Clone, Debug)]
pub struct GreedyPlayer<E> {
    evaluator: E,
}

impl<E> GreedyPlayer<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }
}

impl<S, E> Player<S> for GreedyPlayer<E>
where
    S: GameState,
    E: Evaluator<S>,
{
    fn choose(&mut self, state: &S, agent: usize) -> Result<S::Action> {
        let sign = if agent == MAXIMIZER { 1.0 } else { -1.0 };
        let mut best: Option<(S::Action, f32)> = None;
        for action in state.legal_actions(agent) {
            let score = sign * self.evaluator.evaluate(&state.successor(agent, &action));
            if best.as_ref().map_or(true, |(_, b)| score > *b) {
                best = Some((action, score));
            }
        }
        best.map(|(action, _)| action)
            .ok_or(SearchError::NoLegalActions(agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::evaluator::StateScore;
    use crate::games::explicit::{TreeSpec, TreeState};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn leaves(values: &[f32]) -> TreeState {
        TreeState::new(2, &TreeSpec::leaves("c", values))
    }

    #[test]
    fn test_greedy_player_maximizes_for_agent_zero() {
        let mut player = GreedyPlayer::new(StateScore);
        assert_eq!(player.choose(&leaves(&[1.0, 4.0, 4.0, 2.0]), 0).unwrap(), "c1");
    }

    #[test]
    fn test_greedy_player_minimizes_for_opponents() {
        let mut player = GreedyPlayer::new(StateScore);
        assert_eq!(player.choose(&leaves(&[3.0, -1.0, 0.0, -1.0]), 1).unwrap(), "c1");
    }

    #[test]
    fn test_random_player_is_seeded() {
        let state = leaves(&[0.0; 6]);
        let picks = |seed| {
            let mut player = RandomPlayer::new(ChaCha8Rng::seed_from_u64(seed));
            (0..10)
                .map(|_| player.choose(&state, 1).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
        assert!(picks(7).iter().all(|a| state.actions().contains(a)));
    }

    #[test]
    fn test_players_report_stuck_agent() {
        let state = TreeState::new(2, &TreeSpec::leaf(0.0));
        let mut random = RandomPlayer::new(ChaCha8Rng::seed_from_u64(0));
        assert_eq!(random.choose(&state, 1).unwrap_err(), SearchError::NoLegalActions(1));
        let mut greedy = GreedyPlayer::new(StateScore);
        assert_eq!(greedy.choose(&state, 0).unwrap_err(), SearchError::NoLegalActions(0));
    }

    #[test]
    fn test_search_agent_as_player() {
        let spec = TreeSpec::branch(
            0.0,
            vec![
                ("A".to_string(), TreeSpec::leaves("a", &[3.0, 5.0])),
                ("B".to_string(), TreeSpec::leaves("b", &[1.0, 9.0])),
            ],
        );
        let state = TreeState::new(2, &spec);
        let mut agent = AdversarialAgent::with_state_score(SearchConfig::minimax(1, 2).unwrap());
        assert_eq!(agent.choose(&state, 0).unwrap(), "A");

        let after_b = state.successor(0, &"B".to_string());
        assert_eq!(agent.choose(&after_b, 1).unwrap(), "b0");
    }
}
