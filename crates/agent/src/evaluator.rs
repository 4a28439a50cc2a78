//! Evaluation abstraction for the search.
//!
//! The `Evaluator` trait keeps the heuristic out of the search engine:
//! - `StateScore` uses the game's own score
//! - any `Fn(&S) -> f32` closure or function works as an evaluator
//! - `LinearEvaluator` combines weighted hand-picked features

use plysearch_core::GameState;
use std::fmt;

/// Trait for scoring game states from the maximizer's perspective.
///
/// Higher is better for agent 0. The search calls this at depth cutoffs,
/// at terminal states and when choosing a greedy opponent's move.
pub trait Evaluator<S: GameState> {
    /// Score a state without lookahead.
    fn evaluate(&self, state: &S) -> f32;
}

impl<S, F> Evaluator<S> for F
where
    S: GameState,
    F: Fn(&S) -> f32,
{
    fn evaluate(&self, state: &S) -> f32 {
        self(state)
    }
}

/// Evaluator that returns the game's own score (`GameState::evaluate`).
#[derive(Clone, Copy, Debug, Default)]
pub struct StateScore;

impl<S: GameState> Evaluator<S> for StateScore {
    fn evaluate(&self, state: &S) -> f32 {
        state.evaluate()
    }
}

type Feature<S> = Box<dyn Fn(&S) -> f32 + Send + Sync>;

/// Weighted sum of state features.
///
/// # Example
/// ```
/// use plysearch_agent::{Evaluator, LinearEvaluator};
/// use plysearch_agent::games::TicTacToeState;
///
/// let evaluator = LinearEvaluator::new()
///     .term(1.0, |s: &TicTacToeState| s.open_lines_for_x() as f32)
///     .term(-1.0, |s: &TicTacToeState| s.open_lines_for_o() as f32);
///
/// // Both players have all eight lines open on an empty board.
/// assert_eq!(evaluator.evaluate(&TicTacToeState::new()), 0.0);
/// ```
pub struct LinearEvaluator<S> {
    terms: Vec<(f32, Feature<S>)>,
}

impl<S> LinearEvaluator<S> {
    /// Create an evaluator with no terms (always scores 0).
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a weighted feature.
    pub fn term<F>(mut self, weight: f32, feature: F) -> Self
    where
        F: Fn(&S) -> f32 + Send + Sync + 'static,
    {
        self.terms.push((weight, Box::new(feature)));
        self
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True if no terms were added.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S> Default for LinearEvaluator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for LinearEvaluator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weights: Vec<f32> = self.terms.iter().map(|(w, _)| *w).collect();
        f.debug_struct("LinearEvaluator").field("weights", &weights).finish()
    }
}

impl<S: GameState> Evaluator<S> for LinearEvaluator<S> {
    fn evaluate(&self, state: &S) -> f32 {
        self.terms
            .iter()
            .map(|(weight, feature)| weight * feature(state))
            .sum()
    }
}
