//! Iterative deepening under a deadline.
//!
//! Runs the agent at depth 1, 2, ... and keeps the deepest search that
//! finished. The clock is checked between root actions, so one root action
//! may overrun the deadline by the time it takes to search it.

use crate::{evaluator::Evaluator, search::AdversarialAgent, search::SearchResult};
use plysearch_core::{GameState, Result};
use std::time::Instant;

/// Outcome of an iterative deepening run.
#[derive(Clone, Debug)]
pub struct DeepeningResult<A> {
    /// Result of the deepest finished iteration, or the partial first
    /// iteration if even that one was interrupted.
    pub result: SearchResult<A>,

    /// Deepest depth searched to completion (0 if none).
    pub completed_depth: usize,
}

/// Iterative deepening driver around an [`AdversarialAgent`].
pub struct IterativeDeepening<'a, E> {
    agent: &'a AdversarialAgent<E>,
    max_depth: usize,
}

impl<'a, E> IterativeDeepening<'a, E> {
    /// Deepen up to `max_depth` (at least 1).
    pub fn new(agent: &'a AdversarialAgent<E>, max_depth: usize) -> Self {
        Self {
            agent,
            max_depth: max_depth.max(1),
        }
    }

    /// Deepen until `deadline` passes or `max_depth` is reached.
    pub fn search_until<S>(&self, state: &S, deadline: Instant) -> Result<DeepeningResult<S::Action>>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        self.search_with_stop(state, || Instant::now() >= deadline)
    }

    /// Deepen until `should_stop` returns true or `max_depth` is reached.
    ///
    /// `should_stop` is polled after each root action and before each new
    /// iteration.
    pub fn search_with_stop<S, F>(&self, state: &S, mut should_stop: F) -> Result<DeepeningResult<S::Action>>
    where
        S: GameState,
        E: Evaluator<S>,
        F: FnMut() -> bool,
    {
        let first = self.agent.search_interruptible(state, 1, &mut should_stop)?;
        if !first.complete {
            return Ok(DeepeningResult {
                result: first,
                completed_depth: 0,
            });
        }

        let mut best = first;
        let mut completed_depth = 1;
        for depth in 2..=self.max_depth {
            if should_stop() {
                break;
            }
            let result = self.agent.search_interruptible(state, depth, &mut should_stop)?;
            if !result.complete {
                break;
            }
            best = result;
            completed_depth = depth;
        }

        Ok(DeepeningResult {
            result: best,
            completed_depth,
        })
    }
}
