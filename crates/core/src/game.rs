use std::fmt::Debug;

/// Index of the maximizing agent. Every other index is an opponent.
pub const MAXIMIZER: usize = 0;

/// A multi-agent, turn-based game state.
///
/// This trait is the whole interface the search needs. It is designed to be
/// engine-agnostic: a concrete game adapts to it with a thin implementation
/// and keeps its own accessors (positions, boards, timers) to itself.
///
/// Agents move in index order `0, 1, ..., num_agents() - 1` and then the
/// round starts over. Agent 0 is the maximizer.
pub trait GameState: Clone {
    /// A game action (e.g., a grid direction or a board cell)
    type Action: Clone + Debug + PartialEq;

    /// Returns all legal actions for the given agent, in a fixed order
    fn legal_actions(&self, agent: usize) -> Vec<Self::Action>;

    /// Applies an agent's action, returning a new state (immutable operation)
    fn successor(&self, agent: usize, action: &Self::Action) -> Self;

    /// Returns true if the game has ended (win, loss or draw)
    fn is_terminal(&self) -> bool;

    /// Total number of agents, including the maximizer
    fn num_agents(&self) -> usize;

    /// Score of this state from the maximizer's perspective.
    ///
    /// This is the default evaluation; searches can substitute their own
    /// heuristic through an evaluator.
    fn evaluate(&self) -> f32;

    /// Returns the agent that moves after `agent`, wrapping to the maximizer.
    fn next_agent(&self, agent: usize) -> usize {
        (agent + 1) % self.num_agents()
    }
}
