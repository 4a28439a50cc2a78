//! Test game implementations for search validation.
//!
//! These games exercise the search on known positions before it is
//! pointed at a real engine through a `GameState` adapter.

pub mod chase;
pub mod explicit;
pub mod tictactoe;

pub use chase::{pursuit_evaluation, ChaseState, Direction, LayoutError, Outcome, Position};
pub use explicit::{Branch, TreeError, TreeSpec, TreeState};
pub use tictactoe::{Mark, TicTacToeAction, TicTacToeState};
