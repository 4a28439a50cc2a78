//! Bounded-depth adversarial search for multi-agent games.
//!
//! This crate searches any game implementing `plysearch_core::GameState`
//! from the point of view of agent 0, the maximizer.
//!
//! # Features
//!
//! - **Opponent models**: each opponent is searched as a minimizer, as a
//!   uniformly random mover (expectimax) or as a greedy follower of the
//!   evaluation
//! - **Alpha-beta pruning**: optional, never changes the chosen action
//! - **Evaluator abstraction**: the game score, any closure, or a weighted
//!   sum of features
//! - **Iterative deepening**: deepest completed search before a deadline
//! - **Players**: search agents and scripted opponents behind one trait
//!
//! # Example
//!
//! ```
//! use plysearch_agent::{AdversarialAgent, SearchConfig, games::TicTacToeState};
//!
//! let config = SearchConfig::minimax(5, 2).unwrap().with_alpha_beta();
//! let agent = AdversarialAgent::with_state_score(config);
//!
//! let result = agent.search(&TicTacToeState::new()).unwrap();
//! println!("Best action: {}", result.best_action);
//! println!("Root value: {}", result.root_value);
//! assert_eq!(result.root_value, 0.0);
//! ```

pub mod config;
pub mod deepening;
pub mod evaluator;
pub mod games;
mod minimax;
pub mod players;
pub mod search;

pub use config::{ConfigError, SearchConfig};
pub use deepening::{DeepeningResult, IterativeDeepening};
pub use evaluator::{Evaluator, LinearEvaluator, StateScore};
pub use players::{GreedyPlayer, Player, RandomPlayer};
pub use search::{AdversarialAgent, SearchResult};
