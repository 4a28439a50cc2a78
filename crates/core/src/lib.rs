//! Plysearch Core - Game abstractions and agent models
//!
//! This crate provides the [`GameState`] trait that any turn-based,
//! multi-agent game must implement to be searched by `plysearch-agent`.
//!
//! # Types
//!
//! - [`GameState`] - Trait for game states (legal actions, successors, evaluation)
//! - [`AgentModel`] - How the search models a non-maximizing agent
//! - [`AgentModels`] - Model of every opponent, indexed by agent
//! - [`SearchError`] - Errors signaled by the search

mod error;
mod game;
mod types;

pub use error::{Result, SearchError};
pub use game::{GameState, MAXIMIZER};
pub use types::{AgentModel, AgentModels};
