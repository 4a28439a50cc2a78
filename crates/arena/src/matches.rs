//! Full games between a search agent and scripted opponents.

use anyhow::{bail, Context, Result};
use plysearch_agent::games::{pursuit_evaluation, ChaseState, Mark, Outcome, TicTacToeState};
use plysearch_agent::{AdversarialAgent, Evaluator, GreedyPlayer, Player, RandomPlayer, SearchConfig, StateScore};
use plysearch_core::GameState;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Scripted opponent kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OpponentKind {
    /// Uniformly random legal moves.
    Random,
    /// One-step lookahead on the evaluation.
    Greedy,
    /// Another search agent with the same configuration.
    Minimax,
}

impl OpponentKind {
    pub fn name(self) -> &'static str {
        match self {
            OpponentKind::Random => "random",
            OpponentKind::Greedy => "greedy",
            OpponentKind::Minimax => "minimax",
        }
    }
}

/// A single move in a match.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveRecord {
    /// Agent that moved.
    pub agent: usize,

    /// Action, as displayed by the game.
    pub action: String,

    /// Root value reported by the search (search agent moves only).
    pub value: Option<f32>,

    /// States visited by the search (search agent moves only).
    pub nodes: Option<u64>,
}

/// A complete match.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MatchRecord {
    /// Moves in play order.
    pub moves: Vec<MoveRecord>,

    /// Result for the search agent: +1 win, -1 loss, 0 draw for
    /// tic-tac-toe, final score for chase.
    pub outcome: f32,

    /// Match metadata (seed, seats, configuration).
    pub metadata: HashMap<String, serde_json::Value>,
}

impl MatchRecord {
    fn new(seed: u64, config: &SearchConfig) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("seed".to_string(), serde_json::json!(seed));
        metadata.insert("depth".to_string(), serde_json::json!(config.depth));
        metadata.insert("alpha_beta".to_string(), serde_json::json!(config.alpha_beta));
        metadata.insert("models".to_string(), serde_json::json!(config.models.to_string()));
        Self {
            moves: Vec::new(),
            outcome: 0.0,
            metadata,
        }
    }

    fn push_search<A: Display>(&mut self, agent: usize, action: &A, value: f32, nodes: u64) {
        self.moves.push(MoveRecord {
            agent,
            action: action.to_string(),
            value: Some(value),
            nodes: Some(nodes),
        });
    }

    fn push_scripted<A: Display>(&mut self, agent: usize, action: &A) {
        self.moves.push(MoveRecord {
            agent,
            action: action.to_string(),
            value: None,
            nodes: None,
        });
    }

    /// Total states visited by the search agent.
    pub fn nodes_visited(&self) -> u64 {
        self.moves.iter().filter_map(|m| m.nodes).sum()
    }
}

fn scripted_player<S, E>(kind: OpponentKind, evaluator: E, config: &SearchConfig, seed: u64) -> Box<dyn Player<S>>
where
    S: GameState + 'static,
    E: Evaluator<S> + 'static,
{
    match kind {
        OpponentKind::Random => Box::new(RandomPlayer::new(ChaCha8Rng::seed_from_u64(seed))),
        OpponentKind::Greedy => Box::new(GreedyPlayer::new(evaluator)),
        OpponentKind::Minimax => Box::new(AdversarialAgent::new(config.clone(), evaluator)),
    }
}

/// Play one tic-tac-toe game. The search agent plays X when `agent_plays_x`.
pub fn play_tictactoe(
    config: &SearchConfig,
    opponent: OpponentKind,
    agent_plays_x: bool,
    seed: u64,
) -> Result<MatchRecord> {
    let agent = AdversarialAgent::with_state_score(config.clone());
    let mut scripted = scripted_player::<TicTacToeState, _>(opponent, StateScore, config, seed);
    let agent_mark = if agent_plays_x { Mark::X } else { Mark::O };

    let mut record = MatchRecord::new(seed, config);
    record.metadata.insert("game".to_string(), serde_json::json!("tictactoe"));
    record.metadata.insert("agent_mark".to_string(), serde_json::json!(agent_mark.to_string()));
    record.metadata.insert("opponent".to_string(), serde_json::json!(opponent.name()));

    let mut state = TicTacToeState::new();
    while !state.is_terminal() {
        let mover = state.current();
        let seat = mover.agent();
        let action = if mover == agent_mark {
            let result = agent.search_as(&state, seat)?;
            record.push_search(seat, &result.best_action, result.root_value, result.nodes_visited);
            result.best_action
        } else {
            let action = scripted.choose(&state, seat)?;
            record.push_scripted(seat, &action);
            action
        };
        state = state.successor(seat, &action);
    }

    record.outcome = match state.winner() {
        Some(mark) if mark == agent_mark => 1.0,
        Some(_) => -1.0,
        None => 0.0,
    };
    Ok(record)
}

/// Play one chase game with the search agent as the runner.
pub fn play_chase(
    config: &SearchConfig,
    layout: &str,
    chasers: OpponentKind,
    max_moves: usize,
    seed: u64,
) -> Result<MatchRecord> {
    let mut state = ChaseState::from_layout(layout).context("invalid chase layout")?;
    let num_agents = state.num_agents();
    config
        .models
        .check(num_agents)
        .with_context(|| format!("layout has {} chasers", num_agents - 1))?;

    let agent = AdversarialAgent::new(config.clone(), pursuit_evaluation);
    let mut opponents: Vec<Box<dyn Player<ChaseState>>> = (1..num_agents)
        .map(|i| scripted_player::<ChaseState, _>(chasers, pursuit_evaluation, config, seed.wrapping_add(i as u64)))
        .collect();

    let mut record = MatchRecord::new(seed, config);
    record.metadata.insert("game".to_string(), serde_json::json!("chase"));
    record.metadata.insert("chasers".to_string(), serde_json::json!(chasers.name()));

    let mut turns = 0;
    'game: while turns < max_moves {
        let result = agent.search(&state)?;
        record.push_search(0, &result.best_action, result.root_value, result.nodes_visited);
        state = state.successor(0, &result.best_action);

        for (i, opponent) in opponents.iter_mut().enumerate() {
            if state.is_terminal() {
                break 'game;
            }
            let seat = i + 1;
            let action = opponent.choose(&state, seat)?;
            record.push_scripted(seat, &action);
            state = state.successor(seat, &action);
        }
        turns += 1;
        if state.is_terminal() {
            break;
        }
    }

    let ending = match state.outcome() {
        Some(Outcome::Cleared) => "cleared",
        Some(Outcome::Caught) => "caught",
        None => "timeout",
    };
    record.metadata.insert("ending".to_string(), serde_json::json!(ending));
    record.metadata.insert("dots_left".to_string(), serde_json::json!(state.dots_left()));
    record.outcome = state.score() as f32;
    Ok(record)
}

/// Save each record to its own MessagePack file in `dir`.
pub fn write_records(dir: &Path, records: &[MatchRecord]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    for (i, record) in records.iter().enumerate() {
        let filename = dir.join(format!("match_{:06}.msgpack", i));
        let file = File::create(&filename).with_context(|| format!("Failed to create file: {:?}", filename))?;
        let mut writer = BufWriter::new(file);
        // Named fields keep records readable as maps
        rmp_serde::encode::write_named(&mut writer, record)
            .with_context(|| format!("Failed to serialize match {}", i))?;
    }
    Ok(())
}

/// Read a record written by [`write_records`].
pub fn read_record(path: &Path) -> Result<MatchRecord> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let record = rmp_serde::from_read(file).with_context(|| format!("Failed to decode {:?}", path))?;
    Ok(record)
}

/// Win/draw/loss tally from the search agent's seat.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl Tally {
    pub fn from_records(records: &[MatchRecord]) -> Self {
        records.iter().fold(Self::default(), |mut tally, record| {
            if record.outcome > 0.5 {
                tally.wins += 1;
            } else if record.outcome < -0.5 {
                tally.losses += 1;
            } else {
                tally.draws += 1;
            }
            tally
        })
    }

    pub fn total(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    pub fn win_rate(&self) -> f32 {
        if self.total() == 0 {
            return 0.0;
        }
        self.wins as f32 / self.total() as f32
    }
}

/// Parse a layout file, rejecting empty input early.
pub fn load_layout(path: &Path) -> Result<String> {
    let layout = fs::read_to_string(path).with_context(|| format!("Failed to read layout {:?}", path))?;
    if layout.trim().is_empty() {
        bail!("layout file {:?} is empty", path);
    }
    Ok(layout)
}
