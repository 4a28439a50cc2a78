//! Match runner for the adversarial search agents.
//!
//! Plays tic-tac-toe and chase games between a search agent and scripted
//! opponents, prints a summary and optionally saves every match in
//! MessagePack format. Also solves hand-built trees loaded from JSON and
//! prints saved records.

mod matches;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use matches::{load_layout, play_chase, play_tictactoe, read_record, write_records, MatchRecord, OpponentKind, Tally};
use plysearch_agent::games::chase::{SMALL_LAYOUT, TWO_CHASER_LAYOUT};
use plysearch_agent::games::{TreeSpec, TreeState};
use plysearch_agent::{AdversarialAgent, SearchConfig};
use plysearch_core::AgentModels;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Adversarial search match runner.
#[derive(Parser)]
#[command(name = "plysearch-arena")]
#[command(about = "Play and record matches between search agents and scripted opponents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Search settings shared by every subcommand.
#[derive(Args, Clone, Debug)]
struct SearchArgs {
    /// Search depth in rounds (every agent moves once per round).
    #[arg(short, long, default_value = "2")]
    depth: usize,

    /// Enable alpha-beta pruning.
    #[arg(long)]
    alpha_beta: bool,

    /// Comma-separated opponent models, agent 1 first
    /// (adversarial, random, greedy). Defaults to all adversarial.
    #[arg(long)]
    models: Option<String>,

    /// JSON search config; overrides depth, alpha-beta and models.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SearchArgs {
    fn resolve(&self, num_agents: usize) -> Result<SearchConfig> {
        if let Some(path) = &self.config {
            return SearchConfig::from_json_file(path)
                .with_context(|| format!("Failed to load search config from {:?}", path));
        }
        let models = match &self.models {
            Some(tags) => tags.parse::<AgentModels>()?,
            None => AgentModels::adversarial(num_agents)?,
        };
        let mut config = SearchConfig::new(self.depth, models);
        config.alpha_beta = self.alpha_beta;
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Board {
    /// One chaser on a 9x5 board.
    Small,
    /// Two chasers on an 11x7 board.
    TwoChasers,
}

#[derive(Subcommand)]
enum Commands {
    /// Play tic-tac-toe; the agent alternates between X and O.
    Tictactoe {
        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Opponent kind.
        #[arg(long, value_enum, default_value = "random")]
        opponent: OpponentKind,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Directory to save match records in.
        #[arg(long)]
        record: Option<PathBuf>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Play chase games with the agent as the runner.
    Chase {
        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Chaser kind.
        #[arg(long, value_enum, default_value = "random")]
        chasers: OpponentKind,

        /// Built-in board.
        #[arg(long, value_enum, default_value = "small")]
        board: Board,

        /// Layout file; overrides --board.
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Maximum runner moves per game.
        #[arg(long, default_value = "200")]
        max_moves: usize,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Directory to save match records in.
        #[arg(long)]
        record: Option<PathBuf>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Search a game tree loaded from JSON and print the decision.
    Solve {
        /// JSON tree file.
        tree: PathBuf,

        /// Number of agents taking turns down the tree.
        #[arg(long, default_value = "2")]
        agents: usize,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Print a saved match record as JSON.
    Show {
        /// MessagePack record file.
        path: PathBuf,
    },
}

fn save(record: &Option<PathBuf>, records: &[MatchRecord]) -> Result<()> {
    if let Some(dir) = record {
        write_records(dir, records)?;
        println!("Records saved to: {:?}", dir);
    }
    Ok(())
}

/// Run the tictactoe command.
fn cmd_tictactoe(
    games: usize,
    opponent: OpponentKind,
    seed: u64,
    record: Option<PathBuf>,
    search: SearchArgs,
) -> Result<()> {
    let config = search.resolve(2)?;
    println!(
        "Playing {} tic-tac-toe games: search (depth {}, {}) vs {}",
        games,
        config.depth,
        if config.alpha_beta { "alpha-beta" } else { "plain" },
        opponent.name()
    );

    let start = Instant::now();
    let records: Vec<MatchRecord> = (0..games)
        .into_par_iter()
        .map(|i| {
            // Alternate seats for fairness
            let game_seed = seed.wrapping_add(i as u64 * 1000);
            play_tictactoe(&config, opponent, i % 2 == 0, game_seed)
        })
        .collect::<Result<_>>()?;

    let tally = Tally::from_records(&records);
    let nodes: u64 = records.iter().map(MatchRecord::nodes_visited).sum();

    println!("\nCompleted in {:.2}s", start.elapsed().as_secs_f64());
    println!("================================================");
    println!("Wins:   {}", tally.wins);
    println!("Draws:  {}", tally.draws);
    println!("Losses: {}", tally.losses);
    println!("------------------------------------------------");
    println!("Win rate: {:.1}%", tally.win_rate() * 100.0);
    println!("States searched: {}", nodes);

    save(&record, &records)
}

/// Run the chase command.
#[allow(clippy::too_many_arguments)]
fn cmd_chase(
    games: usize,
    chasers: OpponentKind,
    board: Board,
    layout: Option<PathBuf>,
    max_moves: usize,
    seed: u64,
    record: Option<PathBuf>,
    search: SearchArgs,
) -> Result<()> {
    let layout = match &layout {
        Some(path) => load_layout(path)?,
        None => match board {
            Board::Small => SMALL_LAYOUT.to_string(),
            Board::TwoChasers => TWO_CHASER_LAYOUT.to_string(),
        },
    };
    let num_agents = plysearch_agent::games::ChaseState::from_layout(&layout)
        .context("invalid chase layout")?
        .chasers()
        .len()
        + 1;
    let config = search.resolve(num_agents)?;
    println!(
        "Playing {} chase games: runner (depth {}, models {}) vs {} {} chaser(s)",
        games,
        config.depth,
        config.models,
        num_agents - 1,
        chasers.name()
    );

    let start = Instant::now();
    let records: Vec<MatchRecord> = (0..games)
        .into_par_iter()
        .map(|i| {
            let game_seed = seed.wrapping_add(i as u64 * 1000);
            play_chase(&config, &layout, chasers, max_moves, game_seed)
        })
        .collect::<Result<_>>()?;

    let cleared = records
        .iter()
        .filter(|r| r.metadata.get("ending") == Some(&serde_json::json!("cleared")))
        .count();
    let caught = records
        .iter()
        .filter(|r| r.metadata.get("ending") == Some(&serde_json::json!("caught")))
        .count();
    let average = records.iter().map(|r| r.outcome as f64).sum::<f64>() / games.max(1) as f64;

    println!("\nCompleted in {:.2}s", start.elapsed().as_secs_f64());
    println!("================================================");
    println!("Cleared:  {}", cleared);
    println!("Caught:   {}", caught);
    println!("Timeouts: {}", records.len() - cleared - caught);
    println!("------------------------------------------------");
    println!("Average score: {:.1}", average);

    save(&record, &records)
}

/// Run the solve command.
fn cmd_solve(tree: PathBuf, agents: usize, search: SearchArgs) -> Result<()> {
    let json = fs::read_to_string(&tree).with_context(|| format!("Failed to read tree {:?}", tree))?;
    let spec = TreeSpec::from_json_str(&json).with_context(|| format!("Failed to parse tree {:?}", tree))?;
    let config = search.resolve(agents)?;

    let agent = AdversarialAgent::with_state_score(config);
    let result = agent.search(&TreeState::new(agents, &spec))?;

    println!("Tree: {} states, {} agents", spec.len(), agents);
    for (action, value) in &result.action_values {
        let marker = if *action == result.best_action { "*" } else { " " };
        println!("{} {:<12} {}", marker, action, value);
    }
    println!("Best action: {}", result.best_action);
    println!("Root value: {}", result.root_value);
    println!("States visited: {}", result.nodes_visited);
    Ok(())
}

/// Run the show command.
fn cmd_show(path: PathBuf) -> Result<()> {
    let record = read_record(&path)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tictactoe {
            games,
            opponent,
            seed,
            record,
            search,
        } => cmd_tictactoe(games, opponent, seed, record, search),

        Commands::Chase {
            games,
            chasers,
            board,
            layout,
            max_moves,
            seed,
            record,
            search,
        } => cmd_chase(games, chasers, board, layout, max_moves, seed, record, search),

        Commands::Solve { tree, agents, search } => cmd_solve(tree, agents, search),

        Commands::Show { path } => cmd_show(path),
    }
}
