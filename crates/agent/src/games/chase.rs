//! Grid pursuit game with one runner and any number of chasers.
//!
//! The runner (agent 0) collects dots; chasers (agents 1..n) try to catch
//! it. Layouts are plain text:
//!
//! ```text
//! %%%%%%%%%
//! %R......%
//! %.%%.%%.%
//! %...C...%
//! %%%%%%%%%
//! ```
//!
//! `%` is a wall, `.` a dot, `R` the runner, `C` a chaser and a space an
//! empty cell. Scoring: -1 per runner move, +10 per dot, +500 for clearing
//! the board, -500 for being caught. Chasers cannot stand still unless
//! boxed in.

use plysearch_core::GameState;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Points for eating a dot.
pub const DOT_REWARD: i32 = 10;
/// Points lost per runner move.
pub const TIME_PENALTY: i32 = 1;
/// Points for clearing every dot.
pub const WIN_REWARD: i32 = 500;
/// Points lost when caught.
pub const CAUGHT_PENALTY: i32 = 500;

/// One chaser in a corridor loop.
pub const SMALL_LAYOUT: &str = "\
%%%%%%%%%
%R......%
%.%%.%%.%
%...C...%
%%%%%%%%%";

/// Two chasers on a wider board.
pub const TWO_CHASER_LAYOUT: &str = "\
%%%%%%%%%%%
%R........%
%.%%%.%%%.%
%....C....%
%.%%%.%%%.%
%........C%
%%%%%%%%%%%";

/// Errors raised while parsing a layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,

    #[error("row {row} has width {width}, expected {expected}")]
    Ragged { row: usize, width: usize, expected: usize },

    #[error("unknown cell {cell:?} at row {row}, column {column}")]
    UnknownCell { cell: char, row: usize, column: usize },

    #[error("layout has no runner")]
    MissingRunner,

    #[error("layout has more than one runner")]
    MultipleRunners,

    #[error("layout has no chaser")]
    NoChasers,
}

/// Grid coordinate; `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance.
    pub fn distance(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Move direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Stop,
}

impl Direction {
    /// Moving directions, in the order legal actions are listed.
    pub const MOVES: [Direction; 4] = [Direction::North, Direction::South, Direction::East, Direction::West];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Cleared,
    Caught,
}

#[derive(Debug)]
struct Grid {
    width: usize,
    height: usize,
    walls: Vec<bool>,
}

impl Grid {
    fn is_open(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height && !self.walls[pos.y * self.width + pos.x]
    }

    fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        let next = match dir {
            Direction::North => Position::new(pos.x, pos.y.checked_sub(1)?),
            Direction::South => Position::new(pos.x, pos.y + 1),
            Direction::East => Position::new(pos.x + 1, pos.y),
            Direction::West => Position::new(pos.x.checked_sub(1)?, pos.y),
            Direction::Stop => pos,
        };
        self.is_open(next).then_some(next)
    }
}

/// Chase game state.
#[derive(Clone, Debug)]
pub struct ChaseState {
    grid: Arc<Grid>,
    runner: Position,
    chasers: Vec<Position>,
    dots: Vec<bool>,
    dots_left: usize,
    score: i32,
    outcome: Option<Outcome>,
}

impl ChaseState {
    /// Parse a text layout.
    pub fn from_layout(layout: &str) -> Result<Self, LayoutError> {
        let mut rows: Vec<&str> = layout
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .skip_while(|l| l.is_empty())
            .collect();
        // Blank lines around the grid are padding, not rows.
        while rows.last().is_some_and(|l| l.is_empty()) {
            rows.pop();
        }
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut walls = Vec::with_capacity(width * rows.len());
        let mut dots = Vec::with_capacity(width * rows.len());
        let mut runner = None;
        let mut chasers = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().collect();
            if cells.len() != width {
                return Err(LayoutError::Ragged {
                    row: y,
                    width: cells.len(),
                    expected: width,
                });
            }
            for (x, &cell) in cells.iter().enumerate() {
                walls.push(cell == '%');
                dots.push(cell == '.');
                match cell {
                    '%' | '.' | ' ' => {}
                    'R' => {
                        if runner.replace(Position::new(x, y)).is_some() {
                            return Err(LayoutError::MultipleRunners);
                        }
                    }
                    'C' => chasers.push(Position::new(x, y)),
                    _ => {
                        return Err(LayoutError::UnknownCell {
                            cell,
                            row: y,
                            column: x,
                        })
                    }
                }
            }
        }

        let runner = runner.ok_or(LayoutError::MissingRunner)?;
        if chasers.is_empty() {
            return Err(LayoutError::NoChasers);
        }
        let dots_left = dots.iter().filter(|&&d| d).count();

        Ok(Self {
            grid: Arc::new(Grid {
                width,
                height: rows.len(),
                walls,
            }),
            runner,
            chasers,
            dots,
            dots_left,
            score: 0,
            outcome: None,
        })
    }

    pub fn runner(&self) -> Position {
        self.runner
    }

    pub fn chasers(&self) -> &[Position] {
        &self.chasers
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn dots_left(&self) -> usize {
        self.dots_left
    }

    /// True if a dot lies at `pos`.
    pub fn has_dot(&self, pos: Position) -> bool {
        self.grid.is_open(pos) && self.dots[pos.y * self.grid.width + pos.x]
    }

    /// Manhattan distance from the runner to the closest dot.
    pub fn nearest_dot_distance(&self) -> Option<usize> {
        let width = self.grid.width;
        self.dots
            .iter()
            .enumerate()
            .filter(|(_, dot)| **dot)
            .map(|(i, _)| self.runner.distance(Position::new(i % width, i / width)))
            .min()
    }

    /// Manhattan distance from the runner to the closest chaser.
    pub fn nearest_chaser_distance(&self) -> usize {
        self.chasers
            .iter()
            .map(|&c| self.runner.distance(c))
            .min()
            .unwrap_or(usize::MAX)
    }

    fn position(&self, agent: usize) -> Position {
        if agent == 0 {
            self.runner
        } else {
            self.chasers[agent - 1]
        }
    }

    fn resolve(&mut self) {
        if self.chasers.contains(&self.runner) {
            self.score -= CAUGHT_PENALTY;
            self.outcome = Some(Outcome::Caught);
        } else if self.dots_left == 0 {
            self.score += WIN_REWARD;
            self.outcome = Some(Outcome::Cleared);
        }
    }
}

impl GameState for ChaseState {
    type Action = Direction;

    /// Open directions for the agent. The runner may always stop; a chaser
    /// only when it cannot move.
    fn legal_actions(&self, agent: usize) -> Vec<Direction> {
        if self.is_terminal() || agent > self.chasers.len() {
            return Vec::new();
        }
        let pos = self.position(agent);
        let mut actions: Vec<Direction> = Direction::MOVES
            .into_iter()
            .filter(|&dir| self.grid.step(pos, dir).is_some())
            .collect();
        if agent == 0 || actions.is_empty() {
            actions.push(Direction::Stop);
        }
        actions
    }

    /// # Panics
    /// Panics if `agent` is not an agent of this game.
    fn successor(&self, agent: usize, action: &Direction) -> Self {
        let mut next = self.clone();
        if next.is_terminal() {
            return next;
        }
        let pos = next.position(agent);
        let target = next.grid.step(pos, *action).unwrap_or(pos);

        if agent == 0 {
            next.runner = target;
            next.score -= TIME_PENALTY;
            let cell = target.y * next.grid.width + target.x;
            if next.dots[cell] {
                next.dots[cell] = false;
                next.dots_left -= 1;
                next.score += DOT_REWARD;
            }
        } else {
            next.chasers[agent - 1] = target;
        }
        next.resolve();
        next
    }

    fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    fn num_agents(&self) -> usize {
        1 + self.chasers.len()
    }

    fn evaluate(&self) -> f32 {
        self.score as f32
    }
}

impl fmt::Display for ChaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.grid.height {
            for x in 0..self.grid.width {
                let pos = Position::new(x, y);
                let cell = if self.chasers.contains(&pos) {
                    'C'
                } else if pos == self.runner {
                    'R'
                } else if !self.grid.is_open(pos) {
                    '%'
                } else if self.has_dot(pos) {
                    '.'
                } else {
                    ' '
                };
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        write!(f, "score {}", self.score)
    }
}

/// Hand-tuned heuristic: score, plus a pull toward the nearest dot and a
/// push away from the nearest chaser.
pub fn pursuit_evaluation(state: &ChaseState) -> f32 {
    let score = state.score() as f32;
    if state.is_terminal() {
        return score;
    }
    let food = state
        .nearest_dot_distance()
        .map_or(0.0, |d| 10.0 / (1.0 + d as f32));
    let danger = match state.nearest_chaser_distance() {
        0 | 1 => -200.0,
        d => d.min(5) as f32,
    };
    score + food + danger
}
