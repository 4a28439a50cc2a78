//! Tic-tac-toe as a two-agent search game.
//!
//! Tic-tac-toe is a solved game where perfect play always results in a draw.
//! This makes it ideal for validating the search:
//! - a full-depth minimax player never loses against any opponent
//! - two full-depth minimax players always draw
//!
//! X is agent 0 (the maximizer), O is agent 1.

use plysearch_core::GameState;
use std::fmt;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], // top row
    [3, 4, 5], // middle row
    [6, 7, 8], // bottom row
    [0, 3, 6], // left column
    [1, 4, 7], // center column
    [2, 5, 8], // right column
    [0, 4, 8], // main diagonal
    [2, 4, 6], // anti-diagonal
];

/// Tic-tac-toe mark.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Get the opposing mark.
    pub fn opposite(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Agent index playing this mark.
    pub fn agent(self) -> usize {
        match self {
            Mark::X => 0,
            Mark::O => 1,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Tic-tac-toe board state.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct TicTacToeState {
    /// Board: 9 cells, indexed 0-8 (row-major).
    /// ```text
    /// 0 | 1 | 2
    /// ---------
    /// 3 | 4 | 5
    /// ---------
    /// 6 | 7 | 8
    /// ```
    board: [Option<Mark>; 9],

    /// Mark to move.
    current: Mark,

    /// Cached winner (if any).
    winner: Option<Mark>,
}

impl TicTacToeState {
    /// Create a new empty board with X to move.
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            current: Mark::X,
            winner: None,
        }
    }

    /// Build a position by playing cells in order, starting with X.
    pub fn from_moves(cells: &[u8]) -> Self {
        cells.iter().fold(Self::new(), |state, &cell| state.play(TicTacToeAction(cell)))
    }

    /// Get the mark to move.
    pub fn current(&self) -> Mark {
        self.current
    }

    /// Get the winner, if any.
    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// Get the mark at a cell, if any.
    pub fn get(&self, cell: usize) -> Option<Mark> {
        self.board.get(cell).copied().flatten()
    }

    /// Empty cells, in index order.
    pub fn empty_cells(&self) -> Vec<TicTacToeAction> {
        self.board
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| TicTacToeAction(i as u8))
            .collect()
    }

    /// Number of lines X can still complete.
    pub fn open_lines_for_x(&self) -> usize {
        self.open_lines(Mark::X)
    }

    /// Number of lines O can still complete.
    pub fn open_lines_for_o(&self) -> usize {
        self.open_lines(Mark::O)
    }

    fn open_lines(&self, mark: Mark) -> usize {
        let blocker = Some(mark.opposite());
        LINES
            .iter()
            .filter(|line| line.iter().all(|&c| self.board[c] != blocker))
            .count()
    }

    /// Place the current mark (no legality check beyond the cell index).
    fn play(&self, action: TicTacToeAction) -> Self {
        let mut next = self.clone();
        next.board[action.0 as usize] = Some(self.current);
        next.current = self.current.opposite();
        next.winner = next.check_winner();
        next
    }

    /// Check for a winner on the current board.
    fn check_winner(&self) -> Option<Mark> {
        for line in LINES {
            if let Some(mark) = self.board[line[0]] {
                if self.board[line[1]] == Some(mark) && self.board[line[2]] == Some(mark) {
                    return Some(mark);
                }
            }
        }
        None
    }

    /// Check if the board is full (draw if no winner).
    fn is_full(&self) -> bool {
        self.board.iter().all(|c| c.is_some())
    }
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-----------")?;
            }
            for col in 0..3 {
                if col > 0 {
                    write!(f, "|")?;
                }
                match self.board[row * 3 + col] {
                    Some(mark) => write!(f, " {} ", mark)?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Tic-tac-toe action (cell index 0-8).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TicTacToeAction(pub u8);

impl TicTacToeAction {
    /// Get the row (0-2).
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    pub fn col(self) -> u8 {
        self.0 % 3
    }
}

impl fmt::Display for TicTacToeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

impl GameState for TicTacToeState {
    type Action = TicTacToeAction;

    /// Empty cells when it is `agent`'s turn, nothing otherwise.
    fn legal_actions(&self, agent: usize) -> Vec<Self::Action> {
        if self.is_terminal() || agent != self.current.agent() {
            return Vec::new();
        }
        self.empty_cells()
    }

    fn successor(&self, _agent: usize, action: &Self::Action) -> Self {
        self.play(*action)
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    fn num_agents(&self) -> usize {
        2
    }

    /// +1 if X has won, -1 if O has won, 0 otherwise.
    fn evaluate(&self) -> f32 {
        match self.winner {
            Some(Mark::X) => 1.0,
            Some(Mark::O) => -1.0,
            None => 0.0,
        }
    }
}
