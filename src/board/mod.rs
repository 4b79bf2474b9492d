//! Board representation for tic-tac-toe

pub mod bitboard;
pub mod board;


use std::fmt;
use std::str::FromStr;

use crate::error::MoveError;

// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;

/// Board size (3x3)
pub const BOARD_SIZE: usize = 3;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 9

/// Cell contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Piece {
    #[default]
    Empty,
    X,
    O,
}

impl Piece {
    /// Get opponent piece
    #[inline]
    pub fn opponent(self) -> Piece {
        match self {
            Piece::X => Piece::O,
            Piece::O => Piece::X,
            Piece::Empty => Piece::Empty,
        }
    }

    /// Slot used by per-piece tables (X = 0, O = 1). `None` for empty cells.
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            Piece::X => Some(0),
            Piece::O => Some(1),
            Piece::Empty => None,
        }
    }

    /// Single character used in board diagrams
    pub fn symbol(self) -> char {
        match self {
            Piece::X => 'x',
            Piece::O => 'o',
            Piece::Empty => '_',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::X => write!(f, "X"),
            Piece::O => write!(f, "O"),
            Piece::Empty => write!(f, "-"),
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8);
        Self { row, col }
    }

    /// Checked constructor for coordinates from outside the engine
    pub fn try_new(row: i32, col: i32) -> Result<Self, MoveError> {
        if Self::is_valid(row, col) {
            Ok(Self::new(row as u8, col as u8))
        } else {
            Err(MoveError::OutOfBounds { row, col })
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// All nine cells in row-major order
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..TOTAL_CELLS).map(Pos::from_index)
    }
}

/// Parses move notation: a row letter `A`-`C` (any case) followed by a
/// column digit `1`-`3`, e.g. `"b2"`.
impl FromStr for Pos {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(row), Some(col), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(MoveError::InvalidNotation(s.to_string()));
        };

        let row = match row.to_ascii_uppercase() {
            'A' => 0,
            'B' => 1,
            'C' => 2,
            _ => return Err(MoveError::InvalidNotation(s.to_string())),
        };
        let col = match col {
            '1' => 0,
            '2' => 1,
            '3' => 2,
            _ => return Err(MoveError::InvalidNotation(s.to_string())),
        };

        Ok(Pos::new(row, col))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.row) as char, self.col + 1)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}
