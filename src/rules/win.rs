//! Win condition checking
//!
//! Lines are checked in the order rows, columns, diagonals. On a legal
//! board at most one side can own a line, so the order only matters for
//! which line is reported when a single move completes two at once.

use crate::board::{Board, Piece, Pos};

/// A line of three cells: its bit mask and its positions
#[derive(Debug, Clone, Copy)]
pub struct Line {
    pub mask: u16,
    pub cells: [Pos; 3],
}

const fn line(a: usize, b: usize, c: usize) -> Line {
    Line {
        mask: (1 << a) | (1 << b) | (1 << c),
        cells: [
            Pos { row: (a / 3) as u8, col: (a % 3) as u8 },
            Pos { row: (b / 3) as u8, col: (b % 3) as u8 },
            Pos { row: (c / 3) as u8, col: (c % 3) as u8 },
        ],
    }
}

/// All eight winning lines
pub const WIN_LINES: [Line; 8] = [
    // Rows
    line(0, 1, 2),
    line(3, 4, 5),
    line(6, 7, 8),
    // Columns
    line(0, 3, 6),
    line(1, 4, 7),
    line(2, 5, 8),
    // Diagonals
    line(0, 4, 8),
    line(2, 4, 6),
];

/// Final result of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win(Piece),
    Draw,
}

impl Outcome {
    /// Winning piece, if any
    pub fn winner(self) -> Option<Piece> {
        match self {
            Outcome::Win(piece) => Some(piece),
            Outcome::Draw => None,
        }
    }
}

/// First completed line and its owner
fn find_line(board: &Board) -> Option<(Piece, &'static Line)> {
    WIN_LINES.iter().find_map(|line| {
        if board.x.contains_all(line.mask) {
            Some((Piece::X, line))
        } else if board.o.contains_all(line.mask) {
            Some((Piece::O, line))
        } else {
            None
        }
    })
}

/// Piece that owns a completed line
pub fn winner(board: &Board) -> Option<Piece> {
    find_line(board).map(|(piece, _)| piece)
}

/// Positions of the completed line, if any
pub fn winning_line(board: &Board) -> Option<[Pos; 3]> {
    find_line(board).map(|(_, line)| line.cells)
}

/// Win for the owner of a line, draw on a full board, otherwise `None`
pub fn check_outcome(board: &Board) -> Option<Outcome> {
    if let Some(piece) = winner(board) {
        return Some(Outcome::Win(piece));
    }
    if board.is_full() {
        return Some(Outcome::Draw);
    }
    None
}

/// A move is valid when the cell is empty
#[inline]
pub fn is_valid_move(board: &Board, pos: Pos) -> bool {
    Pos::is_valid(i32::from(pos.row), i32::from(pos.col)) && board.is_empty(pos)
}
