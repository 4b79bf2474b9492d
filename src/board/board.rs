//! Board structure

use std::fmt;

use super::bitboard::Bitboard;
use super::{Piece, Pos, BOARD_SIZE};
use crate::error::MoveError;

/// Game board: one bitboard per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    /// X pieces bitboard
    pub x: Bitboard,
    /// O pieces bitboard
    pub o: Bitboard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            x: Bitboard::new(),
            o: Bitboard::new(),
        }
    }

    /// Build a board from three row diagrams, top row first.
    ///
    /// `x`/`X` and `o`/`O` are pieces; `_`, `.`, `-` and space are empty.
    ///
    /// ```
    /// use tictactoe::{Board, Piece, Pos};
    ///
    /// let board = Board::from_rows(["x_o", "_x_", "o__"]).unwrap();
    /// assert_eq!(board.get(Pos::new(1, 1)), Piece::X);
    /// ```
    pub fn from_rows(rows: [&str; BOARD_SIZE]) -> Result<Self, MoveError> {
        let mut board = Board::new();
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            if cells.len() != BOARD_SIZE {
                return Err(MoveError::InvalidDiagram(line.to_string()));
            }
            for (col, ch) in cells.into_iter().enumerate() {
                let pos = Pos::new(row as u8, col as u8);
                match ch {
                    'x' | 'X' => board.place(pos, Piece::X),
                    'o' | 'O' => board.place(pos, Piece::O),
                    '_' | '.' | '-' | ' ' => {}
                    _ => return Err(MoveError::InvalidDiagram(line.to_string())),
                }
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get piece at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Piece {
        if self.x.get(pos) {
            Piece::X
        } else if self.o.get(pos) {
            Piece::O
        } else {
            Piece::Empty
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.x.get(pos) && !self.o.get(pos)
    }

    /// Place a piece. Occupied cells are left untouched; use
    /// [`crate::Game::play`] for checked game moves.
    #[inline]
    pub fn place(&mut self, pos: Pos, piece: Piece) {
        if !self.is_empty(pos) {
            return;
        }
        match piece {
            Piece::X => self.x.set(pos),
            Piece::O => self.o.set(pos),
            Piece::Empty => {}
        }
    }

    /// Remove a piece
    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        self.x.clear(pos);
        self.o.clear(pos);
    }

    /// Get bitboard for a piece (returns None for Empty)
    #[inline]
    pub fn pieces(&self, piece: Piece) -> Option<&Bitboard> {
        match piece {
            Piece::X => Some(&self.x),
            Piece::O => Some(&self.o),
            Piece::Empty => None,
        }
    }

    /// Bitboard of all occupied cells
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.x | self.o
    }

    /// Total pieces on board
    #[inline]
    pub fn piece_count(&self) -> u32 {
        self.x.count() + self.o.count()
    }

    /// Check if board is empty
    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.x.is_empty() && self.o.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.piece_count() as usize == BOARD_SIZE * BOARD_SIZE
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Pos> {
        Pos::all().filter(|&p| self.is_empty(p)).collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   1 2 3")?;
        for row in 0..BOARD_SIZE as u8 {
            write!(f, "{} ", (b'A' + row) as char)?;
            for col in 0..BOARD_SIZE as u8 {
                write!(f, " {}", self.get(Pos::new(row, col)).symbol())?;
            }
            if row + 1 < BOARD_SIZE as u8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
