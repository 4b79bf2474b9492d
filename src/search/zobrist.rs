//! Zobrist hashing for position identification
//!
//! Zobrist hashing allows O(1) incremental hash updates when placing/removing pieces.
//! The same hash keys the learner's value table and, combined with the
//! side-to-move key, the transposition table.
//!
//! # Example
//!
//! ```
//! use tictactoe::board::{Board, Piece, Pos};
//! use tictactoe::search::ZobristTable;
//!
//! let zt = ZobristTable::new();
//! let mut board = Board::new();
//!
//! // The empty board hashes to zero
//! let hash1 = zt.hash(&board);
//! assert_eq!(hash1, 0);
//!
//! // Place a piece and compute new hash
//! let pos = Pos::new(1, 1);
//! board.place(pos, Piece::X);
//! let hash2 = zt.hash(&board);
//!
//! // Incremental update is equivalent to full recomputation
//! assert_eq!(zt.update(hash1, pos, Piece::X), hash2);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Piece, Pos, TOTAL_CELLS};

/// Seed used by [`ZobristTable::new`]
const DEFAULT_SEED: u64 = 0x1234_5678_9ABC_DEF0;

/// Zobrist hash table for position hashing.
///
/// Holds one random value per (cell, piece) combination. A position's hash
/// is the XOR of the values of its occupied cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristTable {
    /// Random values: [cell index][piece index (X = 0, O = 1)]
    keys: [[u64; 2]; TOTAL_CELLS],
    /// Random value XORed into search keys when X is to move
    x_to_move: u64,
}

impl ZobristTable {
    /// Create a table from a fixed seed, so hashes are reproducible across runs.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a table from the given seed
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// Create a table with values drawn from `rng`
    #[must_use]
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let mut keys = [[0u64; 2]; TOTAL_CELLS];
        for cell in keys.iter_mut() {
            for key in cell.iter_mut() {
                *key = rng.gen();
            }
        }
        Self {
            keys,
            x_to_move: rng.gen(),
        }
    }

    /// Create a table from externally supplied values (e.g. a saved table,
    /// so that previously learned hashes stay valid).
    #[must_use]
    pub fn from_keys(keys: [[u64; 2]; TOTAL_CELLS]) -> Self {
        let x_to_move = keys
            .iter()
            .flatten()
            .fold(DEFAULT_SEED, |acc, &k| acc.rotate_left(7) ^ k);
        Self { keys, x_to_move }
    }

    /// Raw per-cell values
    #[must_use]
    pub fn keys(&self) -> &[[u64; 2]; TOTAL_CELLS] {
        &self.keys
    }

    /// Compute the full hash for a board position.
    #[must_use]
    pub fn hash(&self, board: &Board) -> u64 {
        let mut h = 0u64;

        for pos in board.x.iter_ones() {
            h ^= self.keys[pos.to_index()][0];
        }

        for pos in board.o.iter_ones() {
            h ^= self.keys[pos.to_index()][1];
        }

        h
    }

    /// Incrementally update a hash after placing or removing `piece` at `pos`.
    ///
    /// XOR is its own inverse, so the same call undoes a placement.
    #[inline]
    #[must_use]
    pub fn update(&self, hash: u64, pos: Pos, piece: Piece) -> u64 {
        match piece.index() {
            Some(slot) => hash ^ self.keys[pos.to_index()][slot],
            None => hash,
        }
    }

    /// Combine a position hash with the side to move (transposition table key)
    #[inline]
    #[must_use]
    pub fn side_key(&self, hash: u64, to_move: Piece) -> u64 {
        if to_move == Piece::X {
            hash ^ self.x_to_move
        } else {
            hash
        }
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}
