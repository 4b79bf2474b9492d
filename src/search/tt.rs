//! Transposition Table for caching search results
//!
//! The transposition table stores search results indexed by board hash,
//! enabling reuse of previous search results for positions we've seen before.
//! Tic-tac-toe has only 5478 legal positions, so a small table holds the
//! whole game tree and repeated searches become near-free.
//!
//! # Example
//!
//! ```
//! use tictactoe::board::Pos;
//! use tictactoe::search::{TranspositionTable, EntryType};
//!
//! let mut tt = TranspositionTable::new(1 << 12);
//!
//! // Store a search result
//! let hash = 0x123456789ABCDEF0;
//! tt.store(hash, 5, 0, 7, EntryType::Exact, Some(Pos::new(1, 1)));
//!
//! // Probe for the result
//! if let Some((score, best_move)) = tt.probe(hash, 5, 0, -1000, 1000) {
//!     println!("Found cached result: score={:?}, move={:?}", score, best_move);
//! }
//! ```

use crate::board::Pos;

/// Entry type for score interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Exact score - the search completed normally
    Exact,
    /// Lower bound - score >= stored value (beta cutoff)
    LowerBound,
    /// Upper bound - score <= stored value (alpha fail-low)
    UpperBound,
}

/// Transposition table entry
#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    /// Zobrist key of the position (including side to move)
    pub hash: u64,
    /// Remaining depth searched below this entry
    pub depth: u8,
    /// Score relative to this node (see [`score_to_tt`])
    pub score: i32,
    /// Type of score (exact, lower bound, upper bound)
    pub entry_type: EntryType,
    /// Best move found for this position
    pub best_move: Option<Pos>,
}

/// Convert a root-relative score into a node-relative one before storing.
///
/// Win scores shrink by one per ply from the root, so the same position
/// reached at a different ply must not reuse the raw value.
#[inline]
pub fn score_to_tt(score: i32, ply: u8) -> i32 {
    match score {
        s if s > 0 => s + i32::from(ply),
        s if s < 0 => s - i32::from(ply),
        _ => 0,
    }
}

/// Inverse of [`score_to_tt`] for the ply where the entry is probed
#[inline]
pub fn score_from_tt(score: i32, ply: u8) -> i32 {
    match score {
        s if s > 0 => s - i32::from(ply),
        s if s < 0 => s + i32::from(ply),
        _ => 0,
    }
}

/// Transposition table for caching search results.
///
/// Uses a simple direct-mapped approach where each hash maps to exactly
/// one slot. Collisions are handled by replacement policies based on
/// search depth.
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    size: usize,
}

impl TranspositionTable {
    /// Create a new transposition table with (at least) the given number of slots.
    #[must_use]
    pub fn new(entries: usize) -> Self {
        let size = entries.max(64);
        Self {
            entries: vec![None; size],
            size,
        }
    }

    /// Probe the table for a position reached at `ply` from the root.
    ///
    /// Returns `Some((score, best_move))` if an entry is found. When the
    /// stored bound is not usable for the current window the score is `None`
    /// but the best move is still returned for move ordering.
    #[must_use]
    pub fn probe(
        &self,
        hash: u64,
        depth: u8,
        ply: u8,
        alpha: i32,
        beta: i32,
    ) -> Option<(Option<i32>, Option<Pos>)> {
        let idx = (hash as usize) % self.size;
        let entry = self.entries[idx]?;

        if entry.hash != hash {
            return None;
        }

        // Can use score if stored search was at least as deep
        if entry.depth >= depth {
            let score = score_from_tt(entry.score, ply);
            match entry.entry_type {
                EntryType::Exact => return Some((Some(score), entry.best_move)),
                EntryType::LowerBound if score >= beta => {
                    return Some((Some(score), entry.best_move));
                }
                EntryType::UpperBound if score <= alpha => {
                    return Some((Some(score), entry.best_move));
                }
                _ => {}
            }
        }

        Some((None, entry.best_move))
    }

    /// Get best move from the table for move ordering.
    #[must_use]
    pub fn get_best_move(&self, hash: u64) -> Option<Pos> {
        let idx = (hash as usize) % self.size;
        self.entries[idx].and_then(|e| if e.hash == hash { e.best_move } else { None })
    }

    /// Store a root-relative `score` for a position reached at `ply`.
    ///
    /// Depth-preferred replacement: an entry is replaced if the slot is
    /// empty, contains the same position, or the new search is at least as
    /// deep as the existing entry.
    pub fn store(
        &mut self,
        hash: u64,
        depth: u8,
        ply: u8,
        score: i32,
        entry_type: EntryType,
        best_move: Option<Pos>,
    ) {
        let idx = (hash as usize) % self.size;

        let should_replace = match &self.entries[idx] {
            None => true,
            Some(e) => e.hash == hash || e.depth <= depth,
        };

        if should_replace {
            self.entries[idx] = Some(TTEntry {
                hash,
                depth,
                score: score_to_tt(score, ply),
                entry_type,
                best_move,
            });
        }
    }

    /// Clear all entries in the table.
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }

    /// Get statistics about table usage.
    #[must_use]
    pub fn stats(&self) -> TTStats {
        let used = self.entries.iter().filter(|e| e.is_some()).count();
        TTStats {
            size: self.size,
            used,
            usage_percent: (used as f64 / self.size as f64 * 100.0) as u8,
        }
    }
}

/// Statistics about transposition table usage.
#[derive(Debug, Clone, Copy)]
pub struct TTStats {
    /// Total number of slots in the table
    pub size: usize,
    /// Number of slots currently occupied
    pub used: usize,
    /// Percentage of table in use (0-100)
    pub usage_percent: u8,
}
