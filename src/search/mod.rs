//! Search module for the tic-tac-toe AI
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Transposition table for caching search results
//! - Alpha-Beta (negamax) search over the full game tree

pub mod alphabeta;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{SearchConfig, SearchResult, SearchStats, Searcher};
pub use tt::{score_from_tt, score_to_tt, EntryType, TTEntry, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;
