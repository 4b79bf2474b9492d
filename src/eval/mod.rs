//! Evaluation module for tic-tac-toe positions
//!
//! The board is small enough that search always reaches terminal positions,
//! so evaluation only needs to recognise finished games.

pub mod heuristic;

pub use heuristic::{evaluate, WIN_SCORE};
