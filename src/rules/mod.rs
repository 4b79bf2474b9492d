//! Game rules for tic-tac-toe
//!
//! Three in a row (horizontal, vertical or diagonal) wins; a full board
//! without a line is a draw.

pub mod win;

pub use win::{check_outcome, is_valid_move, winner, winning_line, Outcome, WIN_LINES};
