//! GUI module for playing tic-tac-toe against the engine
//!
//! A native Rust GUI using egui/eframe. The AI plays X, the human plays O.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::TicTacToeApp;
pub use game_state::{describe_score, GameMode, GameState, AI_PIECE, HUMAN_PIECE};
