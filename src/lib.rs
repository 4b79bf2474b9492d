//! Tic-tac-toe engine with a minimax player and a learning player
//!
//! Two automatic players on a 3x3 board:
//! - **Minimax**: negamax with alpha-beta pruning over the full game tree,
//!   cached in a transposition table. It never loses.
//! - **Learner**: a tabular TD(0) agent. Each board state it meets gets a
//!   value (its estimated chance of winning) keyed by the board's Zobrist
//!   hash, and values move towards the value of the next chosen state:
//!   `V(s) += alpha * (V(s') - V(s))`.
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Winning lines and move validation
//! - [`eval`]: Position evaluation
//! - [`game`]: A game in progress with history and undo
//! - [`search`]: Zobrist hashing, transposition table, alpha-beta search
//! - [`learn`]: Value table and the TD(0) learner
//! - [`player`]: The [`Player`] trait driven by the arena and the GUI
//! - [`engine`]: AI engine dispatching to a [`Strategy`]
//! - [`arena`]: AI-vs-AI series with statistics
//! - [`config`]: `tictactoe.toml` and environment configuration
//!
//! # Quick Start
//!
//! ```
//! use tictactoe::{AIEngine, EngineConfig, Game, Outcome, Piece, Strategy};
//!
//! let config = EngineConfig::default();
//! let mut x = AIEngine::new(Strategy::Minimax, Piece::X, &config);
//! let mut o = AIEngine::new(Strategy::Minimax, Piece::O, &config);
//!
//! let mut game = Game::new(Piece::X);
//! while !game.is_over() {
//!     let engine = if game.to_move() == Piece::X { &mut x } else { &mut o };
//!     let pos = engine.get_move(game.board()).unwrap();
//!     game.play(pos).unwrap();
//! }
//! // Perfect play is always a draw
//! assert_eq!(game.outcome(), Some(Outcome::Draw));
//! ```

pub mod arena;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod learn;
pub mod player;
pub mod rules;
pub mod search;
pub mod ui;

// Re-export commonly used types for convenience
pub use arena::{play_game, Arena, GameRecord, MatchStats};
pub use board::{Board, Piece, Pos, BOARD_SIZE};
pub use config::{init_tracing, load_config, Config};
pub use engine::{AIEngine, EngineConfig, MoveResult, SearchType, Strategy};
pub use error::{ConfigError, MoveError};
pub use game::Game;
pub use learn::{Learner, LearnerConfig, ValueTable};
pub use player::{MinimaxPlayer, Player};
pub use rules::Outcome;
