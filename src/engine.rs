//! Main AI engine dispatching to the configured strategy
//!
//! Wraps one of the automatic players behind a single type that the GUI and
//! the arena can drive, and reports what kind of decision produced each move:
//!
//! 1. **Minimax**: full alpha-beta search, exact score
//! 2. **Learner**: greedy TD(0) move or an exploratory random move
//! 3. **Random**: a uniformly random empty cell
//!
//! # Example
//!
//! ```
//! use tictactoe::{AIEngine, Board, EngineConfig, Piece, Pos, SearchType, Strategy};
//!
//! let mut engine = AIEngine::new(Strategy::Minimax, Piece::O, &EngineConfig::default());
//! let board = Board::from_rows(["xx_", "o__", "___"]).unwrap();
//!
//! let result = engine.get_move_with_stats(&board);
//! assert_eq!(result.best_move, Some(Pos::new(0, 2)));
//! assert_eq!(result.search_type, SearchType::Minimax);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::Deserialize;

use crate::board::{Board, Piece, Pos};
use crate::learn::{Learner, LearnerConfig};
use crate::player::{MinimaxPlayer, Player};
use crate::rules::Outcome;
use crate::search::{SearchConfig, TTStats};

/// Which kind of player an engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Minimax,
    Learner,
    Random,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Minimax, Strategy::Learner, Strategy::Random];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Minimax => "minimax",
            Strategy::Learner => "learner",
            Strategy::Random => "random",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimax" => Ok(Strategy::Minimax),
            "learner" => Ok(Strategy::Learner),
            "random" | "dumb" => Ok(Strategy::Random),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

/// Type of decision that produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Full alpha-beta search
    Minimax,
    /// Learner picked its highest valued afterstate
    Greedy,
    /// Learner played an exploratory random move
    Exploration,
    /// Random empty cell
    Random,
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Best move found, `None` when the game is over
    pub best_move: Option<Pos>,
    /// Minimax: exact score for the engine. Learner: afterstate value in
    /// percent. Random: 0.
    pub score: i32,
    /// Type of decision that found this move
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched (minimax only)
    pub nodes: u64,
}

/// Settings for every strategy an engine may run
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub learner: LearnerConfig,
}

enum Brain {
    Minimax(MinimaxPlayer),
    Learner(Learner),
}

/// AI engine for one side of the board.
pub struct AIEngine {
    strategy: Strategy,
    brain: Brain,
}

impl AIEngine {
    /// Create an engine playing `piece` with the given strategy.
    pub fn new(strategy: Strategy, piece: Piece, config: &EngineConfig) -> Self {
        let brain = match strategy {
            Strategy::Minimax => Brain::Minimax(MinimaxPlayer::new(piece, &config.search)),
            Strategy::Random => Brain::Minimax(MinimaxPlayer::dumb(piece, &config.search)),
            Strategy::Learner => Brain::Learner(Learner::new(piece, config.learner.clone())),
        };
        Self { strategy, brain }
    }

    /// Wrap an existing learner (e.g. one trained in the arena).
    pub fn from_learner(learner: Learner) -> Self {
        Self {
            strategy: Strategy::Learner,
            brain: Brain::Learner(learner),
        }
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the best move for the engine's piece.
    pub fn get_move(&mut self, board: &Board) -> Option<Pos> {
        self.get_move_with_stats(board).best_move
    }

    /// Get the best move with search statistics.
    pub fn get_move_with_stats(&mut self, board: &Board) -> MoveResult {
        let start = Instant::now();

        let (best_move, score, search_type, nodes) = match &mut self.brain {
            Brain::Minimax(player) if player.is_dumb() => {
                (player.choose_move(board), 0, SearchType::Random, 0)
            }
            Brain::Minimax(player) => {
                let result = player.analyze(board);
                (result.best_move, result.score, SearchType::Minimax, result.nodes)
            }
            Brain::Learner(learner) => match learner.choose(board) {
                Some(mv) => {
                    let search_type = if mv.explored {
                        SearchType::Exploration
                    } else {
                        SearchType::Greedy
                    };
                    let score = (mv.value * 100.0).round() as i32;
                    (Some(mv.pos), score, search_type, 0)
                }
                None => (None, 0, SearchType::Greedy, 0),
            },
        };

        MoveResult {
            best_move,
            score,
            search_type,
            time_ms: start.elapsed().as_millis() as u64,
            nodes,
        }
    }

    /// The learner, when running the learner strategy
    pub fn learner(&self) -> Option<&Learner> {
        match &self.brain {
            Brain::Learner(learner) => Some(learner),
            Brain::Minimax(_) => None,
        }
    }

    pub fn learner_mut(&mut self) -> Option<&mut Learner> {
        match &mut self.brain {
            Brain::Learner(learner) => Some(learner),
            Brain::Minimax(_) => None,
        }
    }

    /// Get transposition table statistics (minimax only)
    pub fn tt_stats(&self) -> Option<TTStats> {
        match &self.brain {
            Brain::Minimax(player) => Some(player.searcher().tt_stats()),
            Brain::Learner(_) => None,
        }
    }

    fn player(&self) -> &dyn Player {
        match &self.brain {
            Brain::Minimax(player) => player,
            Brain::Learner(learner) => learner,
        }
    }

    fn player_mut(&mut self) -> &mut dyn Player {
        match &mut self.brain {
            Brain::Minimax(player) => player,
            Brain::Learner(learner) => learner,
        }
    }
}

impl Player for AIEngine {
    fn piece(&self) -> Piece {
        self.player().piece()
    }

    fn name(&self) -> &str {
        self.strategy.name()
    }

    fn choose_move(&mut self, board: &Board) -> Option<Pos> {
        self.get_move(board)
    }

    fn new_game(&mut self, board: &Board) {
        self.player_mut().new_game(board);
    }

    fn observe_outcome(&mut self, board: &Board, outcome: Outcome) {
        self.player_mut().observe_outcome(board, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::WIN_SCORE;

    fn config() -> EngineConfig {
        EngineConfig {
            search: SearchConfig {
                seed: Some(1),
                ..SearchConfig::default()
            },
            learner: LearnerConfig {
                seed: Some(1),
                shuffle_moves: false,
                ..LearnerConfig::default()
            },
        }
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("Minimax".parse::<Strategy>(), Ok(Strategy::Minimax));
        assert_eq!(" learner ".parse::<Strategy>(), Ok(Strategy::Learner));
        assert_eq!("dumb".parse::<Strategy>(), Ok(Strategy::Random));
        assert!("alphazero".parse::<Strategy>().is_err());
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_minimax_engine_stats() {
        let mut engine = AIEngine::new(Strategy::Minimax, Piece::X, &config());
        let board = Board::from_rows(["xx_", "oo_", "___"]).unwrap();
        let result = engine.get_move_with_stats(&board);
        assert_eq!(result.best_move, Some(Pos::new(0, 2)));
        assert_eq!(result.score, WIN_SCORE - 1);
        assert_eq!(result.search_type, SearchType::Minimax);
        assert!(result.nodes > 0);
        assert!(engine.tt_stats().is_some());
        assert!(engine.learner().is_none());
    }

    #[test]
    fn test_learner_engine_stats() {
        let mut engine = AIEngine::new(Strategy::Learner, Piece::X, &config());
        let board = Board::from_rows(["xx_", "oo_", "___"]).unwrap();
        let result = engine.get_move_with_stats(&board);
        assert_eq!(result.best_move, Some(Pos::new(0, 2)));
        assert_eq!(result.score, 100);
        assert_eq!(result.search_type, SearchType::Greedy);
        assert!(engine.learner().is_some());
        assert!(engine.tt_stats().is_none());
    }

    #[test]
    fn test_exploring_learner_engine() {
        let mut cfg = config();
        cfg.learner.epsilon = 1.0;
        let mut engine = AIEngine::new(Strategy::Learner, Piece::O, &cfg);
        let result = engine.get_move_with_stats(&Board::from_rows(["x__", "___", "___"]).unwrap());
        assert_eq!(result.search_type, SearchType::Exploration);
    }

    #[test]
    fn test_random_engine() {
        let mut engine = AIEngine::new(Strategy::Random, Piece::O, &config());
        let board = Board::from_rows(["xox", "xo_", "oxo"]).unwrap();
        let result = engine.get_move_with_stats(&board);
        assert_eq!(result.best_move, Some(Pos::new(1, 2)));
        assert_eq!(result.search_type, SearchType::Random);
        assert_eq!(engine.name(), "random");
        assert_eq!(engine.piece(), Piece::O);
    }

    #[test]
    fn test_no_move_when_game_over() {
        let board = Board::from_rows(["ooo", "xx_", "x__"]).unwrap();
        for strategy in Strategy::ALL {
            let mut engine = AIEngine::new(strategy, Piece::X, &config());
            assert_eq!(engine.get_move(&board), None, "{strategy}");
        }
    }
}
