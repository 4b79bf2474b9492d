//! Game state management for the tic-tac-toe GUI

use crate::arena::MatchStats;
use crate::config::Config;
use crate::search::{SearchConfig, Searcher};
use crate::{
    AIEngine, Board, EngineConfig, Game, MoveError, MoveResult, Outcome, Piece, Player, Pos,
    Strategy,
};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Piece played by the AI in human-vs-AI games
pub const AI_PIECE: Piece = Piece::X;
/// Piece played by the human in human-vs-AI games
pub const HUMAN_PIECE: Piece = Piece::O;

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Player vs AI
    PvE { opponent: Strategy },
    /// Player vs Player (hotseat)
    PvP { show_suggestions: bool },
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::PvE {
            opponent: Strategy::Minimax,
        }
    }
}

/// AI computation state.
///
/// The engine is moved into the worker thread and sent back with its
/// result, so the learner keeps its values between moves. A reply for an
/// earlier game (older `generation`) only hands the engine back.
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<(AIEngine, MoveResult)>,
        start_time: Instant,
        strategy: Strategy,
        generation: u64,
    },
}

/// Move timer for tracking thinking time
pub struct MoveTimer {
    pub start_time: Option<Instant>,
    pub last_move_duration: Option<Duration>,
    pub ai_thinking_time: Option<Duration>,
}

impl Default for MoveTimer {
    fn default() -> Self {
        Self {
            start_time: Some(Instant::now()),
            last_move_duration: None,
            ai_thinking_time: None,
        }
    }
}

impl MoveTimer {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) -> Duration {
        let duration = self.elapsed();
        self.last_move_duration = Some(duration);
        self.start_time = None;
        duration
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    pub fn set_ai_time(&mut self, duration: Duration) {
        self.ai_thinking_time = Some(duration);
    }
}

/// Main game state
pub struct GameState {
    pub game: Game,
    pub mode: GameMode,
    /// AI moves first in the current human-vs-AI game
    pub ai_first: bool,
    /// Swap the starting side after every finished game
    pub alternate_first: bool,
    pub last_ai_result: Option<MoveResult>,
    pub ai_state: AiState,
    pub move_timer: MoveTimer,
    pub suggested_move: Option<Pos>,
    pub message: Option<String>,
    /// Session results; "first" is the AI, "second" the human
    pub session: MatchStats,

    engine: Option<AIEngine>,
    engine_config: EngineConfig,
    hint: Searcher,
    /// Bumped on every reset
    generation: u64,
}

impl GameState {
    pub fn new(mode: GameMode, config: &Config) -> Self {
        let engine_config = config.engine_config();
        let engine = match mode {
            GameMode::PvE { opponent } => Some(AIEngine::new(opponent, AI_PIECE, &engine_config)),
            GameMode::PvP { .. } => None,
        };
        let hint = Searcher::new(&SearchConfig {
            shuffle_moves: false,
            ..engine_config.search.clone()
        });

        let mut state = Self {
            game: Game::new(Piece::X),
            mode,
            ai_first: config.ui.ai_first,
            alternate_first: config.ui.alternate_first,
            last_ai_result: None,
            ai_state: AiState::Idle,
            move_timer: MoveTimer::default(),
            suggested_move: None,
            message: None,
            session: MatchStats::default(),
            engine,
            engine_config,
            hint,
            generation: 0,
        };
        state.reset();
        state
    }

    #[inline]
    pub fn board(&self) -> &Board {
        self.game.board()
    }

    #[inline]
    pub fn current_turn(&self) -> Piece {
        self.game.to_move()
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.game.outcome()
    }

    /// Start a new game with the current settings
    pub fn reset(&mut self) {
        let first = match self.mode {
            GameMode::PvE { .. } if self.ai_first => AI_PIECE,
            GameMode::PvE { .. } => HUMAN_PIECE,
            GameMode::PvP { .. } => Piece::X,
        };
        self.game = Game::new(first);
        // A reply still in flight belongs to the old game
        self.generation += 1;
        if let Some(engine) = self.engine.as_mut() {
            engine.new_game(self.game.board());
        }
        self.last_ai_result = None;
        self.move_timer = MoveTimer::default();
        self.suggested_move = None;
        self.message = None;
        debug!(mode = ?self.mode, %first, "new game");
    }

    /// Start the next game, swapping the starting side if enabled
    pub fn new_game(&mut self) {
        if self.alternate_first && self.game.is_over() {
            self.ai_first = !self.ai_first;
        }
        self.reset();
    }

    /// Switch mode. The AI engine (and anything the learner has learned)
    /// is kept when the opponent strategy does not change.
    pub fn set_mode(&mut self, mode: GameMode) {
        let current = match (&self.engine, &self.ai_state) {
            (Some(engine), _) => Some(engine.strategy()),
            (None, AiState::Thinking { strategy, .. }) => Some(*strategy),
            (None, AiState::Idle) => None,
        };
        let same_engine =
            matches!(mode, GameMode::PvE { opponent } if current == Some(opponent));
        self.mode = mode;
        if !same_engine {
            self.rebuild_engine();
        }
        self.reset();
    }

    fn rebuild_engine(&mut self) {
        self.engine = match self.mode {
            GameMode::PvE { opponent } => {
                Some(AIEngine::new(opponent, AI_PIECE, &self.engine_config))
            }
            GameMode::PvP { .. } => None,
        };
    }

    /// Take back an engine whose reply was for an earlier game, unless the
    /// mode has moved on to another opponent since.
    fn restore_engine(&mut self, mut engine: AIEngine) {
        let wanted = matches!(
            self.mode,
            GameMode::PvE { opponent } if opponent == engine.strategy()
        );
        if self.engine.is_none() && wanted {
            engine.new_game(self.game.board());
            self.engine = Some(engine);
        }
    }

    /// Number of board states the learner has values for
    pub fn learned_states(&self) -> Option<usize> {
        self.engine
            .as_ref()
            .and_then(|e| e.learner())
            .map(|l| l.values().len())
    }

    /// Check if it's the human's turn
    pub fn is_human_turn(&self) -> bool {
        match self.mode {
            GameMode::PvE { .. } => self.current_turn() == HUMAN_PIECE,
            GameMode::PvP { .. } => true,
        }
    }

    /// Check if it's the AI's turn
    pub fn is_ai_turn(&self) -> bool {
        match self.mode {
            GameMode::PvE { .. } => self.current_turn() == AI_PIECE,
            GameMode::PvP { .. } => false,
        }
    }

    /// Check if AI is currently thinking
    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Attempt to place a piece for the human at the given position
    pub fn try_place(&mut self, pos: Pos) -> Result<(), String> {
        if self.game.is_over() {
            return Err(MoveError::GameOver.to_string());
        }

        if self.is_ai_thinking() {
            return Err("AI is thinking".to_string());
        }

        if !self.is_human_turn() {
            return Err("Not your turn".to_string());
        }

        self.execute_move(pos).map_err(|e| e.to_string())
    }

    /// Play a move for the side to move (human or AI)
    fn execute_move(&mut self, pos: Pos) -> Result<(), MoveError> {
        let outcome = self.game.play(pos)?;
        self.suggested_move = None;
        self.move_timer.stop();
        self.message = None;

        match outcome {
            Some(outcome) => self.finish_game(outcome),
            None => self.move_timer.start(),
        }
        Ok(())
    }

    fn finish_game(&mut self, outcome: Outcome) {
        if let Some(engine) = self.engine.as_mut() {
            engine.observe_outcome(self.game.board(), outcome);
            match outcome {
                Outcome::Win(AI_PIECE) => self.session.first_wins += 1,
                Outcome::Win(_) => self.session.second_wins += 1,
                Outcome::Draw => self.session.draws += 1,
            }
            info!(?outcome, session = %self.session, "game over");
        }
    }

    /// Start AI thinking
    pub fn start_ai_thinking(&mut self) {
        if !self.is_ai_turn() || self.is_ai_thinking() || self.game.is_over() {
            return;
        }
        let Some(mut engine) = self.engine.take() else {
            return;
        };

        let board = *self.game.board();
        let strategy = engine.strategy();
        let (tx, rx) = channel();

        thread::spawn(move || {
            let result = engine.get_move_with_stats(&board);
            let _ = tx.send((engine, result));
        });

        self.ai_state = AiState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
            strategy,
            generation: self.generation,
        };
    }

    /// Check if AI has finished thinking
    pub fn check_ai_result(&mut self) {
        let result = match &self.ai_state {
            AiState::Thinking {
                receiver,
                start_time,
                generation,
                ..
            } => match receiver.try_recv() {
                Ok((engine, result)) => {
                    Some((engine, result, start_time.elapsed(), *generation))
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    warn!("AI worker exited without a result");
                    self.ai_state = AiState::Idle;
                    if self.engine.is_none() {
                        self.rebuild_engine();
                    }
                    self.message = Some("AI error".to_string());
                    return;
                }
            },
            AiState::Idle => None,
        };

        if let Some((engine, move_result, elapsed, generation)) = result {
            self.ai_state = AiState::Idle;
            if generation != self.generation {
                debug!(stale = generation, current = self.generation, "dropped AI reply");
                self.restore_engine(engine);
                return;
            }
            self.engine = Some(engine);
            self.last_ai_result = Some(move_result.clone());
            self.move_timer.set_ai_time(elapsed);

            match move_result.best_move {
                Some(pos) => {
                    if let Err(e) = self.execute_move(pos) {
                        warn!(%pos, error = %e, "AI played an illegal move");
                        self.message = Some(e.to_string());
                    }
                }
                None => self.message = Some("AI could not find a move".to_string()),
            }
        }
    }

    /// Get AI thinking elapsed time
    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Suggest the best move for the side to move
    pub fn request_suggestion(&mut self) {
        if self.game.is_over() || self.is_ai_thinking() {
            return;
        }

        let result = self.hint.search(self.game.board(), self.current_turn());
        self.suggested_move = result.best_move;
        self.message = result
            .best_move
            .map(|pos| format!("Hint: {pos} ({})", describe_score(result.score)));
    }

    /// Whether undo is allowed in the current mode
    pub fn can_undo(&self) -> bool {
        let learner = self
            .engine
            .as_ref()
            .is_some_and(|e| e.strategy() == Strategy::Learner);
        !learner && !self.game.history().is_empty() && !self.is_ai_thinking()
    }

    /// Undo last move (in PvE, the human's last move and the AI reply)
    pub fn undo(&mut self) {
        if !self.can_undo() {
            return;
        }

        let mut undo_count = match self.mode {
            GameMode::PvE { .. } if self.game.history().len() >= 2 => 2,
            _ => 1,
        };
        // After a human win only the human move needs taking back
        if matches!(self.mode, GameMode::PvE { .. })
            && self.game.outcome() == Some(Outcome::Win(HUMAN_PIECE))
        {
            undo_count = 1;
        }

        for _ in 0..undo_count {
            self.game.undo();
        }
        self.suggested_move = None;
        self.message = None;
        self.move_timer.start();
    }
}

/// Describe an exact minimax score for the side to move
pub fn describe_score(score: i32) -> String {
    use crate::eval::WIN_SCORE;
    match score {
        0 => "draw with best play".to_string(),
        s if s > 0 => format!("wins in {}", WIN_SCORE - s),
        s => format!("loses in {}", WIN_SCORE + s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        let mut config = Config::default();
        config.common.seed = Some(1);
        config.ui.alternate_first = true;
        config
    }

    fn wait_for_ai(state: &mut GameState) {
        for _ in 0..500 {
            state.check_ai_result();
            if !state.is_ai_thinking() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("AI did not answer");
    }

    #[test]
    fn test_pvp_turns_and_errors() {
        let mut state = GameState::new(GameMode::PvP { show_suggestions: true }, &config());
        assert!(state.is_human_turn());
        assert!(!state.is_ai_turn());
        assert_eq!(state.current_turn(), Piece::X);

        state.try_place(Pos::new(1, 1)).unwrap();
        assert_eq!(state.current_turn(), Piece::O);
        assert!(state.try_place(Pos::new(1, 1)).is_err());

        state.undo();
        assert!(state.board().is_board_empty());
    }

    #[test]
    fn test_hint_blocks_threat() {
        let mut state = GameState::new(GameMode::PvP { show_suggestions: true }, &config());
        for pos in [Pos::new(0, 0), Pos::new(1, 1), Pos::new(0, 1)] {
            state.try_place(pos).unwrap();
        }
        state.request_suggestion();
        assert_eq!(state.suggested_move, Some(Pos::new(0, 2)));
        assert!(state.message.is_some());
    }

    #[test]
    fn test_pve_ai_replies() {
        let mode = GameMode::PvE {
            opponent: Strategy::Minimax,
        };
        let mut state = GameState::new(mode, &config());
        assert!(state.is_human_turn());
        assert!(state.try_place(Pos::new(0, 0)).is_ok());
        assert!(state.is_ai_turn());
        assert!(state.try_place(Pos::new(2, 2)).is_err());

        state.start_ai_thinking();
        assert!(state.is_ai_thinking());
        wait_for_ai(&mut state);

        assert_eq!(state.board().piece_count(), 2);
        assert!(state.is_human_turn());
        assert!(state.last_ai_result.is_some());
    }

    #[test]
    fn test_learner_persists_and_alternates() {
        let mode = GameMode::PvE {
            opponent: Strategy::Learner,
        };
        let mut state = GameState::new(mode, &config());
        assert!(!state.ai_first);
        assert!(!state.can_undo());

        // Human takes the middle column where free, then any cell
        while !state.game.is_over() {
            if state.is_ai_turn() {
                state.start_ai_thinking();
                wait_for_ai(&mut state);
            } else {
                let pos = [Pos::new(0, 1), Pos::new(1, 1), Pos::new(2, 1)]
                    .into_iter()
                    .chain(state.board().empty_cells())
                    .find(|&p| state.board().is_empty(p))
                    .unwrap();
                state.try_place(pos).unwrap();
            }
        }
        let learned = state.learned_states().unwrap();
        assert!(learned > 1);
        assert_eq!(state.session.total(), 1);

        state.new_game();
        assert!(state.ai_first);
        assert_eq!(state.current_turn(), AI_PIECE);

        // Same opponent keeps the learned table
        state.set_mode(mode);
        assert_eq!(state.learned_states(), Some(learned));
        state.set_mode(GameMode::PvP { show_suggestions: false });
        assert_eq!(state.learned_states(), None);
    }

    #[test]
    fn test_reset_while_thinking_keeps_learner() {
        let mode = GameMode::PvE {
            opponent: Strategy::Learner,
        };
        let mut cfg = config();
        cfg.ui.ai_first = true;
        let mut state = GameState::new(mode, &cfg);
        assert!(state.is_ai_turn());

        state.start_ai_thinking();
        wait_for_ai(&mut state);
        let learned = state.learned_states().unwrap();
        assert!(learned > 1);

        let pos = state.board().empty_cells()[0];
        state.try_place(pos).unwrap();
        state.start_ai_thinking();
        assert!(state.is_ai_thinking());
        state.reset();
        assert!(state.board().is_board_empty());

        // The old game's reply is dropped, its engine kept
        wait_for_ai(&mut state);
        assert!(state.board().is_board_empty());
        assert!(state.learned_states().unwrap() >= learned);

        state.start_ai_thinking();
        wait_for_ai(&mut state);
        assert_eq!(state.board().piece_count(), 1);
        assert!(state.learned_states().unwrap() >= learned);
    }

    #[test]
    fn test_describe_score() {
        assert_eq!(describe_score(0), "draw with best play");
        assert_eq!(describe_score(9), "wins in 1");
        assert_eq!(describe_score(-8), "loses in 2");
    }
}
