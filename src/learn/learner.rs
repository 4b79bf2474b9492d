//! TD(0) learner player
//!
//! The learner evaluates each candidate move by the value of the board it
//! leads to (the afterstate) and plays the best one. After every greedy move
//! both the current state and the previous afterstate are pulled towards the
//! value of the chosen afterstate. After a defeat the final board is marked
//! lost and the last afterstate is pulled towards it.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::board::{Board, Piece, Pos};
use crate::eval::evaluate;
use crate::player::Player;
use crate::rules::{winner, Outcome};
use crate::search::ZobristTable;

use super::value_table::{ValueTable, INITIAL_VALUE, LOSS_VALUE, WIN_VALUE};

/// Learning parameters
#[derive(Debug, Clone)]
pub struct LearnerConfig {
    /// Learning rate in `(0, 1]`
    pub alpha: f64,
    /// Probability of an exploratory random move, in `[0, 1]`
    pub epsilon: f64,
    /// Shuffle candidate moves before choosing, so ties break randomly
    pub shuffle_moves: bool,
    /// RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            epsilon: 0.0,
            shuffle_moves: true,
            seed: None,
        }
    }
}

/// A move chosen by the learner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnerMove {
    pub pos: Pos,
    /// Value of the resulting afterstate
    pub value: f64,
    /// Random exploratory move (no learning step was taken)
    pub explored: bool,
}

/// Reinforcement learning player.
pub struct Learner {
    piece: Piece,
    config: LearnerConfig,
    zobrist: ZobristTable,
    values: ValueTable,
    rng: ChaCha8Rng,
    /// Hash of the learner's previous afterstate
    last_hash: u64,
    exploring_move_done: bool,
}

impl Learner {
    pub fn new(piece: Piece, config: LearnerConfig) -> Self {
        Self::with_values(piece, config, ValueTable::new())
    }

    /// Create a learner that starts from previously learned values.
    pub fn with_values(piece: Piece, config: LearnerConfig, values: ValueTable) -> Self {
        debug_assert!(piece != Piece::Empty);
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut learner = Self {
            piece,
            config,
            zobrist: ZobristTable::new(),
            values,
            rng,
            last_hash: 0,
            exploring_move_done: false,
        };
        learner.start(&Board::new());
        learner
    }

    #[inline]
    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    #[inline]
    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// Take the learned values, leaving an empty table.
    pub fn take_values(&mut self) -> ValueTable {
        std::mem::take(&mut self.values)
    }

    #[inline]
    pub fn zobrist(&self) -> &ZobristTable {
        &self.zobrist
    }

    /// Learned value of a board, if it has been seen
    pub fn value_of(&self, board: &Board) -> Option<f64> {
        self.values.get(self.zobrist.hash(board))
    }

    /// Hash of the previous afterstate
    #[inline]
    pub fn last_hash(&self) -> u64 {
        self.last_hash
    }

    /// Whether an exploratory move has been played since the last reset
    #[inline]
    pub fn exploring_move_flag(&self) -> bool {
        self.exploring_move_done
    }

    pub fn reset_exploring_move_flag(&mut self) {
        self.exploring_move_done = false;
    }

    /// Choose a move and apply the learning step.
    ///
    /// Returns `None` if the game is already decided or the board is full.
    pub fn choose(&mut self, board: &Board) -> Option<LearnerMove> {
        if evaluate(board, self.piece) != 0 || board.is_full() {
            return None;
        }

        let hash = self.zobrist.hash(board);
        if self.values.get(hash).is_none() {
            trace!(hash, "new board state, init to {INITIAL_VALUE}");
            self.values.set(hash, INITIAL_VALUE);
        }

        let mut moves = board.empty_cells();
        if self.config.shuffle_moves {
            moves.shuffle(&mut self.rng);
        }

        // Exploration leaves the value table and the last afterstate alone
        if self.rng.gen::<f64>() < self.config.epsilon {
            let pos = *moves.choose(&mut self.rng)?;
            let after = self.zobrist.update(hash, pos, self.piece);
            let value = self.values.get(after).unwrap_or(INITIAL_VALUE);
            self.exploring_move_done = true;
            debug!(piece = %self.piece, %pos, "exploring move");
            return Some(LearnerMove {
                pos,
                value,
                explored: true,
            });
        }

        // Greedy: highest valued afterstate, first one wins ties
        let mut best: Option<(Pos, u64, f64)> = None;
        for pos in moves {
            let (after, value, wins) = self.afterstate(board, hash, pos);
            trace!(%pos, value, wins, "evaluated move");
            if best.map_or(true, |(_, _, best_value)| value > best_value) {
                best = Some((pos, after, value));
            }
            if wins {
                break;
            }
        }
        let (pos, best_hash, value) = best?;

        let alpha = self.config.alpha;
        let current = self.values.td_update(hash, best_hash, alpha);
        let last = self.values.td_update(self.last_hash, best_hash, alpha);
        debug!(
            piece = %self.piece,
            %pos,
            value,
            current,
            last,
            "greedy move, values updated"
        );
        self.last_hash = best_hash;

        Some(LearnerMove {
            pos,
            value,
            explored: false,
        })
    }

    /// Learn from a finished game that the learner lost.
    ///
    /// Marks the final board as lost and pulls the last afterstate towards
    /// it. Does nothing if the board is not a defeat.
    pub fn learn_from_defeat(&mut self, board: &Board) {
        if evaluate(board, self.piece) >= 0 {
            return;
        }
        let hash = self.zobrist.hash(board);
        self.values.set_loss(hash);
        let last = self.values.td_update(self.last_hash, hash, self.config.alpha);
        debug!(piece = %self.piece, last, "learned from defeat");
    }

    /// Reset the previous afterstate to `board` at the start of a game.
    fn start(&mut self, board: &Board) {
        let hash = self.zobrist.hash(board);
        if self.values.get(hash).is_none() {
            let value = match evaluate(board, self.piece) {
                s if s > 0 => WIN_VALUE,
                s if s < 0 => LOSS_VALUE,
                _ => INITIAL_VALUE,
            };
            self.values.set(hash, value);
        }
        self.last_hash = hash;
    }

    /// Hash, value and win flag of the board after playing `pos`.
    ///
    /// A winning afterstate is (re)set to the win value; unseen ones are
    /// initialised.
    fn afterstate(&mut self, board: &Board, hash: u64, pos: Pos) -> (u64, f64, bool) {
        let after = self.zobrist.update(hash, pos, self.piece);
        let mut next = *board;
        next.place(pos, self.piece);
        if winner(&next) == Some(self.piece) {
            self.values.set_win(after);
            (after, WIN_VALUE, true)
        } else {
            (after, self.values.get_or_init(after), false)
        }
    }
}

impl Player for Learner {
    fn piece(&self) -> Piece {
        self.piece
    }

    fn name(&self) -> &str {
        "learner"
    }

    fn choose_move(&mut self, board: &Board) -> Option<Pos> {
        self.choose(board).map(|mv| mv.pos)
    }

    fn new_game(&mut self, board: &Board) {
        self.start(board);
        self.reset_exploring_move_flag();
    }

    fn observe_outcome(&mut self, board: &Board, outcome: Outcome) {
        if let Outcome::Win(piece) = outcome {
            if piece != self.piece {
                self.learn_from_defeat(board);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn learner(piece: Piece, alpha: f64, epsilon: f64) -> Learner {
        Learner::new(
            piece,
            LearnerConfig {
                alpha,
                epsilon,
                shuffle_moves: false,
                seed: Some(7),
            },
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_start_state_initialised() {
        let l = learner(Piece::X, 0.1, 0.0);
        assert_eq!(l.last_hash(), 0);
        assert_eq!(l.values().get(0), Some(INITIAL_VALUE));
    }

    #[test]
    fn test_takes_winning_move_and_updates() {
        let mut l = learner(Piece::X, 0.5, 0.0);
        let board = Board::from_rows(["xx_", "oo_", "___"]).unwrap();

        let mv = l.choose(&board).unwrap();
        assert_eq!(mv.pos, Pos::new(0, 2));
        assert_eq!(mv.value, WIN_VALUE);
        assert!(!mv.explored);

        let mut after = board;
        after.place(mv.pos, Piece::X);
        assert_eq!(l.value_of(&after), Some(WIN_VALUE));
        // V(current) = 0.5 + 0.5 * (1.0 - 0.5)
        assert!(approx(l.value_of(&board).unwrap(), 0.75));
        // V(last) = V(empty board) pulled the same way
        assert!(approx(l.values().get(0).unwrap(), 0.75));
        assert_eq!(l.last_hash(), l.zobrist().hash(&after));
    }

    #[test]
    fn test_first_move_wins_ties() {
        let mut l = learner(Piece::X, 0.1, 0.0);
        let mv = l.choose(&Board::new()).unwrap();
        assert_eq!(mv.pos, Pos::new(0, 0));
        assert_eq!(mv.value, INITIAL_VALUE);
        // Nothing to learn when every value is the initial one
        assert_eq!(l.values().get(0), Some(INITIAL_VALUE));
    }

    #[test]
    fn test_prefers_higher_valued_afterstate() {
        let mut l = learner(Piece::O, 0.1, 0.0);
        let board = Board::from_rows(["x__", "___", "___"]).unwrap();
        let mut good = board;
        good.place(Pos::new(1, 1), Piece::O);
        let good_hash = l.zobrist().hash(&good);
        l.values.set(good_hash, 0.9);

        let mv = l.choose(&board).unwrap();
        assert_eq!(mv.pos, Pos::new(1, 1));
        assert!(approx(mv.value, 0.9));
    }

    #[test]
    fn test_learn_from_defeat() {
        let mut l = learner(Piece::X, 0.1, 0.0);
        l.new_game(&Board::new());
        let first = l.choose(&Board::new()).unwrap();
        assert_eq!(first.pos, Pos::new(0, 0));
        let last = l.last_hash();
        assert_eq!(l.values().get(last), Some(INITIAL_VALUE));

        let lost = Board::from_rows(["xx_", "ooo", "x__"]).unwrap();
        l.observe_outcome(&lost, Outcome::Win(Piece::O));

        assert_eq!(l.value_of(&lost), Some(LOSS_VALUE));
        assert!(approx(l.values().get(last).unwrap(), 0.45));
    }

    #[test]
    fn test_no_learning_without_defeat() {
        let mut l = learner(Piece::X, 0.1, 0.0);
        let won = Board::from_rows(["xxx", "oo_", "___"]).unwrap();
        let before = l.values().len();
        l.learn_from_defeat(&won);
        l.observe_outcome(&won, Outcome::Win(Piece::X));
        assert_eq!(l.values().len(), before);
        assert_eq!(l.value_of(&won), None);
    }

    #[test]
    fn test_no_move_when_decided() {
        let mut l = learner(Piece::O, 0.1, 0.0);
        let won = Board::from_rows(["xxx", "oo_", "___"]).unwrap();
        assert_eq!(l.choose(&won), None);
        let full = Board::from_rows(["xox", "xoo", "oxx"]).unwrap();
        assert_eq!(l.choose_move(&full), None);
    }

    #[test]
    fn test_exploring_move_skips_update() {
        let mut l = learner(Piece::X, 0.5, 1.0);
        let board = Board::from_rows(["xx_", "oo_", "___"]).unwrap();

        let mv = l.choose(&board).unwrap();
        assert!(mv.explored);
        assert!(l.exploring_move_flag());
        assert_eq!(l.value_of(&board), Some(INITIAL_VALUE));
        assert_eq!(l.values().get(0), Some(INITIAL_VALUE));
        assert_eq!(l.last_hash(), 0);

        let before = l.values().len();
        let last = l.last_hash();
        let mv = l.choose(&board).unwrap();
        assert!(mv.explored);
        assert_eq!(l.last_hash(), last);
        assert_eq!(l.values().len(), before);

        let mut after = board;
        after.place(mv.pos, Piece::X);
        assert_eq!(l.value_of(&after), None);

        l.new_game(&Board::new());
        assert!(!l.exploring_move_flag());
        assert_eq!(l.last_hash(), 0);
    }

    #[test]
    fn test_exploration_ignores_move_order() {
        let mut seen = std::collections::HashSet::new();
        for seed in 0..50 {
            let mut l = Learner::new(
                Piece::X,
                LearnerConfig {
                    epsilon: 1.0,
                    shuffle_moves: false,
                    seed: Some(seed),
                    ..LearnerConfig::default()
                },
            );
            let mv = l.choose(&Board::new()).unwrap();
            assert!(mv.explored);
            assert_eq!(l.last_hash(), 0);
            seen.insert(mv.pos);
        }
        assert!(seen.len() > 1, "exploration always played {seen:?}");
    }

    #[test]
    fn test_new_game_marks_decided_start() {
        let mut l = learner(Piece::O, 0.1, 0.0);
        let lost = Board::from_rows(["xxx", "oo_", "___"]).unwrap();
        l.new_game(&lost);
        assert_eq!(l.value_of(&lost), Some(LOSS_VALUE));
        assert_eq!(l.last_hash(), l.zobrist().hash(&lost));
    }
}
