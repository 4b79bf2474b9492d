//! Alpha-Beta search with transposition table
//!
//! Negamax with alpha-beta pruning over the full game tree. A 3x3 board is
//! small enough that every search runs to terminal positions, so scores are
//! exact: `WIN_SCORE - ply` for a win reached at `ply`, the negation for a
//! loss, and 0 for a draw. Faster wins and slower losses are preferred.
//!
//! # Example
//!
//! ```
//! use tictactoe::board::{Board, Piece, Pos};
//! use tictactoe::search::{SearchConfig, Searcher};
//!
//! let mut searcher = Searcher::new(&SearchConfig::default());
//! let board = Board::from_rows(["xx_", "oo_", "___"]).unwrap();
//!
//! let result = searcher.search(&board, Piece::X);
//! assert_eq!(result.best_move, Some(Pos::new(0, 2)));
//! ```

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Piece, Pos, TOTAL_CELLS};
use crate::eval::{evaluate, WIN_SCORE};

use super::{EntryType, TTStats, TranspositionTable, ZobristTable};

/// Infinity score for alpha-beta bounds
const INF: i32 = 1000;

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    /// Total TT probes
    pub tt_probes: u64,
    /// TT probes that returned a usable score (exact/bound hit)
    pub tt_score_hits: u64,
    /// TT probes that provided a best move for ordering
    pub tt_move_hits: u64,
}

impl SearchStats {
    /// Share of cutoffs produced by the first move tried
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }

    /// TT score hit rate
    pub fn tt_score_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_score_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found, `None` only when the game is already over
    pub best_move: Option<Pos>,
    /// Exact score of the position for the side to move
    pub score: i32,
    /// Total nodes searched
    pub nodes: u64,
    /// Search diagnostics
    pub stats: SearchStats,
}

/// Searcher settings
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Shuffle candidate moves at every node so equal moves vary between games
    pub shuffle_moves: bool,
    /// Number of transposition table slots
    pub tt_entries: usize,
    /// RNG seed for shuffling and random moves; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            shuffle_moves: false,
            tt_entries: 1 << 14,
            seed: None,
        }
    }
}

/// Minimax searcher.
///
/// Owns its own Zobrist keys and transposition table, so cached results
/// persist between moves of a game and across games.
pub struct Searcher {
    zobrist: ZobristTable,
    tt: TranspositionTable,
    rng: ChaCha8Rng,
    shuffle_moves: bool,
    nodes: u64,
    stats: SearchStats,
}

impl Searcher {
    /// Create a new searcher from the given settings.
    #[must_use]
    pub fn new(config: &SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            zobrist: ZobristTable::new(),
            tt: TranspositionTable::new(config.tt_entries),
            rng,
            shuffle_moves: config.shuffle_moves,
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    /// Find the best move for `to_move`.
    ///
    /// Searches to the end of the game. If the game is already decided or
    /// the board is full, returns no move and the static score.
    pub fn search(&mut self, board: &Board, to_move: Piece) -> SearchResult {
        self.nodes = 0;
        self.stats = SearchStats::default();

        let static_score = evaluate(board, to_move);
        if static_score != 0 || board.is_full() {
            return SearchResult {
                best_move: None,
                score: static_score,
                nodes: 0,
                stats: SearchStats::default(),
            };
        }

        let mut work = *board;
        let hash = self.zobrist.hash(&work);
        let key = self.zobrist.side_key(hash, to_move);
        let moves = self.order_moves(&work, self.tt.get_best_move(key));

        let mut alpha = -INF;
        let beta = INF;
        let mut best_score = -INF;
        let mut best_move = None;

        for pos in moves {
            work.place(pos, to_move);
            let child = self.zobrist.update(hash, pos, to_move);
            let score = -self.negamax(&mut work, child, to_move.opponent(), 1, -beta, -alpha);
            work.remove(pos);

            if score > best_score {
                best_score = score;
                best_move = Some(pos);
            }
            alpha = alpha.max(best_score);
        }

        self.tt.store(
            key,
            remaining_depth(board),
            0,
            best_score,
            EntryType::Exact,
            best_move,
        );

        SearchResult {
            best_move,
            score: best_score,
            nodes: self.nodes,
            stats: self.stats.clone(),
        }
    }

    /// Pick a uniformly random empty cell ("dumb" play).
    pub fn random_move(&mut self, board: &Board) -> Option<Pos> {
        board.empty_cells().choose(&mut self.rng).copied()
    }

    /// Get transposition table statistics.
    pub fn tt_stats(&self) -> TTStats {
        self.tt.stats()
    }

    /// Forget all cached positions.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        hash: u64,
        color: Piece,
        ply: u8,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;

        let eval = evaluate(board, color);
        if eval != 0 {
            return eval - eval.signum() * i32::from(ply);
        }
        if board.is_full() {
            return 0;
        }

        let depth = remaining_depth(board);
        let key = self.zobrist.side_key(hash, color);
        let alpha_orig = alpha;

        self.stats.tt_probes += 1;
        let mut tt_move = None;
        if let Some((score, mv)) = self.tt.probe(key, depth, ply, alpha, beta) {
            if let Some(score) = score {
                self.stats.tt_score_hits += 1;
                return score;
            }
            if mv.is_some() {
                self.stats.tt_move_hits += 1;
            }
            tt_move = mv;
        }

        let moves = self.order_moves(board, tt_move);
        let mut best_score = -INF;
        let mut best_move = None;

        for (i, pos) in moves.into_iter().enumerate() {
            board.place(pos, color);
            let child = self.zobrist.update(hash, pos, color);
            let score = -self.negamax(board, child, color.opponent(), ply + 1, -beta, -alpha);
            board.remove(pos);

            if score > best_score {
                best_score = score;
                best_move = Some(pos);
            }
            alpha = alpha.max(best_score);
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
        }

        let entry_type = if best_score <= alpha_orig {
            EntryType::UpperBound
        } else if best_score >= beta {
            EntryType::LowerBound
        } else {
            EntryType::Exact
        };
        self.tt.store(key, depth, ply, best_score, entry_type, best_move);

        best_score
    }

    /// Empty cells in row-major order (shuffled if enabled), with the
    /// cached best move, if any, moved to the front.
    fn order_moves(&mut self, board: &Board, tt_move: Option<Pos>) -> Vec<Pos> {
        let mut moves = board.empty_cells();
        if self.shuffle_moves {
            moves.shuffle(&mut self.rng);
        }
        if let Some(mv) = tt_move {
            if let Some(idx) = moves.iter().position(|&p| p == mv) {
                moves[..=idx].rotate_right(1);
            }
        }
        moves
    }
}

/// Plies left until the board is full; every search runs this deep.
#[inline]
fn remaining_depth(board: &Board) -> u8 {
    (TOTAL_CELLS as u32 - board.piece_count()) as u8
}
