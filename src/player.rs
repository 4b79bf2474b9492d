//! Automatic players
//!
//! Anything that can pick a move for one side implements [`Player`]. The
//! arena and the GUI drive games only through this trait.

use crate::board::{Board, Piece, Pos};
use crate::rules::Outcome;
use crate::search::{SearchConfig, SearchResult, Searcher};

/// An automatic player bound to one piece.
pub trait Player: Send {
    /// The piece this player places
    fn piece(&self) -> Piece;

    /// Short human readable name, used in logs and statistics
    fn name(&self) -> &str;

    /// Choose a move on `board`, or `None` if the game is already over.
    fn choose_move(&mut self, board: &Board) -> Option<Pos>;

    /// Called with the starting board before each game.
    fn new_game(&mut self, _board: &Board) {}

    /// Called with the final board once a game has ended.
    fn observe_outcome(&mut self, _board: &Board, _outcome: Outcome) {}
}

/// Perfect player backed by alpha-beta search.
pub struct MinimaxPlayer {
    piece: Piece,
    searcher: Searcher,
    /// Play random moves instead of searching
    dumb: bool,
}

impl MinimaxPlayer {
    pub fn new(piece: Piece, config: &SearchConfig) -> Self {
        Self {
            piece,
            searcher: Searcher::new(config),
            dumb: false,
        }
    }

    /// A player that plays random empty cells.
    pub fn dumb(piece: Piece, config: &SearchConfig) -> Self {
        Self {
            dumb: true,
            ..Self::new(piece, config)
        }
    }

    #[inline]
    pub fn is_dumb(&self) -> bool {
        self.dumb
    }

    /// Full search result for the current position.
    pub fn analyze(&mut self, board: &Board) -> SearchResult {
        self.searcher.search(board, self.piece)
    }

    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }
}

impl Player for MinimaxPlayer {
    fn piece(&self) -> Piece {
        self.piece
    }

    fn name(&self) -> &str {
        if self.dumb {
            "random"
        } else {
            "minimax"
        }
    }

    fn choose_move(&mut self, board: &Board) -> Option<Pos> {
        if self.dumb {
            if crate::rules::winner(board).is_some() {
                return None;
            }
            return self.searcher.random_move(board);
        }
        self.analyze(board).best_move
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SearchConfig {
        SearchConfig {
            seed: Some(11),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_minimax_player_wins_when_possible() {
        let mut player = MinimaxPlayer::new(Piece::O, &config());
        let board = Board::from_rows(["oxx", "o_x", "___"]).unwrap();
        assert_eq!(player.piece(), Piece::O);
        assert_eq!(player.name(), "minimax");
        assert_eq!(player.choose_move(&board), Some(Pos::new(2, 0)));
    }

    #[test]
    fn test_dumb_player_plays_legal_moves() {
        let mut player = MinimaxPlayer::dumb(Piece::X, &config());
        assert!(player.is_dumb());
        let mut board = Board::new();
        let mut piece = Piece::X;
        for _ in 0..9 {
            let mv = if piece == Piece::X {
                player.choose_move(&board).unwrap()
            } else {
                board.empty_cells()[0]
            };
            assert!(board.is_empty(mv));
            board.place(mv, piece);
            if crate::rules::winner(&board).is_some() {
                break;
            }
            piece = piece.opponent();
        }
    }

    #[test]
    fn test_no_move_on_finished_board() {
        let board = Board::from_rows(["xxx", "oo_", "___"]).unwrap();
        let mut smart = MinimaxPlayer::new(Piece::O, &config());
        let mut dumb = MinimaxPlayer::dumb(Piece::O, &config());
        assert_eq!(smart.choose_move(&board), None);
        assert_eq!(dumb.choose_move(&board), None);
    }
}
