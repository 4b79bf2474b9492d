//! A single game in progress: turn order, move history and result

use crate::board::{Board, Piece, Pos};
use crate::error::{MoveError, Result};
use crate::rules::{check_outcome, winning_line, Outcome};

/// A game being played on one board.
///
/// The number of pieces on the board always equals the number of moves in
/// the history.
///
/// ```
/// use tictactoe::{Game, Outcome, Piece};
///
/// let mut game = Game::new(Piece::X);
/// for mv in ["a1", "b1", "a2", "b2"] {
///     game.play_notation(mv).unwrap();
/// }
/// assert_eq!(game.play_notation("a3").unwrap(), Some(Outcome::Win(Piece::X)));
/// assert!(game.is_over());
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    first: Piece,
    to_move: Piece,
    history: Vec<(Pos, Piece)>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Start an empty game where `first` moves first
    pub fn new(first: Piece) -> Self {
        debug_assert!(first != Piece::Empty);
        Self {
            board: Board::new(),
            first,
            to_move: first,
            history: Vec::with_capacity(9),
            outcome: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn first(&self) -> Piece {
        self.first
    }

    /// Side to move. Still the side that would move next once the game is over.
    #[inline]
    pub fn to_move(&self) -> Piece {
        self.to_move
    }

    #[inline]
    pub fn history(&self) -> &[(Pos, Piece)] {
        &self.history
    }

    #[inline]
    pub fn last_move(&self) -> Option<Pos> {
        self.history.last().map(|&(pos, _)| pos)
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Positions of the winning line once the game is won
    pub fn winning_line(&self) -> Option<[Pos; 3]> {
        winning_line(&self.board)
    }

    /// Play a move for the side to move.
    ///
    /// Returns the outcome if this move ended the game.
    pub fn play(&mut self, pos: Pos) -> Result<Option<Outcome>> {
        if self.outcome.is_some() {
            return Err(MoveError::GameOver);
        }
        if !self.board.is_empty(pos) {
            return Err(MoveError::Occupied(pos));
        }

        let piece = self.to_move;
        self.board.place(pos, piece);
        self.history.push((pos, piece));
        self.outcome = check_outcome(&self.board);
        if self.outcome.is_none() {
            self.to_move = piece.opponent();
        }

        debug_assert_eq!(self.history.len() as u32, self.board.piece_count());
        Ok(self.outcome)
    }

    /// Parse `A1`-style notation and play it
    pub fn play_notation(&mut self, notation: &str) -> Result<Option<Outcome>> {
        let pos = notation.parse::<Pos>()?;
        self.play(pos)
    }

    /// Take back the last move
    pub fn undo(&mut self) -> Option<(Pos, Piece)> {
        let (pos, piece) = self.history.pop()?;
        self.board.remove(pos);
        self.to_move = piece;
        self.outcome = None;
        Some((pos, piece))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::new(Piece::O);
        assert_eq!(game.to_move(), Piece::O);
        game.play(Pos::new(1, 1)).unwrap();
        assert_eq!(game.to_move(), Piece::X);
        assert_eq!(game.board().get(Pos::new(1, 1)), Piece::O);
        assert_eq!(game.last_move(), Some(Pos::new(1, 1)));
    }

    #[test]
    fn test_rejects_occupied_cell() {
        let mut game = Game::new(Piece::X);
        game.play(Pos::new(0, 0)).unwrap();
        assert_eq!(
            game.play(Pos::new(0, 0)),
            Err(MoveError::Occupied(Pos::new(0, 0)))
        );
        // Rejected move does not change the turn
        assert_eq!(game.to_move(), Piece::O);
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn test_rejects_bad_notation() {
        let mut game = Game::new(Piece::X);
        assert!(matches!(
            game.play_notation("d4"),
            Err(MoveError::InvalidNotation(_))
        ));
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_no_moves_after_game_over() {
        let mut game = Game::new(Piece::X);
        for mv in ["a1", "b1", "a2", "b2", "a3"] {
            game.play_notation(mv).unwrap();
        }
        assert_eq!(game.outcome(), Some(Outcome::Win(Piece::X)));
        assert_eq!(
            game.winning_line(),
            Some([Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)])
        );
        assert_eq!(game.play_notation("c3"), Err(MoveError::GameOver));
    }

    #[test]
    fn test_draw() {
        let mut game = Game::new(Piece::X);
        let moves = ["a1", "a2", "a3", "b2", "b1", "b3", "c2", "c1", "c3"];
        let mut last = None;
        for mv in moves {
            last = game.play_notation(mv).unwrap();
        }
        assert_eq!(last, Some(Outcome::Draw));
    }

    #[test]
    fn test_undo_restores_state() {
        let mut game = Game::new(Piece::X);
        for mv in ["a1", "b1", "a2", "b2", "a3"] {
            game.play_notation(mv).unwrap();
        }
        assert!(game.is_over());

        assert_eq!(game.undo(), Some((Pos::new(0, 2), Piece::X)));
        assert!(!game.is_over());
        assert_eq!(game.to_move(), Piece::X);
        assert_eq!(game.board().piece_count(), 4);
        assert_eq!(game.history().len(), 4);

        while game.undo().is_some() {}
        assert!(game.board().is_board_empty());
        assert_eq!(game.to_move(), Piece::X);
    }
}
