//! Static evaluation of a board

use crate::board::{Board, Piece};
use crate::rules::winner;

/// Score of a completed line
pub const WIN_SCORE: i32 = 10;

/// Evaluate the board from the perspective of `maximizer`.
///
/// Returns `WIN_SCORE` if `maximizer` has three in a row, `-WIN_SCORE` if
/// its opponent has, and 0 otherwise (including undecided positions).
///
/// ```
/// use tictactoe::{Board, Piece};
/// use tictactoe::eval::{evaluate, WIN_SCORE};
///
/// let board = Board::from_rows(["xxx", "oo_", "___"]).unwrap();
/// assert_eq!(evaluate(&board, Piece::X), WIN_SCORE);
/// assert_eq!(evaluate(&board, Piece::O), -WIN_SCORE);
/// ```
pub fn evaluate(board: &Board, maximizer: Piece) -> i32 {
    match winner(board) {
        Some(piece) if piece == maximizer => WIN_SCORE,
        Some(_) => -WIN_SCORE,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_undecided() {
        assert_eq!(evaluate(&Board::new(), Piece::X), 0);

        let board = Board::from_rows(["xo_", "_x_", "__o"]).unwrap();
        assert_eq!(evaluate(&board, Piece::X), 0);
        assert_eq!(evaluate(&board, Piece::O), 0);
    }

    #[test]
    fn test_evaluate_draw_is_zero() {
        let board = Board::from_rows(["xox", "xoo", "oxx"]).unwrap();
        assert_eq!(evaluate(&board, Piece::X), 0);
    }

    #[test]
    fn test_evaluate_win_and_loss() {
        let o_wins = Board::from_rows(["xo_", "xo_", "_ox"]).unwrap();
        assert_eq!(evaluate(&o_wins, Piece::O), WIN_SCORE);
        assert_eq!(evaluate(&o_wins, Piece::X), -WIN_SCORE);
    }
}
