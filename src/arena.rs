//! AI-vs-AI games and series statistics
//!
//! Used for headless training of the learner: a series of games between two
//! players, each game's result logged together with running totals.

use std::fmt;

use tracing::{debug, info};

use crate::board::{Board, Piece, Pos};
use crate::error::{MoveError, Result};
use crate::game::Game;
use crate::player::Player;
use crate::rules::Outcome;

/// A finished game
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// Piece that moved first
    pub first: Piece,
    /// Moves in order
    pub moves: Vec<(Pos, Piece)>,
    pub outcome: Outcome,
    /// Final position
    pub board: Board,
}

/// Play one game, `first` moving first.
///
/// Both players are told a new game starts and, at the end, how it ended.
/// Fails if a player returns no move or an illegal one before the game ends.
pub fn play_game(first: &mut dyn Player, second: &mut dyn Player) -> Result<GameRecord> {
    debug_assert!(first.piece() != second.piece());

    let mut game = Game::new(first.piece());
    first.new_game(game.board());
    second.new_game(game.board());

    let mut first_turn = true;
    let outcome = loop {
        let player: &mut dyn Player = if first_turn { &mut *first } else { &mut *second };
        let pos = player
            .choose_move(game.board())
            .ok_or(MoveError::NoMove(player.piece()))?;
        if let Some(outcome) = game.play(pos)? {
            break outcome;
        }
        first_turn = !first_turn;
    };

    first.observe_outcome(game.board(), outcome);
    second.observe_outcome(game.board(), outcome);

    Ok(GameRecord {
        first: game.first(),
        moves: game.history().to_vec(),
        outcome,
        board: *game.board(),
    })
}

/// Win/draw counts of a series, from the point of view of the arena's
/// first and second player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub first_wins: u32,
    pub second_wins: u32,
    pub draws: u32,
}

impl MatchStats {
    #[inline]
    pub fn total(&self) -> u32 {
        self.first_wins + self.second_wins + self.draws
    }

    pub fn first_win_ratio(&self) -> f64 {
        self.ratio(self.first_wins)
    }

    pub fn second_win_ratio(&self) -> f64 {
        self.ratio(self.second_wins)
    }

    pub fn draw_ratio(&self) -> f64 {
        self.ratio(self.draws)
    }

    fn ratio(&self, count: u32) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(count) / f64::from(total),
        }
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "first={} second={} draw={} ({:.3} / {:.3} / {:.3})",
            self.first_wins,
            self.second_wins,
            self.draws,
            self.first_win_ratio(),
            self.second_win_ratio(),
            self.draw_ratio()
        )
    }
}

/// A series of games between two players.
///
/// `first` plays the piece it was created with and, unless alternation is
/// enabled, always starts.
pub struct Arena<A: Player, B: Player> {
    first: A,
    second: B,
    alternate_first: bool,
    stats: MatchStats,
}

impl<A: Player, B: Player> Arena<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            alternate_first: false,
            stats: MatchStats::default(),
        }
    }

    /// Let the second player start every other game
    pub fn with_alternate_first(mut self, alternate: bool) -> Self {
        self.alternate_first = alternate;
        self
    }

    #[inline]
    pub fn stats(&self) -> MatchStats {
        self.stats
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    pub fn into_players(self) -> (A, B) {
        (self.first, self.second)
    }

    /// Play the next game of the series and record its result.
    pub fn play_next(&mut self) -> Result<GameRecord> {
        let swap = self.alternate_first && self.stats.total() % 2 == 1;
        let record = if swap {
            play_game(&mut self.second, &mut self.first)?
        } else {
            play_game(&mut self.first, &mut self.second)?
        };

        let label = match record.outcome {
            Outcome::Win(piece) if piece == self.first.piece() => {
                self.stats.first_wins += 1;
                "first player wins"
            }
            Outcome::Win(_) => {
                self.stats.second_wins += 1;
                "second player wins"
            }
            Outcome::Draw => {
                self.stats.draws += 1;
                "draw"
            }
        };
        info!(
            game = self.stats.total(),
            starter = %record.first,
            "{label:<18} --- {}",
            self.stats
        );
        debug!("final board:\n{}", record.board);

        Ok(record)
    }

    /// Play `games` games and return the running totals.
    pub fn play_series(&mut self, games: u32) -> Result<MatchStats> {
        info!(
            first = self.first.name(),
            second = self.second.name(),
            games,
            "starting series"
        );
        for _ in 0..games {
            self.play_next()?;
        }
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learn::{Learner, LearnerConfig};
    use crate::player::MinimaxPlayer;
    use crate::search::SearchConfig;

    fn minimax(piece: Piece, seed: u64) -> MinimaxPlayer {
        MinimaxPlayer::new(
            piece,
            &SearchConfig {
                shuffle_moves: true,
                seed: Some(seed),
                ..SearchConfig::default()
            },
        )
    }

    fn dumb(piece: Piece, seed: u64) -> MinimaxPlayer {
        MinimaxPlayer::dumb(
            piece,
            &SearchConfig {
                seed: Some(seed),
                ..SearchConfig::default()
            },
        )
    }

    /// Always plays the same cell, even when it is taken
    struct Stubborn(Piece);

    impl Player for Stubborn {
        fn piece(&self) -> Piece {
            self.0
        }
        fn name(&self) -> &str {
            "stubborn"
        }
        fn choose_move(&mut self, _board: &Board) -> Option<Pos> {
            Some(Pos::new(1, 1))
        }
    }

    /// Never finds a move
    struct Silent(Piece);

    impl Player for Silent {
        fn piece(&self) -> Piece {
            self.0
        }
        fn name(&self) -> &str {
            "silent"
        }
        fn choose_move(&mut self, _board: &Board) -> Option<Pos> {
            None
        }
    }

    #[test]
    fn test_play_game_record() {
        let mut a = minimax(Piece::X, 1);
        let mut b = minimax(Piece::O, 2);
        let record = play_game(&mut a, &mut b).unwrap();
        assert_eq!(record.first, Piece::X);
        assert_eq!(record.outcome, Outcome::Draw);
        assert_eq!(record.moves.len(), 9);
        assert_eq!(record.moves[0].1, Piece::X);
        assert!(record.board.is_full());
    }

    #[test]
    fn test_second_player_can_be_o_first() {
        let mut a = minimax(Piece::O, 1);
        let mut b = dumb(Piece::X, 2);
        let record = play_game(&mut a, &mut b).unwrap();
        assert_eq!(record.first, Piece::O);
        assert_eq!(record.moves[0].1, Piece::O);
        assert_ne!(record.outcome, Outcome::Win(Piece::X));
    }

    #[test]
    fn test_illegal_move_is_error() {
        let mut a = Stubborn(Piece::X);
        let mut b = Stubborn(Piece::O);
        assert_eq!(
            play_game(&mut a, &mut b).unwrap_err(),
            MoveError::Occupied(Pos::new(1, 1))
        );

        let mut c = minimax(Piece::X, 1);
        let mut d = Silent(Piece::O);
        assert_eq!(
            play_game(&mut c, &mut d).unwrap_err(),
            MoveError::NoMove(Piece::O)
        );
    }

    #[test]
    fn test_match_stats_ratios() {
        let stats = MatchStats {
            first_wins: 1,
            second_wins: 1,
            draws: 2,
        };
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.first_win_ratio(), 0.25);
        assert_eq!(stats.draw_ratio(), 0.5);
        assert_eq!(MatchStats::default().draw_ratio(), 0.0);
        assert_eq!(
            stats.to_string(),
            "first=1 second=1 draw=2 (0.250 / 0.250 / 0.500)"
        );
    }

    #[test]
    fn test_minimax_series_all_draws() {
        let mut arena = Arena::new(minimax(Piece::X, 3), minimax(Piece::O, 4));
        let stats = arena.play_series(10).unwrap();
        assert_eq!(stats.draws, 10);
        assert_eq!(stats.total(), 10);
    }

    #[test]
    fn test_alternate_first() {
        let mut arena =
            Arena::new(minimax(Piece::X, 5), dumb(Piece::O, 6)).with_alternate_first(true);
        let first = arena.play_next().unwrap();
        let second = arena.play_next().unwrap();
        assert_eq!(first.first, Piece::X);
        assert_eq!(second.first, Piece::O);

        let stats = arena.play_series(20).unwrap();
        assert_eq!(stats.total(), 22);
        assert_eq!(stats.second_wins, 0);
    }

    #[test]
    fn test_learner_learns_in_series() {
        let learner = Learner::new(
            Piece::O,
            LearnerConfig {
                alpha: 0.5,
                seed: Some(8),
                ..LearnerConfig::default()
            },
        );
        let mut arena = Arena::new(minimax(Piece::X, 7), learner);
        let stats = arena.play_series(30).unwrap();
        // Minimax never loses
        assert_eq!(stats.second_wins, 0);

        let (_, learner) = arena.into_players();
        assert!(learner.values().len() > 1);
        assert!(learner
            .values()
            .iter()
            .all(|(_, v)| (0.0..=1.0).contains(&v)));
    }
}
