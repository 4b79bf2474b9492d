//! Headless AI-vs-AI series
//!
//! Plays `arena.games` games between `arena.first` (X) and `arena.second`
//! (O) and logs each result with running totals. Mostly used to train the
//! learner against the minimax player.

use std::process::ExitCode;

use tictactoe::{init_tracing, load_config, AIEngine, Arena, Piece};
use tracing::{error, info};

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.common.log_level);
    info!(source = ?config.source, seed = ?config.common.seed, "configuration loaded");

    let engine_config = config.arena_engine_config();
    let first = AIEngine::new(config.arena.first, Piece::X, &engine_config);
    let second = AIEngine::new(config.arena.second, Piece::O, &engine_config);

    let mut arena = Arena::new(first, second).with_alternate_first(config.arena.alternate_first);
    let stats = match arena.play_series(config.arena.games) {
        Ok(stats) => stats,
        Err(e) => {
            error!("series aborted: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        first = %config.arena.first,
        second = %config.arena.second,
        "final: {stats}"
    );
    let (first, second) = arena.into_players();
    for (side, engine) in [("first", &first), ("second", &second)] {
        if let Some(learner) = engine.learner() {
            info!(side, states = learner.values().len(), "learner value table");
        }
    }

    ExitCode::SUCCESS
}
