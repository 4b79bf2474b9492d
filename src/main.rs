//! Tic-tac-toe GUI
//!
//! Play against the minimax player, the learner or a random mover, or
//! hotseat against another person.

use std::process::ExitCode;

use tictactoe::ui::TicTacToeApp;
use tictactoe::{init_tracing, load_config};
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
    info!(
        source = ?config.source,
        opponent = %config.ui.opponent,
        "configuration loaded"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([820.0, 560.0])
            .with_min_inner_size([640.0, 420.0])
            .with_title("Tic-Tac-Toe"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Tic-Tac-Toe",
        options,
        Box::new(move |cc| Ok(Box::new(TicTacToeApp::new(cc, &config)))),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("GUI failed: {e}");
            ExitCode::FAILURE
        }
    }
}
