//! Main application for the tic-tac-toe GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use crate::config::Config;
use crate::{Outcome, Piece, SearchType, Strategy};
use super::board_view::{BoardSnapshot, BoardView};
use super::game_state::{describe_score, GameMode, GameState, AI_PIECE, HUMAN_PIECE};
use super::theme::*;

/// Main tic-tac-toe application
pub struct TicTacToeApp {
    state: GameState,
    board_view: BoardView,
    show_debug: bool,
}

impl TicTacToeApp {
    /// Create the app with the configured opponent
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &Config) -> Self {
        let mode = GameMode::PvE {
            opponent: config.ui.opponent,
        };
        Self {
            state: GameState::new(mode, config),
            board_view: BoardView::default(),
            show_debug: true,
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    for strategy in Strategy::ALL {
                        if ui.button(format!("New Game vs {}", strategy_label(strategy))).clicked() {
                            self.state.set_mode(GameMode::PvE { opponent: strategy });
                            ui.close_menu();
                        }
                    }
                    if ui.button("New Game (Hotseat)").clicked() {
                        self.state.set_mode(GameMode::PvP { show_suggestions: false });
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Undo").clicked() {
                        self.state.undo();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Options", |ui| {
                    if ui.checkbox(&mut self.state.ai_first, "AI moves first").changed() {
                        self.state.reset();
                    }
                    ui.checkbox(&mut self.state.alternate_first, "Alternate first move");
                    if let GameMode::PvP { show_suggestions } = &mut self.state.mode {
                        ui.checkbox(show_suggestions, "Show hints");
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_text = match self.state.mode {
                        GameMode::PvE { opponent } => {
                            format!("You ({HUMAN_PIECE}) vs {} ({AI_PIECE})", strategy_label(opponent))
                        }
                        GameMode::PvP { .. } => "Hotseat".to_string(),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    /// Render the side panel with game info and debug
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);

                self.render_title_card(ui);
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);

                self.render_timer_card(ui);
                ui.add_space(10.0);

                if let GameMode::PvE { .. } = self.state.mode {
                    self.render_session_card(ui);
                    ui.add_space(10.0);
                }

                self.render_actions_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    self.render_debug_card(ui);
                }

                if let Some(outcome) = self.state.outcome() {
                    ui.add_space(10.0);
                    self.render_game_over_card(ui, outcome);
                }

                if let Some(msg) = &self.state.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("TIC-TAC-TOE").size(22.0).strong().color(TEXT_PRIMARY));
        });
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("minimax & TD(0) learner").size(11.0).color(TEXT_MUTED));
        });
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let turn = self.state.current_turn();
            let accent = if turn == Piece::X { X_COLOR } else { O_COLOR };

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, CARD_ACCENT_BG);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    turn,
                    egui::FontId::proportional(28.0),
                    accent,
                );

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(format!("{turn} to move")).size(18.0).strong().color(TEXT_PRIMARY));

                    let status = if self.state.is_ai_thinking() {
                        ("AI thinking...", TIMER_WARNING)
                    } else if self.state.outcome().is_some() {
                        ("Game Over", WIN_HIGHLIGHT)
                    } else if self.state.is_human_turn() {
                        ("Your turn", TIMER_NORMAL)
                    } else {
                        ("AI to move", TEXT_SECONDARY)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });
        });
    }

    fn render_timer_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TIMER").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let (secs, color) = match self.state.ai_thinking_elapsed() {
                Some(elapsed) => (elapsed.as_secs_f32(), TIMER_WARNING),
                None => (self.state.move_timer.elapsed().as_secs_f32(), TEXT_PRIMARY),
            };
            ui.label(RichText::new(format!("{secs:.1}s")).size(24.0).color(color));

            if let Some(ai_time) = self.state.move_timer.ai_thinking_time {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Last AI: {:.3}s", ai_time.as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    /// Wins, losses and draws in this session
    fn render_session_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("SESSION").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            let session = &self.state.session;
            for (label, count, color) in [
                ("You", session.second_wins, TIMER_NORMAL),
                ("AI", session.first_wins, TIMER_CRITICAL),
                ("Draws", session.draws, TEXT_SECONDARY),
            ] {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).size(12.0).color(TEXT_PRIMARY));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(count.to_string()).size(14.0).strong().color(color));
                    });
                });
            }

            if let Some(states) = self.state.learned_states() {
                ui.add_space(6.0);
                ui.label(
                    RichText::new(format!("Learner knows {states} positions"))
                        .size(10.0)
                        .color(TEXT_MUTED),
                );
            }
        });
    }

    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn_frame = Frame::new()
                    .fill(BUTTON_BG)
                    .corner_radius(CornerRadius::same(6))
                    .inner_margin(8.0);

                btn_frame.show(ui, |ui| {
                    if ui.add(action_label("New")).clicked() {
                        self.state.new_game();
                    }
                });

                ui.add_space(4.0);

                if self.state.can_undo() {
                    btn_frame.show(ui, |ui| {
                        if ui.add(action_label("Undo")).clicked() {
                            self.state.undo();
                        }
                    });
                    ui.add_space(4.0);
                }

                if let GameMode::PvP { .. } = self.state.mode {
                    btn_frame.show(ui, |ui| {
                        if ui.add(action_label("Hint")).clicked() {
                            self.state.request_suggestion();
                        }
                    });
                }
            });

            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("Move #{}", self.state.game.history().len()))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let Some(result) = &self.state.last_ai_result else {
                ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                return;
            };

            let score = match result.search_type {
                SearchType::Minimax => describe_score(result.score),
                SearchType::Greedy | SearchType::Exploration => {
                    format!("value {:.2}", f64::from(result.score) / 100.0)
                }
                SearchType::Random => "random".to_string(),
            };

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(format!("{:?}", result.search_type))
                            .size(11.0)
                            .strong()
                            .color(TIMER_NORMAL),
                    );
                    ui.label(RichText::new(score).size(10.0).color(TEXT_SECONDARY));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(format!("{}ms", result.time_ms)).size(10.0).color(TEXT_SECONDARY));
                        ui.label(RichText::new(format!("{} nodes", result.nodes)).size(10.0).color(TEXT_MUTED));
                    });
                });
            });

            if let Some(pos) = result.best_move {
                ui.add_space(4.0);
                ui.label(RichText::new(format!("-> {pos}")).size(12.0).strong().color(WIN_HIGHLIGHT));
            }
        });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui, outcome: Outcome) {
        let headline = match (outcome, self.state.mode) {
            (Outcome::Draw, _) => "DRAW".to_string(),
            (Outcome::Win(piece), GameMode::PvE { .. }) if piece == HUMAN_PIECE => "YOU WIN!".to_string(),
            (Outcome::Win(_), GameMode::PvE { .. }) => "AI WINS".to_string(),
            (Outcome::Win(piece), GameMode::PvP { .. }) => format!("{piece} WINS!"),
        };

        Frame::new()
            .fill(GAME_OVER_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(TEXT_SECONDARY));
                    ui.add_space(8.0);
                    ui.label(RichText::new(headline).size(20.0).strong().color(TEXT_PRIMARY));
                    ui.add_space(12.0);

                    Frame::new()
                        .fill(BUTTON_ACTIVE)
                        .corner_radius(CornerRadius::same(6))
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            if ui.add(action_label("New Game")).clicked() {
                                self.state.new_game();
                            }
                        });
                });
            });
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(MESSAGE_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            let show_hint = match self.state.mode {
                GameMode::PvP { show_suggestions } => show_suggestions,
                GameMode::PvE { .. } => false,
            };
            if show_hint && self.state.suggested_move.is_none() && self.state.outcome().is_none() {
                self.state.request_suggestion();
            }

            let snap = BoardSnapshot {
                board: self.state.board(),
                current_turn: self.state.current_turn(),
                last_move: self.state.game.last_move(),
                suggested_move: self.state.suggested_move,
                winning_line: self.state.game.winning_line(),
                interactive: self.state.outcome().is_none() && self.state.is_human_turn(),
            };
            let clicked = self.board_view.show(ui, &snap);

            if let Some(pos) = clicked {
                if let Err(msg) = self.state.try_place(pos) {
                    self.state.message = Some(msg);
                }
            }
        });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        ctx.input(|i| {
            // D - Toggle debug panel
            if i.key_pressed(egui::Key::D) {
                self.show_debug = !self.show_debug;
            }

            // H - Get hint (hotseat)
            if i.key_pressed(egui::Key::H) {
                if let GameMode::PvP { .. } = self.state.mode {
                    self.state.request_suggestion();
                }
            }

            // U - Undo
            if i.key_pressed(egui::Key::U) {
                self.state.undo();
            }

            // N - New game
            if i.key_pressed(egui::Key::N) {
                self.state.new_game();
            }
        });
    }
}

impl eframe::App for TicTacToeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.state.check_ai_result();

        if self.state.is_ai_turn() && !self.state.is_ai_thinking() && self.state.outcome().is_none() {
            self.state.start_ai_thinking();
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        if self.state.is_ai_thinking() {
            ctx.request_repaint();
        }
    }
}

fn strategy_label(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Minimax => "Minimax",
        Strategy::Learner => "Learner",
        Strategy::Random => "Random",
    }
}

fn action_label(text: &str) -> egui::Label {
    egui::Label::new(RichText::new(text).size(12.0).color(TEXT_PRIMARY)).sense(egui::Sense::click())
}
