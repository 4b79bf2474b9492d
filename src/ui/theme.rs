//! Theme constants for the tic-tac-toe GUI

use egui::Color32;

// Board colors
pub const BOARD_BG: Color32 = Color32::from_rgb(44, 47, 54);
pub const GRID_LINE: Color32 = Color32::from_rgb(150, 155, 165);

// Pieces
pub const X_COLOR: Color32 = Color32::from_rgb(235, 95, 85);
pub const O_COLOR: Color32 = Color32::from_rgb(90, 170, 240);

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(255, 200, 60);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);

pub fn hover_invalid() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 50, 50, 60)
}

// Panel colors - dark modern theme
pub const PANEL_BG: Color32 = Color32::from_rgb(32, 34, 37);
pub const CARD_BG: Color32 = Color32::from_rgb(35, 38, 43);
pub const CARD_ACCENT_BG: Color32 = Color32::from_rgb(50, 53, 60);
pub const GAME_OVER_BG: Color32 = Color32::from_rgb(40, 60, 45);
pub const MESSAGE_BG: Color32 = Color32::from_rgb(60, 45, 35);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Button colors
pub const BUTTON_BG: Color32 = Color32::from_rgb(55, 57, 62);
pub const BUTTON_ACTIVE: Color32 = Color32::from_rgb(85, 87, 95);

// Timer colors
pub const TIMER_NORMAL: Color32 = Color32::from_rgb(80, 200, 120);
pub const TIMER_WARNING: Color32 = Color32::from_rgb(255, 180, 50);
pub const TIMER_CRITICAL: Color32 = Color32::from_rgb(255, 70, 70);

// Sizes
pub const BOARD_MARGIN: f32 = 40.0;
pub const GRID_LINE_WIDTH: f32 = 3.0;
/// Piece radius relative to the cell size
pub const PIECE_RADIUS_RATIO: f32 = 0.3;
/// Piece stroke width relative to the cell size
pub const PIECE_STROKE_RATIO: f32 = 0.08;
