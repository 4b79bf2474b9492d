//! Board rendering for the tic-tac-toe GUI

use crate::{Board, Piece, Pos, BOARD_SIZE};
use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use super::theme::*;

/// What the board view needs to know about the game
pub struct BoardSnapshot<'a> {
    pub board: &'a Board,
    pub current_turn: Piece,
    pub last_move: Option<Pos>,
    pub suggested_move: Option<Pos>,
    pub winning_line: Option<[Pos; 3]>,
    /// Clicks are accepted
    pub interactive: bool,
}

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached cell size for coordinate calculations
    cell_size: f32,
    /// Board drawing area
    board_rect: Rect,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 100.0,
            board_rect: Rect::NOTHING,
        }
    }
}

impl BoardView {
    /// Render the board and return click position if any.
    ///
    /// Clicks on occupied cells are returned too, so the caller can report
    /// why the move was rejected.
    pub fn show(&mut self, ui: &mut egui::Ui, snap: &BoardSnapshot<'_>) -> Option<Pos> {
        let available_size = ui.available_size();

        // Calculate board size to fit available space
        let board_size = (available_size.x.min(available_size.y) - 20.0).max(150.0);
        self.cell_size = (board_size - 2.0 * BOARD_MARGIN) / BOARD_SIZE as f32;

        let (response, painter) =
            ui.allocate_painter(Vec2::new(board_size, board_size), Sense::click());

        self.board_rect = response.rect;

        painter.rect_filled(self.board_rect, CornerRadius::same(8), BOARD_BG);
        self.draw_grid(&painter);
        self.draw_coordinates(&painter);

        for pos in Pos::all() {
            let piece = snap.board.get(pos);
            if piece != Piece::Empty {
                self.draw_piece(&painter, pos, piece, piece_color(piece));
            }
        }

        if let Some(pos) = snap.last_move {
            self.draw_last_move_marker(&painter, pos);
        }

        if let Some(line) = snap.winning_line {
            self.draw_winning_line(&painter, &line);
        }

        if let Some(pos) = snap.suggested_move {
            self.draw_suggestion(&painter, pos, snap.current_turn);
        }

        // Handle hover preview and click
        let mut clicked_pos = None;

        if snap.interactive {
            if let Some(pointer_pos) = response.hover_pos() {
                if let Some(board_pos) = self.screen_to_board(pointer_pos) {
                    let is_valid = crate::rules::is_valid_move(snap.board, board_pos);
                    self.draw_hover_preview(&painter, board_pos, snap.current_turn, is_valid);

                    if response.clicked() {
                        clicked_pos = Some(board_pos);
                    }
                }
            }
        }

        clicked_pos
    }

    /// Draw the two inner vertical and horizontal lines
    fn draw_grid(&self, painter: &Painter) {
        let stroke = Stroke::new(GRID_LINE_WIDTH, GRID_LINE);
        let span = BOARD_SIZE as f32 * self.cell_size;

        for i in 1..BOARD_SIZE {
            let offset = BOARD_MARGIN + i as f32 * self.cell_size;

            // Vertical line
            let start = self.board_rect.min + Vec2::new(offset, BOARD_MARGIN);
            let end = self.board_rect.min + Vec2::new(offset, BOARD_MARGIN + span);
            painter.line_segment([start, end], stroke);

            // Horizontal line
            let start = self.board_rect.min + Vec2::new(BOARD_MARGIN, offset);
            let end = self.board_rect.min + Vec2::new(BOARD_MARGIN + span, offset);
            painter.line_segment([start, end], stroke);
        }
    }

    /// Draw coordinate labels (rows A-C, columns 1-3)
    fn draw_coordinates(&self, painter: &Painter) {
        let font = egui::FontId::proportional(16.0);

        for i in 0..BOARD_SIZE {
            let center = BOARD_MARGIN + (i as f32 + 0.5) * self.cell_size;

            // Column digit above the board
            let pos = Pos2::new(self.board_rect.min.x + center, self.board_rect.min.y + BOARD_MARGIN * 0.5);
            painter.text(pos, egui::Align2::CENTER_CENTER, i + 1, font.clone(), TEXT_MUTED);

            // Row letter left of the board
            let letter = (b'A' + i as u8) as char;
            let pos = Pos2::new(self.board_rect.min.x + BOARD_MARGIN * 0.5, self.board_rect.min.y + center);
            painter.text(pos, egui::Align2::CENTER_CENTER, letter, font.clone(), TEXT_MUTED);
        }
    }

    /// Draw an X (two strokes) or an O (ring)
    fn draw_piece(&self, painter: &Painter, pos: Pos, piece: Piece, color: Color32) {
        let center = self.board_to_screen(pos);
        let radius = self.cell_size * PIECE_RADIUS_RATIO;
        let stroke = Stroke::new(self.cell_size * PIECE_STROKE_RATIO, color);

        match piece {
            Piece::X => {
                let d = Vec2::splat(radius * 0.8);
                let e = Vec2::new(d.x, -d.y);
                painter.line_segment([center - d, center + d], stroke);
                painter.line_segment([center - e, center + e], stroke);
            }
            Piece::O => {
                painter.circle_stroke(center, radius, stroke);
            }
            Piece::Empty => {}
        }
    }

    /// Draw last move marker
    fn draw_last_move_marker(&self, painter: &Painter, pos: Pos) {
        let rect = self.cell_rect(pos).shrink(6.0);
        painter.rect_stroke(
            rect,
            CornerRadius::same(6),
            Stroke::new(2.0, LAST_MOVE_MARKER),
            egui::StrokeKind::Inside,
        );
    }

    /// Draw winning line highlight
    fn draw_winning_line(&self, painter: &Painter, line: &[Pos; 3]) {
        let stroke = Stroke::new(6.0, WIN_HIGHLIGHT);
        let start = self.board_to_screen(line[0]);
        let end = self.board_to_screen(line[2]);
        painter.line_segment([start, end], stroke);
    }

    /// Draw move suggestion
    fn draw_suggestion(&self, painter: &Painter, pos: Pos, turn: Piece) {
        let color = piece_color(turn).gamma_multiply(0.35);
        self.draw_piece(painter, pos, turn, color);

        painter.text(
            self.board_to_screen(pos),
            egui::Align2::CENTER_CENTER,
            "?",
            egui::FontId::proportional(20.0),
            TEXT_PRIMARY,
        );
    }

    /// Draw hover preview
    fn draw_hover_preview(&self, painter: &Painter, pos: Pos, turn: Piece, is_valid: bool) {
        if is_valid {
            self.draw_piece(painter, pos, turn, piece_color(turn).gamma_multiply(0.4));
        } else {
            painter.rect_filled(self.cell_rect(pos).shrink(4.0), CornerRadius::same(6), hover_invalid());
        }
    }

    /// Screen rectangle of one cell
    fn cell_rect(&self, pos: Pos) -> Rect {
        Rect::from_center_size(self.board_to_screen(pos), Vec2::splat(self.cell_size))
    }

    /// Convert screen coordinates to board position
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Option<Pos> {
        let relative = screen_pos - self.board_rect.min;
        let col = ((relative.x - BOARD_MARGIN) / self.cell_size).floor() as i32;
        let row = ((relative.y - BOARD_MARGIN) / self.cell_size).floor() as i32;

        Pos::try_new(row, col).ok()
    }

    /// Convert board position to the screen coordinates of the cell center
    pub fn board_to_screen(&self, pos: Pos) -> Pos2 {
        let x = self.board_rect.min.x + BOARD_MARGIN + (pos.col as f32 + 0.5) * self.cell_size;
        let y = self.board_rect.min.y + BOARD_MARGIN + (pos.row as f32 + 0.5) * self.cell_size;
        Pos2::new(x, y)
    }
}

fn piece_color(piece: Piece) -> Color32 {
    match piece {
        Piece::X => X_COLOR,
        Piece::O => O_COLOR,
        Piece::Empty => Color32::TRANSPARENT,
    }
}
