//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout, top to bottom: the instruction header, the grid (indented by a small
//! left padding), then a status block with the score or the game-over message.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{
    Coord, BULLET_GLYPH, CURSOR_GLYPH, ENEMY_GLYPH, EXPLOSION_GLYPH, WALL_GLYPH,
};

pub const INSTRUCTIONS: [&str; 3] = [
    "GRIDSHOT",
    "w/a/s/d: move   space: fire   q: quit",
    "",
];

pub const GAME_OVER_TEXT: &str = "Game over!";

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Lays out the header, the grid and the status block.
pub struct GameView {
    /// Blank columns left of the grid and the text.
    padding: u16,
}

impl Default for GameView {
    fn default() -> Self {
        Self { padding: 2 }
    }
}

impl GameView {
    pub fn new(padding: u16) -> Self {
        Self { padding }
    }

    /// Smallest viewport that shows the whole frame.
    pub fn frame_size(&self, snap: &GameSnapshot) -> Viewport {
        let text_w = INSTRUCTIONS
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let grid_w = to_u16(snap.width);
        let width = self.padding + grid_w.max(to_u16(text_w as i32));
        // Blank line, then up to three status lines.
        let height = INSTRUCTIONS.len() as u16 + to_u16(snap.height) + 4;
        Viewport::new(width, height)
    }

    pub fn grid_origin(&self) -> (u16, u16) {
        (self.padding, INSTRUCTIONS.len() as u16)
    }

    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        let text = CellStyle::default();

        for (row, line) in INSTRUCTIONS.iter().enumerate() {
            let style = if row == 0 { text.bold() } else { text };
            fb.put_str(self.padding, row as u16, line, style);
        }

        let (ox, oy) = self.grid_origin();
        for y in 0..snap.height {
            for x in 0..snap.width {
                if let Some(glyph) = snap.glyph_at(Coord::new(x, y)) {
                    fb.put_char(ox + to_u16(x), oy + to_u16(y), glyph, glyph_style(glyph));
                }
            }
        }

        let status_y = oy + to_u16(snap.height) + 1;
        let score = format!("Score: {}", snap.score);
        if snap.game_over {
            fb.put_str(self.padding, status_y, GAME_OVER_TEXT, text.bold());
            fb.put_str(self.padding, status_y + 2, &score, text);
        } else {
            fb.put_str(self.padding, status_y, &score, text);
        }

        fb
    }
}

fn glyph_style(glyph: char) -> CellStyle {
    match glyph {
        WALL_GLYPH => CellStyle::fg(Rgb::new(140, 140, 150)),
        ENEMY_GLYPH => CellStyle::fg(Rgb::new(220, 80, 80)).bold(),
        CURSOR_GLYPH => CellStyle::fg(Rgb::new(80, 220, 220)).bold(),
        BULLET_GLYPH => CellStyle::fg(Rgb::new(240, 220, 80)),
        EXPLOSION_GLYPH => CellStyle::fg(Rgb::new(255, 165, 0)).bold(),
        _ => CellStyle::default(),
    }
}

fn to_u16(v: i32) -> u16 {
    u16::try_from(v.max(0)).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(game_over: bool) -> GameSnapshot {
        let (width, height) = (4, 3);
        let mut cells = vec![None; (width * height) as usize];
        cells[0] = Some(WALL_GLYPH);
        cells[5] = Some(CURSOR_GLYPH);
        GameSnapshot {
            width,
            height,
            cells,
            score: 7,
            game_over,
        }
    }

    #[test]
    fn places_grid_below_header() {
        let view = GameView::default();
        let snap = snapshot(false);
        let fb = view.render(&snap, view.frame_size(&snap));
        let (ox, oy) = view.grid_origin();

        assert_eq!(fb.get(ox, oy).unwrap().ch, WALL_GLYPH);
        assert_eq!(fb.get(ox + 1, oy + 1).unwrap().ch, CURSOR_GLYPH);
        assert_eq!(fb.get(ox + 1, oy).unwrap().ch, ' ');
        assert!(fb.get(ox + 1, oy + 1).unwrap().style.bold);
    }

    #[test]
    fn frame_fits_instructions() {
        let view = GameView::default();
        let snap = snapshot(false);
        let vp = view.frame_size(&snap);
        assert!(vp.width as usize >= 2 + INSTRUCTIONS[1].len());
        assert_eq!(vp.height, 3 + 3 + 4);
    }

    #[test]
    fn status_line_shows_score_then_game_over() {
        let view = GameView::default();
        let snap = snapshot(false);
        let vp = view.frame_size(&snap);
        let status_y = view.grid_origin().1 + 3 + 1;

        let fb = view.render(&snap, vp);
        assert_eq!(fb.row_text(status_y).trim(), "Score: 7");

        let fb = view.render(&snapshot(true), vp);
        assert_eq!(fb.row_text(status_y).trim(), "Game over!");
        assert_eq!(fb.row_text(status_y + 2).trim(), "Score: 7");
    }
}
