//! GameView: maps a session snapshot and its pieces into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{Effect, Piece, Pooled, SessionSnapshot};
use crate::engine::{Motion, Playfield, StackPiece};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::SessionPhase;

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

/// Everything one frame needs, borrowed from the session and the playfield.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub snapshot: &'a SessionSnapshot,
    pub pieces: &'a [StackPiece],
    pub effects: &'a [Effect],
    pub field: &'a Playfield,
}

const FIELD_BG: Rgb = Rgb::new(28, 28, 36);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// One colour per piece level, smallest first.
const LEVEL_COLORS: [Rgb; 11] = [
    Rgb::new(240, 120, 120),
    Rgb::new(250, 170, 90),
    Rgb::new(245, 220, 90),
    Rgb::new(150, 220, 100),
    Rgb::new(90, 210, 170),
    Rgb::new(90, 190, 240),
    Rgb::new(110, 140, 240),
    Rgb::new(170, 120, 230),
    Rgb::new(230, 120, 210),
    Rgb::new(220, 220, 220),
    Rgb::new(255, 215, 0),
];

const LEVEL_GLYPHS: [char; 11] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A'];

/// A lightweight renderer for the drop game.
pub struct GameView {
    /// Playfield cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 roughly squares up terminal glyphs.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render into an existing framebuffer. Allocation-free once `fb` has
    /// reached the viewport size.
    pub fn render_into(&self, scene: Scene<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let field = scene.field;
        let frame_w = field.width() as u16 * self.cell_w + 2;
        let frame_h = field.height() as u16 + 2;
        let origin_x = viewport.width.saturating_sub(frame_w) / 2;
        let origin_y = viewport.height.saturating_sub(frame_h) / 2;
        let layout = Layout {
            x: origin_x,
            y: origin_y,
            w: frame_w,
            h: frame_h,
            cell_w: self.cell_w,
        };

        draw_border(fb, &layout, CellStyle::new(Rgb::new(200, 200, 200), BLACK));
        self.draw_field(fb, &layout, field);

        let snap = scene.snapshot;
        if snap.phase != SessionPhase::NotStarted {
            for piece in scene.pieces.iter().filter(|p| p.in_use()) {
                draw_piece(fb, &layout, piece);
            }
            for (piece, effect) in scene.pieces.iter().zip(scene.effects) {
                if effect.in_use() {
                    draw_burst(fb, &layout, piece);
                }
            }
        }

        if snap.ui.hud_visible {
            draw_hud(fb, &layout, snap, viewport);
        }
        if snap.ui.start_visible {
            draw_overlay(fb, &layout, &["DONGLE DROP", "", "Enter: start"], None);
        }
        if snap.ui.end_visible {
            draw_overlay(
                fb,
                &layout,
                &["GAME OVER", "", "Score:", "", "R: reset"],
                snap.final_score.map(|score| (2, score)),
            );
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, scene: Scene<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(scene, viewport, &mut fb);
        fb
    }

    fn draw_field(&self, fb: &mut FrameBuffer, layout: &Layout, field: &Playfield) {
        let empty = CellStyle::new(Rgb::new(80, 80, 96), FIELD_BG).dim();
        let deadline = CellStyle::new(Rgb::new(220, 80, 80), FIELD_BG);
        let line_row = field.deadline_row() - 1;

        for row in 0..field.height() as i16 {
            let (ch, style) = if row == line_row {
                ('-', deadline)
            } else {
                (' ', empty)
            };
            for column in 0..field.width() as i16 {
                if let Some((x, y)) = layout.cell(column, row) {
                    fb.fill_rect(x, y, self.cell_w, 1, ch, style);
                }
            }
        }
    }
}

struct Layout {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
    cell_w: u16,
}

impl Layout {
    /// Screen position of a playfield cell.
    fn cell(&self, column: i16, row: i16) -> Option<(u16, u16)> {
        if column < 0 || row < 0 {
            return None;
        }
        Some((
            self.x + 1 + column as u16 * self.cell_w,
            self.y + 1 + row as u16,
        ))
    }
}

fn draw_border(fb: &mut FrameBuffer, l: &Layout, style: CellStyle) {
    if l.w < 2 || l.h < 2 {
        return;
    }
    let (right, bottom) = (l.x + l.w - 1, l.y + l.h - 1);

    fb.put_char(l.x, l.y, '┌', style);
    fb.put_char(right, l.y, '┐', style);
    fb.put_char(l.x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
    fb.fill_rect(l.x + 1, l.y, l.w - 2, 1, '─', style);
    fb.fill_rect(l.x + 1, bottom, l.w - 2, 1, '─', style);
    fb.fill_rect(l.x, l.y + 1, 1, l.h - 2, '│', style);
    fb.fill_rect(right, l.y + 1, 1, l.h - 2, '│', style);
}

fn draw_piece(fb: &mut FrameBuffer, layout: &Layout, piece: &StackPiece) {
    let Some((x, y)) = layout.cell(piece.column(), piece.row()) else {
        return;
    };
    let level = (piece.level() as usize).min(LEVEL_COLORS.len() - 1);
    let mut style = CellStyle::new(BLACK, LEVEL_COLORS[level]).bold();
    match piece.motion() {
        Motion::Hiding { .. } => style = CellStyle::new(LEVEL_COLORS[level], FIELD_BG).dim(),
        Motion::Held => style.fg = Rgb::new(255, 255, 255),
        _ => {}
    }

    fb.fill_rect(x, y, layout.cell_w, 1, ' ', style);
    fb.put_char(x, y, LEVEL_GLYPHS[level], style);
}

fn draw_burst(fb: &mut FrameBuffer, layout: &Layout, piece: &StackPiece) {
    let Some((x, y)) = layout.cell(piece.column(), piece.row()) else {
        return;
    };
    let style = CellStyle::new(Rgb::new(255, 240, 120), FIELD_BG).bold();
    fb.fill_rect(x, y, layout.cell_w, 1, '*', style);
}

fn draw_hud(fb: &mut FrameBuffer, layout: &Layout, snap: &SessionSnapshot, viewport: Viewport) {
    let x = layout.x.saturating_add(layout.w).saturating_add(2);
    if x >= viewport.width {
        return;
    }
    let label = CellStyle::default().bold();
    let hint = CellStyle::default().dim();
    let y = layout.y;

    let end = fb.put_str(x, y, "Score: ", label);
    fb.put_u32(end, y, snap.score, CellStyle::default());
    let end = fb.put_str(x, y + 2, "Max Score: ", label);
    fb.put_u32(end, y + 2, snap.best, CellStyle::default());

    if snap.phase == SessionPhase::Playing {
        fb.put_str(x, y + 5, "<-/->: move", hint);
        fb.put_str(x, y + 6, "Space: drop", hint);
    }
    fb.put_str(x, y + 7, "q: quit", hint);
}

/// Centred text block over the playfield. `number` puts a value on one of
/// the lines, right after its text.
fn draw_overlay(fb: &mut FrameBuffer, layout: &Layout, lines: &[&str], number: Option<(usize, u32)>) {
    let style = CellStyle::new(Rgb::new(255, 255, 255), BLACK).bold();
    let top = layout.y + layout.h.saturating_sub(lines.len() as u16) / 2;

    for (i, line) in lines.iter().enumerate() {
        let y = top + i as u16;
        match number {
            Some((at, value)) if at == i => {
                let digits = digit_count(value);
                let w = line.chars().count() as u16 + 1 + digits;
                let x = layout.x + layout.w.saturating_sub(w) / 2;
                let end = fb.put_str(x, y, line, style);
                fb.put_u32(end + 1, y, value, style);
            }
            _ => fb.put_str_centered(layout.x, layout.w, y, line, style),
        }
    }
}

fn digit_count(mut n: u32) -> u16 {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
