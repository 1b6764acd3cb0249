//! Stacking playfield.
//!
//! Released pieces fall one row every [`FALL_STEP_MS`] until they hit the floor
//! or another piece. A piece left resting above the deadline row for
//! [`DEADLINE_MS`] signals overflow through its hooks.

use dongle_drop_core::{Piece, Pooled};

use crate::piece::{Motion, StackPiece};
use crate::types::Sfx;

pub const FIELD_WIDTH: u8 = 9;
pub const FIELD_HEIGHT: u8 = 14;
/// Rows above this one are over the line.
pub const DEADLINE_ROW: i16 = 3;
pub const FALL_STEP_MS: u32 = 60;
pub const DEADLINE_MS: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playfield {
    width: u8,
    height: u8,
    deadline_row: i16,
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

impl Playfield {
    pub fn new(width: u8, height: u8) -> Self {
        let height = height.max(2);
        Self {
            width: width.max(1),
            height,
            deadline_row: DEADLINE_ROW.min(height as i16 - 1),
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn deadline_row(&self) -> i16 {
        self.deadline_row
    }

    /// Factory for pieces that spawn over the middle column.
    pub fn factory(&self) -> crate::piece::StackFactory {
        crate::piece::StackFactory::new(self.width)
    }

    /// Advance every piece by `elapsed_ms`.
    pub fn step(&self, pieces: &mut [StackPiece], elapsed_ms: u32) {
        for i in 0..pieces.len() {
            if !pieces[i].in_use() {
                continue;
            }
            match pieces[i].motion() {
                Motion::Hiding { remaining_ms } => {
                    let left = remaining_ms.saturating_sub(elapsed_ms);
                    if left == 0 {
                        pieces[i].collect();
                    } else {
                        pieces[i].set_motion(Motion::Hiding { remaining_ms: left });
                    }
                }
                Motion::Falling if pieces[i].physics_enabled() => {
                    self.fall(pieces, i, elapsed_ms);
                }
                Motion::Resting if pieces[i].physics_enabled() => {
                    if self.blocked_below(pieces, i) {
                        self.watch_deadline(&mut pieces[i], elapsed_ms);
                    } else {
                        let piece = &mut pieces[i];
                        piece.set_motion(Motion::Falling);
                        piece.fall_ms = 0;
                        piece.over_line_ms = 0;
                    }
                }
                _ => {}
            }
        }
    }

    fn fall(&self, pieces: &mut [StackPiece], i: usize, elapsed_ms: u32) {
        pieces[i].fall_ms = pieces[i].fall_ms.saturating_add(elapsed_ms);
        while pieces[i].fall_ms >= FALL_STEP_MS {
            if self.blocked_below(pieces, i) {
                let piece = &mut pieces[i];
                piece.set_motion(Motion::Resting);
                piece.fall_ms = 0;
                piece.hooks().play_sfx(Sfx::Attach);
                return;
            }
            pieces[i].fall_ms -= FALL_STEP_MS;
            pieces[i].move_down();
        }
    }

    fn watch_deadline(&self, piece: &mut StackPiece, elapsed_ms: u32) {
        if piece.row() >= self.deadline_row {
            piece.over_line_ms = 0;
            return;
        }
        piece.over_line_ms = piece.over_line_ms.saturating_add(elapsed_ms);
        if piece.over_line_ms >= DEADLINE_MS && !piece.overflowed {
            piece.overflowed = true;
            log::debug!("piece {} over the line", piece.id().0);
            piece.hooks().notify_overflow();
        }
    }

    fn blocked_below(&self, pieces: &[StackPiece], i: usize) -> bool {
        let (column, row) = (pieces[i].column(), pieces[i].row() + 1);
        if row >= self.height as i16 {
            return true;
        }
        pieces
            .iter()
            .enumerate()
            .any(|(j, p)| j != i && p.is_solid() && p.column() == column && p.row() == row)
    }
}
