//! Spawn cycle - one current piece at a time
//!
//! ```text
//! Idle ──spawn──▶ AwaitingRelease ──release──▶ Cooldown ──spawn──▶ AwaitingRelease ...
//!   ▲                                                │
//!   └──────────────────────── halt ◀─────────────────┘
//! ```
//!
//! The release is pushed by the drop handler rather than polled for. The
//! cycle itself only tracks which piece is current and which phase it is in;
//! the session owns the pool, the timers and the over-flag that guards every
//! transition.

use crate::piece::PieceId;
use crate::types::SpawnPhase;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnCycle {
    phase: SpawnPhase,
    current: Option<PieceId>,
    spawned: u32,
}

impl SpawnCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SpawnPhase {
        self.phase
    }

    /// Piece the player may currently drag.
    pub fn current(&self) -> Option<PieceId> {
        self.current
    }

    /// Pieces spawned since the cycle was built.
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Whether a spawn may happen now. A spawn is refused while a current piece
    /// is still held.
    pub fn can_spawn(&self, over: bool) -> bool {
        !over && self.current.is_none() && self.phase != SpawnPhase::AwaitingRelease
    }

    /// Record `piece` as the new current piece.
    pub fn on_spawned(&mut self, piece: PieceId) {
        self.current = Some(piece);
        self.phase = SpawnPhase::AwaitingRelease;
        self.spawned = self.spawned.wrapping_add(1);
    }

    /// The player dropped the current piece.
    ///
    /// Returns the released piece when the cooldown should start. Once the
    /// session is over the reference is still cleared but the cycle halts
    /// instead of entering the cooldown.
    pub fn release(&mut self, over: bool) -> Option<PieceId> {
        if self.phase != SpawnPhase::AwaitingRelease {
            return None;
        }
        let piece = self.current.take()?;
        if over {
            self.phase = SpawnPhase::Idle;
            return None;
        }
        self.phase = SpawnPhase::Cooldown;
        Some(piece)
    }

    /// Stop the cycle; nothing is current afterwards.
    pub fn halt(&mut self) {
        self.current = None;
        self.phase = SpawnPhase::Idle;
    }
}
