//! Piece collaborator interface.
//!
//! Pieces are owned by the session's pool and driven by an external simulation
//! (see the `engine` crate). The session only needs the operations in [`Piece`].
//! Pieces report back through [`PieceHooks`], a capability handed to them at
//! construction, instead of holding a reference to the session.

use std::cell::RefCell;
use std::rc::Rc;

use arrayvec::ArrayVec;

use crate::pool::Pooled;
use crate::types::{Displacement, Sfx, EFFECT_BURST_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub usize);

/// A pooled game piece.
pub trait Piece: Pooled {
    fn id(&self) -> PieceId;

    fn level(&self) -> u8;

    /// Reuse the piece: assign its level and make it visible and draggable.
    fn activate(&mut self, level: u8);

    /// Return the piece to the pool.
    fn deactivate(&mut self);

    /// Effect paired with this piece for its lifetime.
    fn effect(&self) -> EffectId;

    fn physics_enabled(&self) -> bool;

    fn set_physics(&mut self, enabled: bool);

    /// Touch-down/drag, moving the piece `dx` columns.
    fn drag(&mut self, dx: i8);

    /// Touch-up: let go of the piece so the simulation takes over.
    fn release(&mut self);

    /// Start moving the piece towards `displacement` and retire it.
    fn hide(&mut self, displacement: Displacement);
}

/// Everything a factory needs to build a pooled piece.
#[derive(Debug, Clone)]
pub struct PieceBinding {
    pub id: PieceId,
    pub effect: EffectId,
    pub hooks: PieceHooks,
}

pub trait PieceFactory {
    type Piece: Piece;

    fn make(&mut self, binding: PieceBinding) -> Self::Piece;
}

const OUTBOX_SFX: usize = 32;
const OUTBOX_EFFECTS: usize = 32;

/// Signals raised by pieces since the session last drained them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outbox {
    pub score: u32,
    pub sfx: ArrayVec<Sfx, OUTBOX_SFX>,
    pub effects: ArrayVec<EffectId, OUTBOX_EFFECTS>,
    pub overflow: bool,
}

impl Outbox {
    pub fn is_empty(&self) -> bool {
        self.score == 0 && self.sfx.is_empty() && self.effects.is_empty() && !self.overflow
    }
}

/// Capability pieces use to affect the session: score, sound, effects, overflow.
#[derive(Debug, Clone, Default)]
pub struct PieceHooks {
    outbox: Rc<RefCell<Outbox>>,
}

impl PieceHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_score(&self, delta: u32) {
        let mut outbox = self.outbox.borrow_mut();
        outbox.score = outbox.score.saturating_add(delta);
    }

    pub fn play_sfx(&self, sfx: Sfx) {
        if self.outbox.borrow_mut().sfx.try_push(sfx).is_err() {
            log::debug!("sfx outbox full, dropping {}", sfx.as_str());
        }
    }

    pub fn trigger_effect(&self, effect: EffectId) {
        if self.outbox.borrow_mut().effects.try_push(effect).is_err() {
            log::debug!("effect outbox full, dropping effect {}", effect.0);
        }
    }

    /// Report that a piece crossed the overflow line.
    pub fn notify_overflow(&self) {
        self.outbox.borrow_mut().overflow = true;
    }

    /// Take every pending signal, leaving the outbox empty.
    pub fn drain(&self) -> Outbox {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }

    pub fn has_pending(&self) -> bool {
        !self.outbox.borrow().is_empty()
    }
}

/// Visual effect paired 1:1 with a piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    id: EffectId,
    remaining_ms: u32,
    bursts: u32,
}

impl Effect {
    pub fn new(id: EffectId) -> Self {
        Self {
            id,
            remaining_ms: 0,
            bursts: 0,
        }
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    /// Restart the burst.
    pub fn trigger(&mut self) {
        self.remaining_ms = EFFECT_BURST_MS;
        self.bursts = self.bursts.wrapping_add(1);
    }

    pub fn tick(&mut self, elapsed_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Total bursts since the effect was built.
    pub fn bursts(&self) -> u32 {
        self.bursts
    }
}

impl Pooled for Effect {
    fn in_use(&self) -> bool {
        self.remaining_ms > 0
    }
}
