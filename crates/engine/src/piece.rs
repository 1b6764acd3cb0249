//! Stack piece - a single-cell piece for the terminal playfield.

use dongle_drop_core::{EffectId, Piece, PieceBinding, PieceFactory, PieceHooks, PieceId, Pooled};

use crate::types::{Displacement, PURGE_DISPLACEMENT};

/// How long a hidden piece animates before it is collected.
pub const HIDE_MS: u32 = 320;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Back in the pool.
    Pooled,
    /// Under player control at the spawn row.
    Held,
    Falling,
    Resting,
    /// Moving towards its hide target; collected when the timer runs out.
    Hiding { remaining_ms: u32 },
}

#[derive(Debug, Clone)]
pub struct StackPiece {
    id: PieceId,
    effect: EffectId,
    hooks: PieceHooks,
    level: u8,
    active: bool,
    physics: bool,
    motion: Motion,
    column: i16,
    row: i16,
    spawn_column: i16,
    max_column: i16,
    hide_target: Displacement,
    pub(crate) fall_ms: u32,
    pub(crate) over_line_ms: u32,
    pub(crate) overflowed: bool,
}

impl StackPiece {
    pub fn new(binding: PieceBinding, spawn_column: i16, max_column: i16) -> Self {
        Self {
            id: binding.id,
            effect: binding.effect,
            hooks: binding.hooks,
            level: 0,
            active: false,
            physics: false,
            motion: Motion::Pooled,
            column: spawn_column,
            row: 0,
            spawn_column,
            max_column,
            hide_target: Displacement::default(),
            fall_ms: 0,
            over_line_ms: 0,
            overflowed: false,
        }
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn column(&self) -> i16 {
        self.column
    }

    pub fn row(&self) -> i16 {
        self.row
    }

    pub fn hide_target(&self) -> Displacement {
        self.hide_target
    }

    /// Whether this piece takes up its cell for collision purposes.
    pub fn is_solid(&self) -> bool {
        self.active && matches!(self.motion, Motion::Falling | Motion::Resting)
    }

    pub(crate) fn hooks(&self) -> &PieceHooks {
        &self.hooks
    }

    pub(crate) fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    pub(crate) fn move_down(&mut self) {
        self.row += 1;
    }

    /// Finish the hide: award `2^level` and return to the pool.
    pub(crate) fn collect(&mut self) {
        self.hooks.add_score(1u32 << self.level.min(31));
        self.deactivate();
    }
}

impl Pooled for StackPiece {
    fn in_use(&self) -> bool {
        self.active
    }
}

impl Piece for StackPiece {
    fn id(&self) -> PieceId {
        self.id
    }

    fn level(&self) -> u8 {
        self.level
    }

    fn activate(&mut self, level: u8) {
        self.level = level;
        self.active = true;
        self.physics = false;
        self.motion = Motion::Held;
        self.column = self.spawn_column;
        self.row = 0;
        self.fall_ms = 0;
        self.over_line_ms = 0;
        self.overflowed = false;
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.physics = false;
        self.motion = Motion::Pooled;
    }

    fn effect(&self) -> EffectId {
        self.effect
    }

    fn physics_enabled(&self) -> bool {
        self.physics
    }

    fn set_physics(&mut self, enabled: bool) {
        self.physics = enabled;
    }

    fn drag(&mut self, dx: i8) {
        if self.motion != Motion::Held {
            return;
        }
        self.column = (self.column + dx as i16).clamp(0, self.max_column);
    }

    fn release(&mut self) {
        if self.motion != Motion::Held {
            return;
        }
        self.motion = Motion::Falling;
        self.physics = true;
        self.fall_ms = 0;
    }

    fn hide(&mut self, displacement: Displacement) {
        if !self.active {
            return;
        }
        self.physics = false;
        self.hide_target = displacement;
        self.motion = Motion::Hiding {
            remaining_ms: HIDE_MS,
        };
        if displacement == PURGE_DISPLACEMENT {
            self.hooks.trigger_effect(self.effect);
        }
    }
}

/// Builds pieces that spawn at the playfield's centre column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackFactory {
    spawn_column: i16,
    max_column: i16,
}

impl StackFactory {
    pub fn new(width: u8) -> Self {
        let width = width.max(1) as i16;
        Self {
            spawn_column: width / 2,
            max_column: width - 1,
        }
    }
}

impl PieceFactory for StackFactory {
    type Piece = StackPiece;

    fn make(&mut self, binding: PieceBinding) -> StackPiece {
        StackPiece::new(binding, self.spawn_column, self.max_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(hooks: &PieceHooks) -> StackPiece {
        StackFactory::new(9).make(PieceBinding {
            id: PieceId(0),
            effect: EffectId(4),
            hooks: hooks.clone(),
        })
    }

    #[test]
    fn activate_places_piece_at_spawn() {
        let hooks = PieceHooks::new();
        let mut p = piece(&hooks);
        assert!(!p.in_use());

        p.activate(2);
        assert!(p.in_use());
        assert_eq!(p.level(), 2);
        assert_eq!(p.motion(), Motion::Held);
        assert_eq!((p.column(), p.row()), (4, 0));
        assert!(!p.physics_enabled());
    }

    #[test]
    fn drag_clamps_to_field_and_stops_after_release() {
        let hooks = PieceHooks::new();
        let mut p = piece(&hooks);
        p.activate(0);

        p.drag(-10);
        assert_eq!(p.column(), 0);
        p.drag(100);
        assert_eq!(p.column(), 8);

        p.release();
        assert_eq!(p.motion(), Motion::Falling);
        assert!(p.physics_enabled());
        p.drag(-1);
        assert_eq!(p.column(), 8);
    }

    #[test]
    fn purge_hide_triggers_paired_effect() {
        let hooks = PieceHooks::new();
        let mut p = piece(&hooks);
        p.activate(1);
        p.release();

        p.hide(PURGE_DISPLACEMENT);
        assert!(!p.physics_enabled());
        assert!(matches!(p.motion(), Motion::Hiding { .. }));
        assert_eq!(hooks.drain().effects.as_slice(), &[EffectId(4)]);
    }

    #[test]
    fn other_hides_are_silent() {
        let hooks = PieceHooks::new();
        let mut p = piece(&hooks);
        p.activate(1);
        p.hide(Displacement { dx: 1, dy: 0 });
        assert!(!hooks.has_pending());
    }

    #[test]
    fn collect_awards_power_of_two_and_pools_piece() {
        let hooks = PieceHooks::new();
        let mut p = piece(&hooks);
        p.activate(3);
        p.collect();
        assert!(!p.in_use());
        assert_eq!(p.motion(), Motion::Pooled);
        assert_eq!(hooks.drain().score, 8);
    }
}
