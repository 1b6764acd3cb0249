//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! from the session core, the playfield engine, and the terminal frontend alike.
//!
//! # Session Timing Constants
//!
//! All delays are expressed in milliseconds of session time:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `START_DELAY_MS` | 500 | Delay between `start` and the first spawn |
//! | `SPAWN_COOLDOWN_MS` | 2500 | Delay between a drop and the next spawn |
//! | `PURGE_STAGGER_MS` | 100 | Gap between hiding two pieces at game over |
//! | `GAME_OVER_SETTLE_MS` | 1000 | Wait after the purge before the end screen |
//! | `RESET_DELAY_MS` | 1000 | Wait after pressing reset before the reload |
//!
//! # Examples
//!
//! ```
//! use dongle_drop_types::{GameAction, Sfx, SessionPhase};
//!
//! assert_eq!(GameAction::from_str("drop"), Some(GameAction::Drop));
//! assert_eq!(Sfx::Next.clip_variants(), 1);
//! assert_eq!(SessionPhase::default(), SessionPhase::NotStarted);
//! ```

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delay between starting a session and the first spawn.
pub const START_DELAY_MS: u32 = 500;

/// Cooldown between releasing the current piece and spawning the next one.
pub const SPAWN_COOLDOWN_MS: u32 = 2500;

/// Gap between consecutive hides during the game-over purge.
pub const PURGE_STAGGER_MS: u32 = 100;

/// Wait after the last purge step before the end screen is shown.
pub const GAME_OVER_SETTLE_MS: u32 = 1000;

/// Wait between pressing reset and the session reload.
pub const RESET_DELAY_MS: u32 = 1000;

/// Length of a single effect burst.
pub const EFFECT_BURST_MS: u32 = 480;

/// Initial pool size when none is configured.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Bounds for the configured initial pool size.
pub const MIN_POOL_SIZE: usize = 1;
pub const MAX_POOL_SIZE: usize = 30;

/// Spawned levels are drawn from `[0, max_level)`.
pub const DEFAULT_MAX_LEVEL: u8 = 3;

/// Highest level a piece can carry (11 piece faces, 0..=10).
pub const LEVEL_CAP: u8 = 11;

/// Number of sfx channels when none is configured.
pub const DEFAULT_SFX_CHANNELS: usize = 8;

/// Capacity of the sfx channel ring.
pub const MAX_SFX_CHANNELS: usize = 16;

/// Number of distinct clips in the sfx table.
pub const SFX_CLIP_COUNT: usize = 7;

/// Background music clip, played on its own channel.
pub const BGM_CLIP: ClipId = ClipId(SFX_CLIP_COUNT as u8);

/// Where the purge sends pieces: far above the playfield.
pub const PURGE_DISPLACEMENT: Displacement = Displacement { dx: 0, dy: -100 };

/// Index into the clip table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClipId(pub u8);

impl ClipId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Sound effect categories.
///
/// `LevelUp` has three clip variants; every other category maps to exactly one clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    LevelUp,
    Next,
    Attach,
    Button,
    Over,
}

impl Sfx {
    pub const ALL: [Sfx; 5] = [Sfx::LevelUp, Sfx::Next, Sfx::Attach, Sfx::Button, Sfx::Over];

    /// Number of interchangeable clips for this category.
    pub fn clip_variants(self) -> u32 {
        match self {
            Sfx::LevelUp => 3,
            _ => 1,
        }
    }

    /// Resolve a clip for the given variant (clamped to the last variant).
    pub fn clip(self, variant: u32) -> ClipId {
        let last = self.clip_variants() - 1;
        let variant = variant.min(last) as u8;
        match self {
            Sfx::LevelUp => ClipId(variant),
            Sfx::Next => ClipId(3),
            Sfx::Attach => ClipId(4),
            Sfx::Button => ClipId(5),
            Sfx::Over => ClipId(6),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sfx::LevelUp => "levelUp",
            Sfx::Next => "next",
            Sfx::Attach => "attach",
            Sfx::Button => "button",
            Sfx::Over => "over",
        }
    }
}

/// Top-level session phase.
///
/// Transitions: `NotStarted → Playing → GameOver → Resetting → NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Playing,
    GameOver,
    Resetting,
}

impl SessionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::NotStarted => "notStarted",
            SessionPhase::Playing => "playing",
            SessionPhase::GameOver => "gameOver",
            SessionPhase::Resetting => "resetting",
        }
    }
}

/// Spawn cycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpawnPhase {
    /// Nothing pending: before the first spawn, or halted after game over.
    #[default]
    Idle,
    /// A current piece exists and the player has not dropped it yet.
    AwaitingRelease,
    /// The current piece was dropped; the next spawn is scheduled.
    Cooldown,
}

/// Offset (in playfield cells) a hidden piece travels towards.
///
/// Negative `dy` points up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Displacement {
    pub dx: i16,
    pub dy: i16,
}

/// Player actions the session reacts to.
///
/// These are produced by the terminal key map and by tests driving the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Press the start button.
    Start,
    /// Touch-down/drag the current piece by `n` columns (0 just grabs it).
    Drag(i8),
    /// Touch-up: drop the current piece.
    Drop,
    /// Press the reset button on the end screen.
    Reset,
    /// Global cancel: quit the application.
    Cancel,
}

impl GameAction {
    /// Parse action from string (drag parses to a plain grab).
    ///
    /// # Examples
    ///
    /// ```
    /// use dongle_drop_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("Start"), Some(GameAction::Start));
    /// assert_eq!(GameAction::from_str("drag"), Some(GameAction::Drag(0)));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(GameAction::Start),
            "drag" => Some(GameAction::Drag(0)),
            "drop" => Some(GameAction::Drop),
            "reset" => Some(GameAction::Reset),
            "cancel" => Some(GameAction::Cancel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Start => "start",
            GameAction::Drag(_) => "drag",
            GameAction::Drop => "drop",
            GameAction::Reset => "reset",
            GameAction::Cancel => "cancel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_timing_defaults() {
        assert_eq!(START_DELAY_MS, 500);
        assert_eq!(SPAWN_COOLDOWN_MS, 2500);
        assert_eq!(PURGE_STAGGER_MS, 100);
        assert_eq!(GAME_OVER_SETTLE_MS, 1000);
        assert_eq!(RESET_DELAY_MS, 1000);
    }

    #[test]
    fn clip_table_covers_every_category() {
        let mut seen = [false; SFX_CLIP_COUNT];
        for sfx in Sfx::ALL {
            for variant in 0..sfx.clip_variants() {
                seen[sfx.clip(variant).index()] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn level_up_wraps_variant_index() {
        assert_eq!(Sfx::LevelUp.clip(0), ClipId(0));
        assert_eq!(Sfx::LevelUp.clip(2), ClipId(2));
        assert_eq!(Sfx::LevelUp.clip(5), ClipId(2));
        assert_eq!(Sfx::Over.clip(7), ClipId(6));
    }
}
