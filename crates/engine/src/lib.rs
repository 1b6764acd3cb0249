//! Piece simulation for the terminal game
//!
//! A small column-stacking playfield that implements the piece collaborator
//! traits from `dongle-drop-core`. The session decides when pieces spawn, drop
//! and get purged; this crate decides where they go in between.
//!
//! # Module Structure
//!
//! - [`piece`]: `StackPiece` and its factory
//! - [`playfield`]: falling, landing and the deadline watch

pub mod piece;
pub mod playfield;

pub use dongle_drop_types as types;

pub use piece::{Motion, StackFactory, StackPiece, HIDE_MS};
pub use playfield::{Playfield, DEADLINE_MS, DEADLINE_ROW, FALL_STEP_MS, FIELD_HEIGHT, FIELD_WIDTH};
