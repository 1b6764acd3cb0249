//! Terminal "game renderer" module.
//!
//! Renders into a simple framebuffer that is diffed and flushed to the
//! terminal. No widget toolkit: the view is small enough to lay out by hand.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use dongle_drop_core as core;
pub use dongle_drop_engine as engine;
pub use dongle_drop_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Scene, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
