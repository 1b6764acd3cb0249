//! Terminal input.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. The mapping is
//! stateless: a drag key moves the current piece one column per press, and the
//! terminal's own key repeat covers holding it down.

pub mod map;

pub use dongle_drop_types as types;

pub use map::{handle_key_event, is_cancel};
