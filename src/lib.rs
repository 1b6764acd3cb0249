//! Dongle Drop (workspace facade crate).
//!
//! Re-exports the member crates under short names so the binary, the
//! integration tests and the benches share one import path:
//! `dongle_drop::{core,engine,input,term,types}`.

pub use dongle_drop_core as core;
pub use dongle_drop_engine as engine;
pub use dongle_drop_input as input;
pub use dongle_drop_term as term;
pub use dongle_drop_types as types;
