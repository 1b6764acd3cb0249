//! Session core - pooling, spawning, scoring and the session state machine
//!
//! This crate contains everything that decides *when* things happen in a
//! session. It has no dependency on a terminal, a physics engine or an audio
//! backend: pieces, audio channels and the best-score store are traits that
//! collaborators implement.
//!
//! # Module Structure
//!
//! - [`pool`]: reusable handles with a rotating cursor and lazy growth
//! - [`piece`]: piece collaborator traits, hooks and paired effects
//! - [`audio`]: round-robin sfx channel ring
//! - [`score`]: current score and the persisted best
//! - [`spawn`]: one-current-piece spawn cycle
//! - [`scheduler`]: virtual clock for delayed continuations
//! - [`session`]: the controller tying it all together
//! - [`config`]: `DONGLE_*` configuration
//!
//! # Timing
//!
//! The session is driven by a fixed timestep: call
//! [`SessionController::tick`](session::SessionController::tick) once per frame
//! with the elapsed milliseconds (`TICK_MS` at 60 FPS). All delays are measured
//! on that clock, never on wall time.

pub mod audio;
pub mod config;
pub mod error;
pub mod piece;
pub mod pool;
pub mod rng;
pub mod scheduler;
pub mod score;
pub mod session;
pub mod snapshot;
pub mod spawn;

pub use dongle_drop_types as types;

pub use audio::{AudioChannel, AudioChannelRing, MuteChannel};
pub use config::SessionConfig;
pub use error::{DongleError, Result};
pub use piece::{Effect, EffectId, Outbox, Piece, PieceBinding, PieceFactory, PieceHooks, PieceId};
pub use pool::{Pooled, ResourcePool};
pub use rng::SimpleRng;
pub use scheduler::{Scheduler, Task};
pub use score::{JsonFileStore, MemoryStore, ScoreStore, ScoreTracker};
pub use session::SessionController;
pub use snapshot::{SessionSnapshot, UiState};
pub use spawn::SpawnCycle;
