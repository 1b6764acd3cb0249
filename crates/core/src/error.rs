//! Error types for the ambient edges of the session: persistence and configuration.
//!
//! Gameplay itself never fails; invalid requests there are silent no-ops.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DongleError {
    #[error("best score store I/O failed at {path}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("best score store at {path} is corrupt")]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, DongleError>;
