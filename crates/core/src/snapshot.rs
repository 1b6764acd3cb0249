use crate::piece::PieceId;
use crate::types::{SessionPhase, SpawnPhase};

/// Visibility of the presentation groups driven by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UiState {
    /// Title group with the start button.
    pub start_visible: bool,
    /// Playfield line/floor plus the score and best-score labels.
    pub hud_visible: bool,
    /// End group with the final score and the reset button.
    pub end_visible: bool,
}

impl UiState {
    pub fn title() -> Self {
        Self {
            start_visible: true,
            hud_visible: false,
            end_visible: false,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::title()
    }
}

/// Read-only view of the session for renderers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub spawn_phase: SpawnPhase,
    pub current: Option<PieceId>,
    pub score: u32,
    pub best: u32,
    /// Score frozen for the end screen.
    pub final_score: Option<u32>,
    pub ui: UiState,
    pub episode_id: u32,
    pub pool_len: usize,
    pub active_pieces: usize,
    pub now_ms: u64,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == SessionPhase::Playing
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            spawn_phase: SpawnPhase::Idle,
            current: None,
            score: 0,
            best: 0,
            final_score: None,
            ui: UiState::title(),
            episode_id: 0,
            pool_len: 0,
            active_pieces: 0,
            now_ms: 0,
        }
    }
}
