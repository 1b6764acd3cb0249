//! Session controller - start / play / game over / reset
//!
//! Owns every piece of mutable session state: the piece and effect pools, the
//! spawn cycle, the scheduler, the sfx ring, background music and the score
//! tracker. Nothing else mutates them, and all work happens on the caller's
//! thread inside [`SessionController::tick`] and the action methods.
//!
//! Scheduled continuations re-check the phase before doing anything, so a game
//! over that lands while a spawn or a cooldown is pending cancels it without an
//! explicit cancel signal.

use crate::audio::{AudioChannel, AudioChannelRing, MuteChannel};
use crate::config::SessionConfig;
use crate::piece::{Effect, EffectId, Piece, PieceBinding, PieceFactory, PieceHooks, PieceId};
use crate::pool::ResourcePool;
use crate::rng::SimpleRng;
use crate::scheduler::{Scheduler, Task};
use crate::score::{ScoreStore, ScoreTracker};
use crate::snapshot::{SessionSnapshot, UiState};
use crate::spawn::SpawnCycle;
use crate::types::*;

pub struct SessionController<F: PieceFactory, C, S> {
    config: SessionConfig,
    factory: F,
    hooks: PieceHooks,
    pieces: ResourcePool<F::Piece>,
    effects: ResourcePool<Effect>,
    spawn: SpawnCycle,
    scheduler: Scheduler,
    sfx: AudioChannelRing<C>,
    bgm: C,
    score: ScoreTracker<S>,
    rng: SimpleRng,
    phase: SessionPhase,
    ui: UiState,
    final_score: Option<u32>,
    /// Pieces live at game over, hidden in this order.
    purge: Vec<PieceId>,
    purge_next: usize,
    /// Monotonic episode id (increments on every reload).
    episode_id: u32,
    quit_requested: bool,
}

impl<F, S> SessionController<F, MuteChannel, S>
where
    F: PieceFactory,
    S: ScoreStore,
{
    /// Session whose sfx ring and music channel make no sound.
    pub fn with_mute_audio(config: SessionConfig, factory: F, store: S) -> Self {
        let channels = std::iter::repeat(MuteChannel::default()).take(config.sfx_channels);
        Self::new(config, factory, channels, MuteChannel::default(), store)
    }
}

impl<F, C, S> SessionController<F, C, S>
where
    F: PieceFactory,
    C: AudioChannel,
    S: ScoreStore,
{
    pub fn new(
        config: SessionConfig,
        mut factory: F,
        sfx_channels: impl IntoIterator<Item = C>,
        bgm: C,
        store: S,
    ) -> Self {
        let hooks = PieceHooks::new();
        let (pieces, effects) = build_pools(&mut factory, &hooks, config.pool_size);
        let rng = SimpleRng::new(config.seed.unwrap_or(1));
        let purge = Vec::with_capacity(config.pool_size);

        Self {
            factory,
            hooks,
            pieces,
            effects,
            spawn: SpawnCycle::new(),
            scheduler: Scheduler::new(),
            sfx: AudioChannelRing::new(sfx_channels),
            bgm,
            score: ScoreTracker::new(store),
            rng,
            phase: SessionPhase::NotStarted,
            ui: UiState::title(),
            final_score: None,
            purge,
            purge_next: 0,
            episode_id: 0,
            quit_requested: false,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True from the moment `game_over` runs until the reload completes.
    pub fn is_over(&self) -> bool {
        matches!(self.phase, SessionPhase::GameOver | SessionPhase::Resetting)
    }

    pub fn spawn_phase(&self) -> SpawnPhase {
        self.spawn.phase()
    }

    pub fn current_piece(&self) -> Option<PieceId> {
        self.spawn.current()
    }

    pub fn piece(&self, id: PieceId) -> Option<&F::Piece> {
        self.pieces.get(id.0)
    }

    pub fn pieces(&self) -> &[F::Piece] {
        self.pieces.items()
    }

    /// Mutable pieces for the simulation that moves them.
    pub fn pieces_mut(&mut self) -> &mut [F::Piece] {
        self.pieces.items_mut()
    }

    pub fn effects(&self) -> &[Effect] {
        self.effects.items()
    }

    pub fn effect(&self, id: EffectId) -> Option<&Effect> {
        self.effects.get(id.0)
    }

    pub fn pool_len(&self) -> usize {
        self.pieces.len()
    }

    pub fn score(&self) -> u32 {
        self.score.current()
    }

    pub fn best(&self) -> u32 {
        self.score.best()
    }

    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn score_store(&self) -> &S {
        self.score.store()
    }

    pub fn ui(&self) -> UiState {
        self.ui
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn sfx(&self) -> &AudioChannelRing<C> {
        &self.sfx
    }

    pub fn bgm(&self) -> &C {
        &self.bgm
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            spawn_phase: self.spawn.phase(),
            current: self.spawn.current(),
            score: self.score.current(),
            best: self.score.best(),
            final_score: self.final_score,
            ui: self.ui,
            episode_id: self.episode_id,
            pool_len: self.pieces.len(),
            active_pieces: self.pieces.in_use_count(),
            now_ms: self.scheduler.now_ms(),
        }
    }

    /// Press the start button. Only the first press per session counts.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::NotStarted {
            return false;
        }

        self.phase = SessionPhase::Playing;
        self.ui.start_visible = false;
        self.ui.hud_visible = true;
        self.bgm.set_clip(BGM_CLIP);
        self.bgm.play();
        self.play_sfx(Sfx::Button);
        self.scheduler.schedule(START_DELAY_MS, Task::SpawnNext);
        log::info!("episode {} started", self.episode_id);
        true
    }

    /// Touch-down/drag on the current piece.
    pub fn touch_down(&mut self, dx: i8) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        let Some(id) = self.spawn.current() else {
            return false;
        };
        let Some(piece) = self.pieces.get_mut(id.0) else {
            return false;
        };
        piece.drag(dx);
        true
    }

    /// Touch-up: drop the current piece and start the spawn cooldown.
    pub fn touch_up(&mut self) -> bool {
        let Some(id) = self.spawn.current() else {
            return false;
        };
        if let Some(piece) = self.pieces.get_mut(id.0) {
            piece.release();
        }

        let over = self.is_over();
        if self.spawn.release(over).is_some() {
            self.scheduler.schedule(SPAWN_COOLDOWN_MS, Task::SpawnNext);
        }
        true
    }

    /// End the session. Idempotent; only a playing session can end.
    pub fn game_over(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }

        self.phase = SessionPhase::GameOver;
        self.bgm.stop();
        self.spawn.halt();

        self.purge.clear();
        self.purge.extend(self.pieces.in_use_indices().map(PieceId));
        self.purge_next = 0;
        for id in &self.purge {
            if let Some(piece) = self.pieces.get_mut(id.0) {
                piece.set_physics(false);
            }
        }

        log::info!(
            "episode {} over at score {}, purging {} pieces",
            self.episode_id,
            self.score.current(),
            self.purge.len()
        );
        self.purge_step();
        true
    }

    /// Press the reset button on the end screen.
    pub fn reset(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver || !self.ui.end_visible {
            return false;
        }

        self.play_sfx(Sfx::Button);
        self.phase = SessionPhase::Resetting;
        self.scheduler.schedule(RESET_DELAY_MS, Task::Reload);
        true
    }

    /// Global cancel: ask the runner to quit, whatever the phase.
    pub fn cancel(&mut self) -> bool {
        self.quit_requested = true;
        true
    }

    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Start => self.start(),
            GameAction::Drag(dx) => self.touch_down(dx),
            GameAction::Drop => self.touch_up(),
            GameAction::Reset => self.reset(),
            GameAction::Cancel => self.cancel(),
        }
    }

    /// Advance session time by `elapsed_ms`.
    ///
    /// Pending piece signals are applied first, then every continuation that
    /// falls due within the step runs at its own due time.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.pump_signals();

        let until = self.scheduler.now_ms() + elapsed_ms as u64;
        while let Some(task) = self.scheduler.pop_due(until) {
            self.run_task(task);
            self.pump_signals();
        }
        self.scheduler.advance_to(until);

        for effect in self.effects.items_mut() {
            effect.tick(elapsed_ms);
        }
    }

    /// Apply score, sound, effect and overflow signals raised by pieces.
    pub fn pump_signals(&mut self) {
        if !self.hooks.has_pending() {
            return;
        }
        let outbox = self.hooks.drain();

        self.score.add_score(outbox.score);
        for sfx in outbox.sfx {
            self.play_sfx(sfx);
        }
        for id in outbox.effects {
            if let Some(effect) = self.effects.get_mut(id.0) {
                effect.trigger();
            }
        }
        if outbox.overflow {
            self.game_over();
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::SpawnNext => self.request_next(),
            Task::PurgeStep => self.purge_step(),
            Task::FinishGameOver => self.finish_game_over(),
            Task::Reload => self.reload(),
        }
    }

    fn request_next(&mut self) {
        if !self.spawn.can_spawn(self.is_over()) {
            return;
        }

        let factory = &mut self.factory;
        let effects = &mut self.effects;
        let hooks = &self.hooks;
        let index = self.pieces.acquire(|index| {
            let effect = effects.push(Effect::new(EffectId(index)));
            log::debug!("piece pool grew to {}", index + 1);
            factory.make(PieceBinding {
                id: PieceId(index),
                effect: EffectId(effect),
                hooks: hooks.clone(),
            })
        });

        let level = self.rng.next_level(self.config.max_level);
        if let Some(piece) = self.pieces.get_mut(index) {
            piece.activate(level);
        }
        self.play_sfx(Sfx::Next);
        self.spawn.on_spawned(PieceId(index));
        log::debug!("spawned piece {index} at level {level}");
    }

    fn purge_step(&mut self) {
        if self.phase != SessionPhase::GameOver {
            return;
        }

        match self.purge.get(self.purge_next).copied() {
            Some(id) => {
                self.purge_next += 1;
                if let Some(piece) = self.pieces.get_mut(id.0) {
                    piece.hide(PURGE_DISPLACEMENT);
                }
                self.scheduler.schedule(PURGE_STAGGER_MS, Task::PurgeStep);
            }
            None => {
                self.scheduler
                    .schedule(GAME_OVER_SETTLE_MS, Task::FinishGameOver);
            }
        }
    }

    fn finish_game_over(&mut self) {
        if self.phase != SessionPhase::GameOver || self.ui.end_visible {
            return;
        }

        let best = self.score.record_game_over();
        self.final_score = Some(self.score.current());
        self.ui.end_visible = true;
        self.play_sfx(Sfx::Over);
        log::info!(
            "episode {} final score {}, best {}",
            self.episode_id,
            self.score.current(),
            best
        );
    }

    /// Rebuild everything except the persisted best, the factory and the audio devices.
    fn reload(&mut self) {
        if self.phase != SessionPhase::Resetting {
            return;
        }

        self.hooks = PieceHooks::new();
        let (pieces, effects) = build_pools(&mut self.factory, &self.hooks, self.config.pool_size);
        self.pieces = pieces;
        self.effects = effects;
        self.spawn = SpawnCycle::new();
        self.scheduler.clear();
        self.sfx.stop_all();
        self.sfx.rewind();
        self.bgm.stop();
        self.score.reset_session();
        self.purge.clear();
        self.purge_next = 0;
        self.final_score = None;
        self.ui = UiState::title();
        self.phase = SessionPhase::NotStarted;
        self.episode_id = self.episode_id.wrapping_add(1);
        log::info!("session reloaded as episode {}", self.episode_id);
    }

    fn play_sfx(&mut self, sfx: Sfx) {
        self.sfx.play(sfx, &mut self.rng);
    }
}

fn build_pools<F: PieceFactory>(
    factory: &mut F,
    hooks: &PieceHooks,
    count: usize,
) -> (ResourcePool<F::Piece>, ResourcePool<Effect>) {
    let effects = ResourcePool::prewarm(count, |index| Effect::new(EffectId(index)));
    let pieces = ResourcePool::prewarm(count, |index| {
        factory.make(PieceBinding {
            id: PieceId(index),
            effect: EffectId(index),
            hooks: hooks.clone(),
        })
    });
    (pieces, effects)
}
