//! Terminal runner (default binary).
//!
//! Drives one session at a fixed 16ms step: render, poll input until the next
//! tick, then step the playfield and the session. Logging goes to the file in
//! `DONGLE_LOG_PATH` when set, since stdout belongs to the alternate screen.

use std::fs::File;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use dongle_drop::core::{JsonFileStore, MuteChannel, SessionConfig, SessionController};
use dongle_drop::engine::{Playfield, StackFactory};
use dongle_drop::input::handle_key_event;
use dongle_drop::term::{FrameBuffer, GameView, Scene, TerminalRenderer, Viewport};
use dongle_drop::types::TICK_MS;

type Session = SessionController<StackFactory, MuteChannel, JsonFileStore>;

fn main() -> Result<()> {
    let mut config = SessionConfig::from_env()?;
    init_logging(&config)?;
    if config.seed.is_none() {
        config.seed = Some(clock_seed());
    }

    let field = Playfield::default();
    let store = JsonFileStore::new(&config.save_path);
    let mut session: Session = SessionController::with_mute_audio(config, field.factory(), store);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session, &field);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(config: &SessionConfig) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("logging to {}", path.display());
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, session: &mut Session, field: &Playfield) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let snapshot = session.snapshot();
        let scene = Scene {
            snapshot: &snapshot,
            pieces: session.pieces(),
            effects: session.effects(),
            field,
        };
        view.render_into(scene, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = handle_key_event(key) {
                        session.apply_action(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }
        if session.quit_requested() {
            log::info!("quit at {}ms", session.now_ms());
            return Ok(());
        }

        // Tick.
        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            field.step(session.pieces_mut(), TICK_MS);
            session.tick(TICK_MS);
        }
    }
}
