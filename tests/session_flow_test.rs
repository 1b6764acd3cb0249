use dongle_drop::core::{MemoryStore, MuteChannel, Piece, Pooled, SessionConfig, SessionController};
use dongle_drop::engine::{Motion, Playfield, StackFactory};
use dongle_drop::types::*;

type Session = SessionController<StackFactory, MuteChannel, MemoryStore>;

fn session(pool_size: usize, best: Option<u32>) -> (Session, Playfield) {
    let field = Playfield::default();
    let config = SessionConfig {
        pool_size,
        max_level: 3,
        seed: Some(42),
        ..SessionConfig::default()
    };
    let store = best.map(MemoryStore::with_best).unwrap_or_default();
    let session = SessionController::with_mute_audio(config, field.factory(), store);
    (session, field)
}

/// Step the playfield and the session together, one frame at a time.
fn advance(s: &mut Session, field: &Playfield, ms: u32) {
    let mut left = ms;
    while left > 0 {
        let step = left.min(TICK_MS);
        field.step(s.pieces_mut(), step);
        s.tick(step);
        left -= step;
    }
}

fn active(s: &Session) -> usize {
    s.pieces().iter().filter(|p| p.in_use()).count()
}

#[test]
fn pool_of_five_spawns_then_respawns_after_cooldown() {
    let (mut s, field) = session(5, None);
    assert!(s.start());

    advance(&mut s, &field, START_DELAY_MS - 1);
    assert_eq!(active(&s), 0);
    advance(&mut s, &field, 1);
    assert_eq!(active(&s), 1);
    let first = s.current_piece().expect("first piece");
    assert!(s.piece(first).unwrap().level() < 3);

    assert!(s.touch_up());
    advance(&mut s, &field, SPAWN_COOLDOWN_MS - 1);
    assert_eq!(active(&s), 1);
    assert_eq!(s.current_piece(), None);

    advance(&mut s, &field, 1);
    assert_eq!(active(&s), 2);
    assert!(s.current_piece().is_some());
    assert_ne!(s.current_piece(), Some(first));
    assert_eq!(s.pool_len(), 5);
}

#[test]
fn dropped_piece_lands_and_plays_attach() {
    let (mut s, field) = session(5, None);
    s.start();
    advance(&mut s, &field, START_DELAY_MS);
    let id = s.current_piece().unwrap();

    assert!(s.touch_down(-2));
    assert!(s.touch_up());
    advance(&mut s, &field, 2000);

    let piece = s.piece(id).unwrap();
    assert_eq!(piece.motion(), Motion::Resting);
    assert_eq!(piece.column(), 2);
    assert_eq!(piece.row(), field.height() as i16 - 1);
    assert!(s
        .sfx()
        .channels()
        .iter()
        .any(|c| c.clip == Some(Sfx::Attach.clip(0))));
}

#[test]
fn stacking_past_the_line_ends_game_and_purge_scores() {
    let (mut s, field) = session(10, None);
    s.start();
    advance(&mut s, &field, START_DELAY_MS);

    let mut drops = 0;
    while s.phase() == SessionPhase::Playing && drops < 20 {
        s.touch_up();
        advance(&mut s, &field, SPAWN_COOLDOWN_MS);
        drops += 1;
    }

    // Rows 13 down to 3 hold eleven pieces; the twelfth lands over the line.
    assert_eq!(drops, 12);
    assert_eq!(s.phase(), SessionPhase::GameOver);
    assert_eq!(s.pool_len(), 12);
    assert_eq!(s.current_piece(), None);

    let expected: u32 = s.pieces().iter().map(|p| 1u32 << p.level()).sum();
    advance(&mut s, &field, 5000);

    assert!(s.ui().end_visible);
    assert_eq!(active(&s), 0);
    assert_eq!(s.final_score(), Some(expected));
    assert_eq!(s.best(), expected);
    assert!(s.effects().iter().all(|e| e.bursts() == 1));
}

#[test]
fn purge_hides_the_snapshot_in_order() {
    let (mut s, field) = session(10, None);
    s.start();
    advance(&mut s, &field, START_DELAY_MS);
    for _ in 0..3 {
        s.touch_up();
        advance(&mut s, &field, SPAWN_COOLDOWN_MS);
    }

    let snapshot: Vec<_> = s
        .pieces()
        .iter()
        .filter(|p| p.in_use())
        .map(|p| p.id())
        .collect();
    assert_eq!(snapshot.len(), 4);
    assert!(s.game_over());

    let hiding = |s: &Session| -> Vec<bool> {
        snapshot
            .iter()
            .map(|id| matches!(s.piece(*id).unwrap().motion(), Motion::Hiding { .. }))
            .collect()
    };
    assert_eq!(hiding(&s), [true, false, false, false]);
    advance(&mut s, &field, PURGE_STAGGER_MS);
    assert_eq!(hiding(&s), [true, true, false, false]);
    advance(&mut s, &field, PURGE_STAGGER_MS);
    assert_eq!(hiding(&s), [true, true, true, false]);
    advance(&mut s, &field, PURGE_STAGGER_MS);
    assert_eq!(hiding(&s), [true, true, true, true]);
}

#[test]
fn reset_reloads_and_keeps_best() {
    let (mut s, field) = session(10, Some(3));
    s.start();
    advance(&mut s, &field, START_DELAY_MS);
    s.touch_up();
    advance(&mut s, &field, SPAWN_COOLDOWN_MS);
    s.game_over();
    advance(&mut s, &field, 5000);

    let final_score = s.final_score().unwrap();
    assert!(s.reset());
    advance(&mut s, &field, RESET_DELAY_MS);

    assert_eq!(s.phase(), SessionPhase::NotStarted);
    assert_eq!(s.episode_id(), 1);
    assert_eq!(s.pool_len(), 10);
    assert_eq!(active(&s), 0);
    assert_eq!(s.score(), 0);
    assert_eq!(s.best(), final_score.max(3));
    assert!(s.ui().start_visible);
    assert!(!s.bgm().playing);
}

#[test]
fn drop_after_game_over_does_not_restart_cycle() {
    let (mut s, field) = session(5, None);
    s.start();
    advance(&mut s, &field, START_DELAY_MS);
    s.game_over();

    assert!(!s.touch_up());
    assert!(!s.touch_down(1));
    advance(&mut s, &field, SPAWN_COOLDOWN_MS * 2);
    assert_eq!(s.spawn_phase(), SpawnPhase::Idle);
    assert_eq!(active(&s), 0);
}
