use dongle_drop::core::{MemoryStore, MuteChannel, Piece, SessionConfig, SessionController};
use dongle_drop::engine::{Playfield, StackFactory};
use dongle_drop::term::{FrameBuffer, GameView, Scene, Viewport};
use dongle_drop::types::{START_DELAY_MS, TICK_MS};

type Session = SessionController<StackFactory, MuteChannel, MemoryStore>;

fn session(best: u32) -> (Session, Playfield) {
    let field = Playfield::default();
    let config = SessionConfig {
        seed: Some(11),
        ..SessionConfig::default()
    };
    let s = SessionController::with_mute_audio(config, field.factory(), MemoryStore::with_best(best));
    (s, field)
}

fn advance(s: &mut Session, field: &Playfield, ms: u32) {
    let mut left = ms;
    while left > 0 {
        let step = left.min(TICK_MS);
        field.step(s.pieces_mut(), step);
        s.tick(step);
        left -= step;
    }
}

fn render(s: &Session, field: &Playfield, vp: Viewport) -> FrameBuffer {
    let snapshot = s.snapshot();
    GameView::default().render(
        Scene {
            snapshot: &snapshot,
            pieces: s.pieces(),
            effects: s.effects(),
            field,
        },
        vp,
    )
}

fn screen_text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            all.push(fb.get(x, y).unwrap().ch);
        }
        all.push('\n');
    }
    all
}

#[test]
fn term_view_renders_border_corners() {
    let (s, field) = session(0);
    // 9 cells * 2 columns + border = 20 wide, 14 rows + border = 16 high.
    let fb = render(&s, &field, Viewport::new(20, 16));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(19, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 15).unwrap().ch, '└');
    assert_eq!(fb.get(19, 15).unwrap().ch, '┘');
}

#[test]
fn title_screen_shows_start_prompt_without_hud() {
    let (s, field) = session(0);
    let text = screen_text(&render(&s, &field, Viewport::new(60, 20)));
    assert!(text.contains("DONGLE DROP"));
    assert!(text.contains("Enter: start"));
    assert!(!text.contains("Score:"));
}

#[test]
fn hud_shows_score_and_max_score_while_playing() {
    let (mut s, field) = session(77);
    s.start();
    advance(&mut s, &field, START_DELAY_MS);

    let text = screen_text(&render(&s, &field, Viewport::new(60, 20)));
    assert!(text.contains("Score: 0"));
    assert!(text.contains("Max Score: 77"));
    assert!(!text.contains("DONGLE DROP"));
}

#[test]
fn held_piece_is_drawn_with_its_level_at_the_spawn_cell() {
    let (mut s, field) = session(0);
    s.start();
    advance(&mut s, &field, START_DELAY_MS);
    let id = s.current_piece().unwrap();
    let level = s.piece(id).unwrap().level();

    // Frame is 20x16 centred in 60x20: origin (20, 2). Spawn column 4, row 0.
    let fb = render(&s, &field, Viewport::new(60, 20));
    let glyph = char::from_digit(level as u32, 10).unwrap();
    assert_eq!(fb.get(20 + 1 + 4 * 2, 3).unwrap().ch, glyph);
}

#[test]
fn deadline_row_is_marked() {
    let (s, field) = session(0);
    let fb = render(&s, &field, Viewport::new(20, 16));
    let y = 1 + (field.deadline_row() - 1) as u16;
    assert_eq!(fb.get(1, y).unwrap().ch, '-');
    assert_eq!(fb.get(18, y).unwrap().ch, '-');
}

#[test]
fn end_screen_shows_frozen_final_score() {
    let (mut s, field) = session(0);
    s.start();
    advance(&mut s, &field, START_DELAY_MS);
    s.touch_up();
    advance(&mut s, &field, 3000);
    s.game_over();
    advance(&mut s, &field, 3000);

    let final_score = s.final_score().unwrap();
    let text = screen_text(&render(&s, &field, Viewport::new(60, 20)));
    assert!(text.contains("GAME OVER"));
    assert!(text.contains(&format!("Score: {final_score}")));
    assert!(text.contains("R: reset"));
}
