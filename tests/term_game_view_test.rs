use gridshot::core::{GameConfig, GameSnapshot, World};
use gridshot::term::{GameView, Viewport, GAME_OVER_TEXT, INSTRUCTIONS};
use gridshot::types::{Coord, CURSOR_GLYPH, ENEMY_GLYPH, WALL_GLYPH};

fn default_snapshot() -> (World, GameSnapshot) {
    let world = World::new(GameConfig::default()).unwrap();
    let snap = GameSnapshot::capture(world.store(), world.config(), 0, false);
    (world, snap)
}

fn frame_text(view: &GameView, snap: &GameSnapshot, vp: Viewport) -> String {
    let fb = view.render(snap, vp);
    (0..fb.height())
        .map(|y| fb.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn term_view_draws_wall_border_corners() {
    let (world, snap) = default_snapshot();
    let view = GameView::default();
    let fb = view.render(&snap, view.frame_size(&snap));
    let (ox, oy) = view.grid_origin();
    let (w, h) = (world.config().width as u16, world.config().height as u16);

    for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
        assert_eq!(fb.get(ox + x, oy + y).unwrap().ch, WALL_GLYPH);
    }
    assert_eq!(fb.get(ox + 1, oy + 1).unwrap().ch, ' ');
}

#[test]
fn term_view_places_cursor_and_formation() {
    let (world, snap) = default_snapshot();
    let view = GameView::default();
    let fb = view.render(&snap, view.frame_size(&snap));
    let (ox, oy) = view.grid_origin();

    let cursor = world.config().cursor_pos;
    assert_eq!(
        fb.get(ox + cursor.x as u16, oy + cursor.y as u16).unwrap().ch,
        CURSOR_GLYPH
    );
    let enemies = (0..fb.height())
        .flat_map(|y| (0..fb.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| fb.get(x, y).unwrap().ch == ENEMY_GLYPH)
        .count();
    assert_eq!(enemies, world.config().start_num_enemies as usize);
    assert_eq!(snap.glyph_at(Coord::new(-1, 0)), None);
}

#[test]
fn term_view_header_and_status() {
    let (_world, mut snap) = default_snapshot();
    let view = GameView::default();
    let vp = view.frame_size(&snap);

    let text = frame_text(&view, &snap, vp);
    assert!(text.contains(INSTRUCTIONS[0]));
    assert!(text.contains(INSTRUCTIONS[1]));
    assert!(text.contains("Score: 0"));
    assert!(!text.contains(GAME_OVER_TEXT));

    snap.score = 42;
    snap.game_over = true;
    let text = frame_text(&view, &snap, vp);
    assert!(text.contains(GAME_OVER_TEXT));
    assert!(text.contains("Score: 42"));
}

#[test]
fn term_view_clips_to_small_viewport() {
    let (_world, snap) = default_snapshot();
    let view = GameView::default();
    let fb = view.render(&snap, Viewport::new(8, 4));
    assert_eq!(fb.width(), 8);
    assert_eq!(fb.height(), 4);
}
