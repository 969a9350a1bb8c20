use std::rc::Rc;

use suraido::{
    FixedClock, GameApp, MemoryRemote, MemoryStore, StubConnectivity, StubIdentity, TilePress,
    SESSION_KEY,
};
use suraido_core::{
    is_solved, GridSize, SessionSnapshot, LEVELS_PER_CHAPTER, SESSION_SNAPSHOT_VERSION,
};

fn snapshot_one_move_from_solved(
    chapter_id: u32,
    level_id: u32,
    size: GridSize,
    move_count: u32,
) -> SessionSnapshot {
    let total = size.total_tiles();
    let mut grid: Vec<usize> = (0..total).collect();
    // Pull the empty token one cell left of its home corner.
    grid.swap(total - 2, total - 1);
    SessionSnapshot {
        version: SESSION_SNAPSHOT_VERSION,
        chapter_id,
        level_id,
        grid,
        empty_index: total - 2,
        move_count,
        hints_used: 0,
        shuffle_nonce: 7,
    }
}

fn seed_snapshot(storage: &MemoryStore, snapshot: &SessionSnapshot) {
    storage.insert_raw(SESSION_KEY, &serde_json::to_string(snapshot).unwrap());
}

fn app(storage: Rc<MemoryStore>) -> GameApp {
    GameApp::new(
        storage,
        Rc::new(MemoryRemote::new()),
        Rc::new(StubConnectivity::new(false)),
        Rc::new(StubIdentity::signed_in("u1")),
        Rc::new(FixedClock::new(123_456)),
    )
}

#[test]
fn loading_a_level_starts_a_scrambled_session() {
    let mut app = app(Rc::new(MemoryStore::new()));
    assert!(app.load_level(1, 1));

    let session = app.session().unwrap();
    assert_eq!(session.grid_size(), GridSize::new(3, 4));
    assert_eq!(session.move_count(), 0);
    assert!(!is_solved(session.grid()));
    assert_eq!(app.last_played(), Some((1, 1)));
}

#[test]
fn locked_levels_refuse_to_load() {
    let mut app = app(Rc::new(MemoryStore::new()));
    assert!(!app.load_level(1, 2));
    assert!(!app.load_level(2, 1));
    assert!(!app.load_level(1, 999));
    assert!(app.session().is_none());
}

#[test]
fn saved_session_resumes_for_the_same_level() {
    let storage = Rc::new(MemoryStore::new());
    let snapshot = snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 12);
    seed_snapshot(&storage, &snapshot);

    let mut app = self::app(storage);
    assert!(app.load_level(1, 1));
    let session = app.session().unwrap();
    assert_eq!(session.move_count(), 12);
    assert_eq!(session.grid(), snapshot.grid.as_slice());
}

#[test]
fn saved_session_for_another_level_is_ignored() {
    let storage = Rc::new(MemoryStore::new());
    let snapshot = snapshot_one_move_from_solved(2, 3, GridSize::new(3, 4), 12);
    seed_snapshot(&storage, &snapshot);

    let mut app = app(storage);
    assert!(app.load_level(1, 1));
    assert_eq!(app.session().unwrap().move_count(), 0);
}

#[test]
fn corrupt_saved_session_triggers_a_fresh_shuffle() {
    let storage = Rc::new(MemoryStore::new());
    storage.insert_raw(SESSION_KEY, "{definitely not json");

    let mut app = self::app(storage);
    assert!(app.load_level(1, 1));
    let session = app.session().unwrap();
    assert_eq!(session.move_count(), 0);
    assert_eq!(session.grid().len(), 12);
}

#[test]
fn snapshot_version_mismatch_is_treated_as_absent() {
    let storage = Rc::new(MemoryStore::new());
    let mut snapshot = snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 12);
    snapshot.version = 99;
    seed_snapshot(&storage, &snapshot);

    let mut app = app(storage);
    assert!(app.load_level(1, 1));
    assert_eq!(app.session().unwrap().move_count(), 0);
}

#[test]
fn incoherent_snapshot_grid_is_discarded() {
    let storage = Rc::new(MemoryStore::new());

    // Duplicate tile value: not a permutation.
    let mut snapshot = snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 12);
    snapshot.grid[0] = snapshot.grid[1];
    seed_snapshot(&storage, &snapshot);
    let mut app = app(Rc::clone(&storage));
    assert!(app.load_level(1, 1));
    assert_eq!(app.session().unwrap().move_count(), 0);

    // Grid saved for a different board size.
    let oversized = snapshot_one_move_from_solved(1, 1, GridSize::new(4, 5), 12);
    seed_snapshot(&storage, &oversized);
    let mut app = self::app(storage);
    assert!(app.load_level(1, 1));
    let session = app.session().unwrap();
    assert_eq!(session.move_count(), 0);
    assert_eq!(session.grid().len(), 12);
}

#[test]
fn illegal_presses_do_not_count_moves() {
    let storage = Rc::new(MemoryStore::new());
    seed_snapshot(
        &storage,
        &snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 0),
    );
    let mut app = app(storage);
    app.load_level(1, 1);

    // Tile 0 is in the far corner from the empty cell.
    assert_eq!(app.handle_tile_press(0), TilePress::Ignored);
    assert_eq!(app.handle_tile_press(999), TilePress::Ignored);
    assert_eq!(app.session().unwrap().move_count(), 0);
}

#[test]
fn solving_awards_stars_and_unlocks_the_next_level() {
    let storage = Rc::new(MemoryStore::new());
    // 24 prior moves; the winning press makes 25, inside the 3x4 gold band.
    seed_snapshot(
        &storage,
        &snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 24),
    );
    let mut app = app(storage.clone());
    app.load_level(1, 1);

    assert_eq!(app.handle_tile_press(11), TilePress::Solved);

    let level = app.level_progress(1, 1);
    assert!(level.completed);
    assert_eq!(level.stars, 3);
    assert_eq!(level.best_moves, 25);
    assert_eq!(app.total_stars(), 3);
    assert!(app.is_level_unlocked(1, 2));
    assert_eq!(app.chapter_progress(1).completed, 1);
    assert_eq!(app.pending_sync(), 1);
    // The in-progress save is gone once the level is done.
    assert!(!storage.contains(SESSION_KEY));
}

#[test]
fn a_win_is_reported_exactly_once() {
    let storage = Rc::new(MemoryStore::new());
    seed_snapshot(
        &storage,
        &snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 5),
    );
    let mut app = app(storage);
    app.load_level(1, 1);

    assert_eq!(app.handle_tile_press(11), TilePress::Solved);
    let stars = app.total_stars();

    // Further presses on the solved board change nothing.
    assert_eq!(app.handle_tile_press(10), TilePress::Ignored);
    assert_eq!(app.handle_tile_press(11), TilePress::Ignored);
    assert_eq!(app.total_stars(), stars);
    assert_eq!(app.pending_sync(), 1);
}

#[test]
fn reset_reshuffles_and_clears_counters() {
    let storage = Rc::new(MemoryStore::new());
    seed_snapshot(
        &storage,
        &snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 9),
    );
    let mut app = app(storage);
    app.load_level(1, 1);

    app.reset_game();
    let session = app.session().unwrap();
    assert_eq!(session.move_count(), 0);
    assert!(!session.is_solved());
    assert!(!is_solved(session.grid()));
}

#[test]
fn hint_points_the_lowest_misplaced_tile_home() {
    let storage = Rc::new(MemoryStore::new());
    let mut snapshot = snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 0);
    // Also displace tiles 0 and 1 so the hint has an obvious target.
    snapshot.grid.swap(0, 1);
    seed_snapshot(&storage, &snapshot);
    let mut app = app(storage);
    app.load_level(1, 1);

    let before = app.hint_count();
    let hint = app.use_hint().unwrap();
    assert_eq!(hint.tile_index, 0);
    assert_eq!(hint.target_index, 1);
    assert_eq!(app.hint_count(), before - 1);
    assert_eq!(app.session().unwrap().move_count(), 0);
    assert_eq!(app.session().unwrap().hints_used(), 1);
}

#[test]
fn hint_budget_is_kept_when_no_hint_is_produced() {
    let storage = Rc::new(MemoryStore::new());
    // Everything except the empty token is already home.
    seed_snapshot(
        &storage,
        &snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 0),
    );
    let mut app = app(storage);
    app.load_level(1, 1);

    let before = app.hint_count();
    assert!(app.use_hint().is_none());
    assert_eq!(app.hint_count(), before);
}

#[test]
fn finishing_a_chapter_grants_bonus_hints() {
    let storage = Rc::new(MemoryStore::new());
    {
        // Clear the road to the chapter's final level.
        let mut progress = suraido::ProgressStore::new(storage.clone());
        for level_id in 1..LEVELS_PER_CHAPTER {
            progress.record_completion(1, level_id, 30, 2);
        }
    }
    let size = GridSize::new(5, 6);
    seed_snapshot(
        &storage,
        &snapshot_one_move_from_solved(1, LEVELS_PER_CHAPTER, size, 10),
    );

    let mut app = app(storage);
    assert!(app.load_level(1, LEVELS_PER_CHAPTER));
    let before = app.hint_count();

    let winning_tile = size.total_tiles() - 1;
    assert_eq!(app.handle_tile_press(winning_tile), TilePress::Solved);
    assert_eq!(app.hint_count(), before + 5);
    assert!(app.is_chapter_unlocked(2));
}

#[test]
fn save_state_round_trips_through_the_app() {
    let storage = Rc::new(MemoryStore::new());
    seed_snapshot(
        &storage,
        &snapshot_one_move_from_solved(1, 1, GridSize::new(3, 4), 3),
    );
    let mut app = app(Rc::clone(&storage));
    app.load_level(1, 1);
    app.save_state();
    drop(app);

    let mut revived = GameApp::new(
        storage,
        Rc::new(MemoryRemote::new()),
        Rc::new(StubConnectivity::new(false)),
        Rc::new(StubIdentity::signed_in("u1")),
        Rc::new(FixedClock::new(999)),
    );
    revived.load_level(1, 1);
    assert_eq!(revived.session().unwrap().move_count(), 3);
}
