use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use courtside_score::engine::{MatchState, Player};
use courtside_score::persist::{
    FileStore, MemoryStore, PersistedState, STORAGE_KEY, ScoreStore, load_state, save_state,
};

fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("courtside_score_{tag}_{}_{nanos}", std::process::id()))
}

fn played_state() -> MatchState {
    let mut state = MatchState::new();
    state.set_player_name(Player::A, "Alcaraz");
    state.set_player_name(Player::B, "Sinner");
    for player in [Player::A, Player::A, Player::B, Player::A, Player::A, Player::B] {
        state.point(player);
    }
    state.sets_b = 2;
    state
}

#[test]
fn memory_store_round_trips_the_full_record() {
    let state = played_state();
    let mut store = MemoryStore::new();
    save_state(&mut store, &state).unwrap();

    let saved = load_state(&store).expect("saved record");
    let mut restored = MatchState::new();
    saved.apply_to(&mut restored);

    assert_eq!(restored.snapshot(), state.snapshot());
    assert_eq!(restored.history(), state.history());
    assert_eq!(restored.player_a_name, "Alcaraz");
    assert_eq!(restored.player_b_name, "Sinner");
}

#[test]
fn file_store_round_trips_and_leaves_no_temp_file() {
    let dir = scratch_dir("roundtrip");
    let mut store = FileStore::new(&dir);
    let state = played_state();
    save_state(&mut store, &state).unwrap();

    let path = store.path_for(STORAGE_KEY);
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let saved = load_state(&FileStore::new(&dir)).expect("saved record");
    assert_eq!(saved, PersistedState::from_state(&state));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_means_no_prior_state() {
    let store = FileStore::new(scratch_dir("missing"));
    assert!(store.read(STORAGE_KEY).unwrap().is_none());
    assert!(load_state(&store).is_none());
}

#[test]
fn garbage_bytes_mean_no_prior_state() {
    let mut store = MemoryStore::new();
    store.insert(STORAGE_KEY, b"{not json".to_vec());
    assert!(load_state(&store).is_none());

    store.insert(STORAGE_KEY, br#"{"playerAName":"A"}"#.to_vec());
    assert!(load_state(&store).is_none());
}

#[test]
fn decodes_a_record_written_by_the_watch_app() {
    let raw = r#"{
        "playerAName": "Ann",
        "playerBName": "Bea",
        "pointA": 2, "pointB": 3,
        "gamesA": 4, "gamesB": 1,
        "setsA": 1, "setsB": 0,
        "server": "b",
        "matchOver": false,
        "history": [
            {"pointA": 2, "pointB": 2, "gamesA": 4, "gamesB": 1,
             "setsA": 1, "setsB": 0, "server": "b", "matchOver": false}
        ]
    }"#;
    let mut store = MemoryStore::new();
    store.insert(STORAGE_KEY, raw);

    let mut state = MatchState::new();
    load_state(&store).expect("decodes").apply_to(&mut state);

    assert_eq!(state.server, Player::B);
    assert_eq!(state.point_label_a(), "30");
    assert_eq!(state.point_label_b(), "40");
    assert_eq!((state.games_a, state.games_b), (4, 1));
    assert_eq!(state.history().len(), 1);
    assert!(state.undo());
    assert_eq!(state.point_b, 2);
}

fn record(points: (u32, u32), games: (u32, u32), sets: (u32, u32), match_over: bool) -> String {
    format!(
        r#"{{"playerAName":"Ann","playerBName":"Bea",
            "pointA":{},"pointB":{},"gamesA":{},"gamesB":{},"setsA":{},"setsB":{},
            "server":"a","matchOver":{match_over},"history":[]}}"#,
        points.0, points.1, games.0, games.1, sets.0, sets.1
    )
}

#[test]
fn counters_at_the_integer_limit_do_not_panic_on_the_next_point() {
    let mut store = MemoryStore::new();
    store.insert(STORAGE_KEY, record((u32::MAX, u32::MAX), (0, 0), (0, 0), false));

    let mut state = MatchState::new();
    load_state(&store).expect("deuce at the limit is settled").apply_to(&mut state);
    state.point(Player::A);
    state.point(Player::B);

    assert_eq!((state.point_a, state.point_b), (u32::MAX, u32::MAX));
    assert_eq!(state.point_label_a(), "40");
    assert!(state.undo());
}

#[test]
fn records_with_unresolved_games_or_sets_mean_no_prior_state() {
    let mut store = MemoryStore::new();

    store.insert(STORAGE_KEY, record((u32::MAX, 0), (0, 0), (0, 0), false));
    assert!(load_state(&store).is_none());

    store.insert(STORAGE_KEY, record((0, 0), (7, 2), (0, 0), false));
    assert!(load_state(&store).is_none());

    store.insert(STORAGE_KEY, record((0, 0), (0, 0), (6, 1), false));
    assert!(load_state(&store).is_none());

    store.insert(STORAGE_KEY, record((0, 0), (0, 0), (6, 1), true));
    assert!(load_state(&store).is_some());
}

#[test]
fn an_unresolved_history_entry_rejects_the_record() {
    let raw = r#"{"playerAName":"Ann","playerBName":"Bea",
        "pointA":0,"pointB":0,"gamesA":0,"gamesB":0,"setsA":0,"setsB":0,
        "server":"a","matchOver":false,
        "history":[{"pointA":9,"pointB":0,"gamesA":0,"gamesB":0,
                    "setsA":0,"setsB":0,"server":"a","matchOver":false}]}"#;
    let mut store = MemoryStore::new();
    store.insert(STORAGE_KEY, raw);
    assert!(load_state(&store).is_none());
}
