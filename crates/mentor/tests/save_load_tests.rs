//! Saving and restoring games.

mod common;

use chess_mentor::{
    AdviceSlot, Difficulty, FileStore, LoadError, MemoryStore, Mentor, SnapshotStore,
    DEFAULT_SAVE_KEY,
};
use chess_rules::{Color, Outcome};
use common::{harness, harness_with, play, FakeAdvisor, FakeEngine};

const RUY_LOPEZ: [&str; 5] = ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"];

#[tokio::test]
async fn test_round_trip_restores_game_and_difficulty() {
    let mut saved = harness();
    saved.mentor.set_difficulty(Difficulty::Hard);
    play(&mut saved.mentor, &RUY_LOPEZ);
    saved.mentor.save().unwrap();
    let before = saved.mentor.view();

    let mut restored = harness_with(FakeEngine::new(), FakeAdvisor::new(), saved.store.clone());
    let generation = restored.mentor.generation();
    let job = restored.mentor.load().unwrap().expect("analysis for the restored position");

    let after = restored.mentor.view();
    assert_eq!(after.fen, before.fen);
    assert_eq!(after.history, ["e4", "e5", "Nf3", "Nc6", "Bb5"]);
    assert_eq!(after.last_move.as_deref(), Some("Bb5"));
    assert_eq!(after.difficulty, Difficulty::Hard);
    assert_eq!(after.advice, AdviceSlot::Empty);
    assert!(restored.mentor.generation() > generation);

    assert!(job.starts_new_game());
    let outcome = job.run().await;
    assert_eq!(restored.engine.journal(), ["new_game", "analyze"]);
    assert_eq!(restored.engine.calls(), [(before.fen.clone(), 18)]);
    assert_eq!(
        restored.advisor.requests()[0].last_move.as_deref(),
        Some("Bb5")
    );
    restored.mentor.complete(outcome);
    assert!(matches!(restored.mentor.advice(), AdviceSlot::Ready(_)));

    // The restored game carries on normally, including undo past the load point
    assert!(restored.mentor.undo());
    assert_eq!(restored.mentor.last_move(), Some("Nc6"));
}

#[test]
fn test_save_replaces_previous_save() {
    let mut h = harness();
    play(&mut h.mentor, &["e2e4"]);
    h.mentor.save().unwrap();
    play(&mut h.mentor, &["e7e5"]);
    h.mentor.save().unwrap();

    let json = h.store.get(DEFAULT_SAVE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["history"], serde_json::json!(["e4", "e5"]));
    assert_eq!(value["difficulty"], "medium");
}

#[test]
fn test_load_with_nothing_saved() {
    let mut h = harness();
    play(&mut h.mentor, &["d2d4"]);
    let generation = h.mentor.generation();

    assert!(matches!(h.mentor.load(), Err(LoadError::NothingSaved)));
    assert_eq!(h.mentor.history(), ["d4"]);
    assert_eq!(h.mentor.generation(), generation);
}

fn assert_corrupt(saved: &str) {
    let store = MemoryStore::new();
    store.set(DEFAULT_SAVE_KEY, saved).unwrap();
    let mut h = harness_with(FakeEngine::new(), FakeAdvisor::new(), store);
    h.mentor.set_difficulty(Difficulty::Easy);
    play(&mut h.mentor, &["d2d4"]);
    let fen = h.mentor.view().fen;
    let generation = h.mentor.generation();

    let result = h.mentor.load();
    assert!(
        matches!(result, Err(LoadError::Corrupt(_))),
        "{saved} gave {result:?}"
    );
    assert_eq!(h.mentor.view().fen, fen);
    assert_eq!(h.mentor.history(), ["d4"]);
    assert_eq!(h.mentor.difficulty(), Difficulty::Easy);
    assert_eq!(h.mentor.generation(), generation);
}

#[test]
fn test_load_rejects_corrupt_saves() {
    assert_corrupt("not json at all");
    assert_corrupt(r#"{"history":["e4"]}"#);
    assert_corrupt(r#"{"fen":"banana","history":[]}"#);
    assert_corrupt(
        r#"{"fen":"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1","history":["e4"],"difficulty":"grandmaster"}"#,
    );
    // History that does not lead to the saved position
    assert_corrupt(
        r#"{"fen":"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1","history":["d4"]}"#,
    );
    // History with an impossible move
    assert_corrupt(
        r#"{"fen":"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1","history":["e5"]}"#,
    );
}

#[test]
fn test_load_without_difficulty_keeps_current_tier() {
    let store = MemoryStore::new();
    store
        .set(
            DEFAULT_SAVE_KEY,
            r#"{"fen":"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1","history":["e4"]}"#,
        )
        .unwrap();
    let mut h = harness_with(FakeEngine::new(), FakeAdvisor::new(), store);
    h.mentor.set_difficulty(Difficulty::Easy);

    let job = h.mentor.load().unwrap().unwrap();
    assert_eq!(job.difficulty(), Difficulty::Easy);
    assert_eq!(h.mentor.last_move(), Some("e4"));
}

#[test]
fn test_load_finished_game_reports_game_over() {
    let mut saved = harness();
    play(&mut saved.mentor, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    saved.mentor.save().unwrap();

    let mut h = harness_with(FakeEngine::new(), FakeAdvisor::new(), saved.store.clone());
    assert!(h.mentor.load().unwrap().is_none());
    assert_eq!(
        h.mentor.advice(),
        &AdviceSlot::GameOver(Outcome::Checkmate {
            winner: Color::Black
        })
    );
}

#[test]
fn test_file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mentor = |store: FileStore| {
        Mentor::new(FakeEngine::new(), FakeAdvisor::new(), Box::new(store)).with_save_key("slot_a")
    };

    let mut first = mentor(FileStore::new(dir.path()));
    play(&mut first, &RUY_LOPEZ);
    first.save().unwrap();
    assert!(dir.path().join("slot_a.json").exists());

    let mut second = mentor(FileStore::new(dir.path()));
    second.load().unwrap();
    assert_eq!(second.view().fen, first.view().fen);
    assert_eq!(second.history(), first.history());
}
