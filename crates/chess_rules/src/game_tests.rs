use super::*;
use crate::types::MoveProposal;
use cozy_chess::Color;

fn play(game: &mut Game, moves: &[&str]) {
    for mv in moves {
        let proposal: MoveProposal = mv.parse().unwrap();
        game.apply(&proposal).unwrap();
    }
}

#[test]
fn test_apply_and_undo() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    assert_eq!(game.history(), vec!["e4"]);
    assert_eq!(game.current().turn(), Color::Black);

    let undone = game.undo().unwrap();
    assert_eq!(undone.san, "e4");
    assert!(game.history().is_empty());
    assert_eq!(game.current(), &Position::new_game());
    assert!(game.undo().is_none());
}

#[test]
fn test_rejected_move_changes_nothing() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    let before = game.current().clone();

    let proposal: MoveProposal = "e4e5".parse().unwrap();
    assert!(game.apply(&proposal).is_err());
    assert_eq!(game.current(), &before);
    assert_eq!(game.ply_count(), 1);
}

#[test]
fn test_fools_mate_outcome() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(game.history(), vec!["f3", "e5", "g4", "Qh4#"]);
    assert!(game.current().is_checkmate());
    assert!(!game.is_draw());
    assert_eq!(
        game.outcome(),
        Some(Outcome::Checkmate {
            winner: Color::Black
        })
    );
}

#[test]
fn test_threefold_repetition() {
    let mut game = Game::new();
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    play(&mut game, &shuffle);
    assert!(!game.is_draw());
    play(&mut game, &shuffle);
    assert_eq!(game.draw_reason(), Some(DrawReason::ThreefoldRepetition));
    assert_eq!(game.outcome(), Some(Outcome::Draw(DrawReason::ThreefoldRepetition)));
}

#[test]
fn test_stalemate_outcome() {
    let game = Game::from_position(Position::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap());
    assert_eq!(game.outcome(), Some(Outcome::Draw(DrawReason::Stalemate)));
}

#[test]
fn test_replay_mismatch() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5"]);
    let history = game.history();

    let err = Game::replay(&history, &Position::new_game()).unwrap_err();
    assert!(matches!(err, ReplayError::Mismatch { .. }));

    let err = Game::replay(&["e4".to_string(), "Ke7".to_string()], game.current()).unwrap_err();
    assert!(matches!(err, ReplayError::IllegalSan { ply: 2, .. }));
}
