use super::*;

use chess_rules::{DrawReason, Outcome};
use mentor_advice::Advice;

fn start_view() -> BoardView {
    BoardView {
        fen: Position::new_game().to_fen(),
        history: Vec::new(),
        last_move: None,
        turn: Color::White,
        is_check: false,
        is_checkmate: false,
        is_draw: false,
        difficulty: Difficulty::Medium,
        advice: AdviceSlot::Empty,
        analyzing: false,
        stage: Stage::Idle,
        highlight: None,
        evaluation: None,
    }
}

#[test]
fn test_format_history() {
    let history: Vec<String> = ["e4", "e5", "Nf3"].iter().map(|s| s.to_string()).collect();
    assert_eq!(format_history(&history), "1. e4 e5 2. Nf3");
    assert_eq!(format_history(&[]), "");
}

#[test]
fn test_render_board_marks_highlight() {
    let mut view = start_view();
    view.highlight = Highlight::new("e2", "e4");
    let board = view.render_board();
    let lines: Vec<&str> = board.lines().collect();

    assert_eq!(lines[0], "8  r  n  b  q  k  b  n  r ");
    assert_eq!(lines[4], "4  .  .  .  . [.] .  .  . ");
    assert_eq!(lines[6], "2  P  P  P  P [P] P  P  P ");
    assert_eq!(lines[8], "   a  b  c  d  e  f  g  h");
}

#[test]
fn test_evaluation_is_from_whites_side() {
    let mut view = start_view();
    view.turn = Color::Black;
    view.evaluation = Some(Analysis {
        best_move: "e7e5".to_string(),
        score: 45,
        depth: 12,
        mate: None,
    });
    assert_eq!(view.evaluation_text().as_deref(), Some("-0.45"));

    view.evaluation = Some(Analysis {
        best_move: "d8h4".to_string(),
        score: engine_session::MATE_SCORE - 1,
        depth: 5,
        mate: Some(1),
    });
    assert_eq!(view.evaluation_text().as_deref(), Some("#-1"));

    view.evaluation = Some(Analysis::unavailable());
    assert_eq!(view.evaluation_text(), None);
}

#[test]
fn test_display_sections() {
    let mut view = start_view();
    view.history = vec!["e4".to_string()];
    view.turn = Color::Black;
    view.analyzing = true;
    view.stage = Stage::AnalysisPending;
    let text = view.to_string();
    assert!(text.contains("Black to move | difficulty: medium"));
    assert!(text.contains("Moves: 1. e4"));
    assert!(text.contains("Mentor: analyzing..."));

    view.analyzing = false;
    view.advice = AdviceSlot::Ready(Advice::fallback("e7e5"));
    let text = view.to_string();
    assert!(text.contains("Best move: e7e5"));

    view.advice = AdviceSlot::GameOver(Outcome::Draw(DrawReason::Stalemate));
    view.is_draw = true;
    let text = view.to_string();
    assert!(text.starts_with("8 "));
    assert!(text.contains("Draw | difficulty"));
    assert!(text.contains("Game over: "));
}
