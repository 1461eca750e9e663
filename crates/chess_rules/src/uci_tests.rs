use super::*;
use crate::Position;

#[test]
fn test_castle_written_as_king_step() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
    let mv = parse_uci_move(pos.board(), "e8g8").unwrap();
    assert_eq!(mv.to, Square::H8);
    assert_eq!(move_to_uci(pos.board(), mv), "e8g8");

    let mv = parse_uci_move(pos.board(), "e8c8").unwrap();
    assert_eq!(mv.to, Square::A8);
    assert_eq!(move_to_uci(pos.board(), mv), "e8c8");
}

#[test]
fn test_parse_rejects_null_and_illegal() {
    let pos = Position::new_game();
    assert!(parse_uci_move(pos.board(), "0000").is_none());
    assert!(parse_uci_move(pos.board(), "(none)").is_none());
    assert!(parse_uci_move(pos.board(), "e2e5").is_none());
    assert!(parse_uci_move(pos.board(), "").is_none());
}

#[test]
fn test_parse_promotion() {
    let pos = Position::from_fen("8/P7/8/5k2/8/8/8/7K w - - 0 1").unwrap();
    let mv = parse_uci_move(pos.board(), "a7a8r").unwrap();
    assert_eq!(mv.promotion, Some(Piece::Rook));
    assert_eq!(move_to_uci(pos.board(), mv), "a7a8r");
}
