use cozy_chess::{Board, File, Move, Piece, Square};

use crate::types::{promotion_char, MoveProposal};

/// Standard UCI text for a move. Castling is written as the king's two-square
/// step (`e1g1`), not in the king-takes-rook form used internally.
pub fn move_to_uci(board: &Board, mv: Move) -> String {
    let mut to = mv.to;
    if is_castle(board, mv) {
        let file = if mv.to.file() as u8 > mv.from.file() as u8 {
            File::G
        } else {
            File::C
        };
        to = Square::new(file, mv.from.rank());
    }
    let mut s = format!("{}{}", mv.from, to);
    if let Some(p) = mv.promotion {
        s.push(promotion_char(p));
    }
    s
}

/// Parse UCI text against the legal moves of `board`.
///
/// Returns `None` for the null move (`0000`), `(none)` and anything illegal.
pub fn parse_uci_move(board: &Board, txt: &str) -> Option<Move> {
    let proposal: MoveProposal = txt.parse().ok()?;
    crate::Position::from_board(board.clone())
        .resolve(&proposal)
        .ok()
}

pub(crate) fn is_castle(board: &Board, mv: Move) -> bool {
    board.piece_on(mv.from) == Some(Piece::King)
        && board.colors(board.side_to_move()).has(mv.to)
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
