//! Standard Algebraic Notation.
//!
//! SAN is produced by inspecting the board before the move: piece letter,
//! disambiguation against other legal moves of the same piece type, capture
//! marker, destination, promotion, and a `+`/`#` suffix from the successor.

use cozy_chess::{Board, GameStatus, Move, Piece};

use crate::types::{file_char, rank_char};
use crate::uci::is_castle;

pub fn format_san(board: &Board, mv: Move) -> String {
    let mut san = san_body(board, mv);

    let mut next = board.clone();
    if next.try_play(mv).is_ok() {
        if next.status() == GameStatus::Won {
            san.push('#');
        } else if !next.checkers().is_empty() {
            san.push('+');
        }
    }
    san
}

/// Find the legal move whose SAN matches `san`.
///
/// Check/mate suffixes and annotation glyphs are ignored, and `0-0` is accepted
/// for `O-O`.
pub fn parse_san(board: &Board, san: &str) -> Option<Move> {
    let wanted = normalize(san);
    if wanted.is_empty() {
        return None;
    }
    let mut found = None;
    board.generate_moves(|moves| {
        for mv in moves {
            if san_body(board, mv) == wanted {
                found = Some(mv);
                return true;
            }
        }
        false
    });
    found
}

fn normalize(san: &str) -> String {
    san.trim()
        .trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'))
        .replace('0', "O")
}

fn san_body(board: &Board, mv: Move) -> String {
    let piece = match board.piece_on(mv.from) {
        Some(p) => p,
        None => return format!("{}{}", mv.from, mv.to),
    };

    if is_castle(board, mv) {
        return if mv.to.file() as u8 > mv.from.file() as u8 {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let mut san = String::new();
    let is_capture = board.colors(!board.side_to_move()).has(mv.to)
        || (piece == Piece::Pawn && mv.from.file() != mv.to.file());

    match piece {
        Piece::Pawn => {
            if is_capture {
                san.push(file_char(mv.from));
            }
        }
        other => {
            san.push(piece_letter(other));
            san.push_str(&disambiguation(board, mv, other));
        }
    }

    if is_capture {
        san.push('x');
    }
    san.push_str(&mv.to.to_string());

    if let Some(promo) = mv.promotion {
        san.push('=');
        san.push(piece_letter(promo));
    }
    san
}

fn disambiguation(board: &Board, mv: Move, piece: Piece) -> String {
    if piece == Piece::King {
        return String::new();
    }
    let mut rivals = Vec::new();
    board.generate_moves(|moves| {
        if moves.piece == piece && moves.from != mv.from && moves.to.has(mv.to) {
            rivals.push(moves.from);
        }
        false
    });
    if rivals.is_empty() {
        return String::new();
    }
    let same_file = rivals.iter().any(|sq| sq.file() == mv.from.file());
    let same_rank = rivals.iter().any(|sq| sq.rank() == mv.from.rank());
    if !same_file {
        file_char(mv.from).to_string()
    } else if !same_rank {
        rank_char(mv.from).to_string()
    } else {
        mv.from.to_string()
    }
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

#[cfg(test)]
#[path = "san_tests.rs"]
mod san_tests;
