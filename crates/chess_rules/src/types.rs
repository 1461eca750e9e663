use std::fmt;
use std::str::FromStr;

use cozy_chess::{Color, Piece, Square};

/// A move as the user proposes it: two squares and an optional promotion piece.
///
/// Promotion is optional because the board interface never prompts for it;
/// a pawn reaching the last rank without a choice promotes to a queen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveProposal {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl MoveProposal {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, piece: Piece) -> Self {
        self.promotion = Some(piece);
        self
    }
}

impl fmt::Display for MoveProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{}", promotion_char(p))?;
        }
        Ok(())
    }
}

/// Parses coordinate text such as `e2e4` or `e7e8n`.
impl FromStr for MoveProposal {
    type Err = ProposalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(ProposalParseError(s.to_string()));
        }
        let from = coord_to_square(&s[0..2]).ok_or_else(|| ProposalParseError(s.to_string()))?;
        let to = coord_to_square(&s[2..4]).ok_or_else(|| ProposalParseError(s.to_string()))?;
        let promotion = match s.as_bytes().get(4) {
            None => None,
            Some(&c) => Some(
                promotion_from_char(c as char).ok_or_else(|| ProposalParseError(s.to_string()))?,
            ),
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a coordinate move: {0:?}")]
pub struct ProposalParseError(pub String);

/// One accepted ply in both notations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    /// Engine coordinate notation, castling written as the king's two-square step.
    pub uci: String,
    /// Standard algebraic notation with check/mate suffix.
    pub san: String,
}

/// Why a game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Draw(DrawReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    FiftyMoveRule,
    InsufficientMaterial,
    ThreefoldRepetition,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => {
                write!(f, "Checkmate, {} wins", color_name(*winner))
            }
            Outcome::Draw(reason) => write!(f, "Draw by {reason}"),
        }
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::FiftyMoveRule => "the fifty-move rule",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::ThreefoldRepetition => "threefold repetition",
        };
        f.write_str(s)
    }
}

// Helpers

pub fn color_name(c: Color) -> &'static str {
    match c {
        Color::White => "White",
        Color::Black => "Black",
    }
}

pub fn coord_to_square(c: &str) -> Option<Square> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    if !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
        return None;
    }
    c.parse().ok()
}

pub fn promotion_char(p: Piece) -> char {
    match p {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        Piece::Pawn => 'p',
        Piece::King => 'k',
    }
}

pub fn promotion_from_char(c: char) -> Option<Piece> {
    match c.to_ascii_lowercase() {
        'q' => Some(Piece::Queen),
        'r' => Some(Piece::Rook),
        'b' => Some(Piece::Bishop),
        'n' => Some(Piece::Knight),
        _ => None,
    }
}

pub(crate) fn file_char(sq: Square) -> char {
    (b'a' + sq.file() as u8) as char
}

pub(crate) fn rank_char(sq: Square) -> char {
    (b'1' + sq.rank() as u8) as char
}
