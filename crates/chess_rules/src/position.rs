use std::fmt;

use cozy_chess::{Board, Color, File, GameStatus, Move, Piece, Square};

use crate::error::{IllegalMove, InvalidPosition};
use crate::san::format_san;
use crate::types::{MoveProposal, PlayedMove};
use crate::uci::move_to_uci;

/// Immutable board snapshot. Applying a move returns a new `Position`.
#[derive(Clone)]
pub struct Position {
    board: Board,
}

impl Position {
    /// Standard initial position.
    pub fn new_game() -> Self {
        Self {
            board: Board::default(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, InvalidPosition> {
        let board = Board::from_fen(fen.trim(), false).map_err(|e| InvalidPosition {
            fen: fen.to_string(),
            reason: format!("{e:?}"),
        })?;
        Ok(Self { board })
    }

    pub fn from_board(board: Board) -> Self {
        Self { board }
    }

    pub fn to_fen(&self) -> String {
        self.board.to_string()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn is_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    pub fn is_checkmate(&self) -> bool {
        self.board.status() == GameStatus::Won
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.has_legal_moves()
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.board.halfmove_clock() >= 100
    }

    /// Neither side can deliver mate: bare kings, a single minor piece, or
    /// bishops that all stand on squares of one colour.
    pub fn is_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }
        let knights = b.pieces(Piece::Knight);
        let bishops = b.pieces(Piece::Bishop);
        let minors = knights.len() + bishops.len();
        if minors <= 1 {
            return true;
        }
        if !knights.is_empty() {
            return false;
        }
        let mut colours = bishops.into_iter().map(is_dark_square);
        let first = colours.next();
        colours.all(|c| Some(c) == first)
    }

    /// Zobrist key of the position, used for repetition counting.
    pub fn hash(&self) -> u64 {
        self.board.hash()
    }

    pub fn has_legal_moves(&self) -> bool {
        self.board.generate_moves(|moves| !moves.is_empty())
    }

    /// Map a user proposal onto the library's move encoding.
    ///
    /// Castling is proposed as the king's two-square step and encoded as
    /// king-takes-own-rook. A pawn reaching the last rank without an explicit
    /// piece promotes to a queen; a promotion piece on any other move is ignored.
    pub fn resolve(&self, proposal: &MoveProposal) -> Result<Move, IllegalMove> {
        let illegal = || IllegalMove {
            mv: proposal.to_string(),
            fen: self.to_fen(),
        };
        let stm = self.turn();
        let piece = self.board.piece_on(proposal.from).ok_or_else(illegal)?;
        if self.board.color_on(proposal.from) != Some(stm) {
            return Err(illegal());
        }

        let mut to = proposal.to;
        if piece == Piece::King
            && proposal.from.rank() == proposal.to.rank()
            && (proposal.from.file() as i8 - proposal.to.file() as i8).abs() == 2
        {
            let rook_file = if proposal.to.file() as u8 > proposal.from.file() as u8 {
                File::H
            } else {
                File::A
            };
            to = Square::new(rook_file, proposal.from.rank());
        }

        let last_rank = match stm {
            Color::White => cozy_chess::Rank::Eighth,
            Color::Black => cozy_chess::Rank::First,
        };
        let promotion = if piece == Piece::Pawn && to.rank() == last_rank {
            Some(proposal.promotion.unwrap_or(Piece::Queen))
        } else {
            None
        };

        let mv = Move {
            from: proposal.from,
            to,
            promotion,
        };
        if self.board.is_legal(mv) {
            Ok(mv)
        } else {
            Err(illegal())
        }
    }

    /// Validate and play a proposal, returning the successor and the move's notation.
    pub fn apply(&self, proposal: &MoveProposal) -> Result<(Position, PlayedMove), IllegalMove> {
        let mv = self.resolve(proposal)?;
        self.play(mv)
    }

    /// Play a move already in the library's encoding.
    pub fn play(&self, mv: Move) -> Result<(Position, PlayedMove), IllegalMove> {
        let played = PlayedMove {
            uci: move_to_uci(&self.board, mv),
            san: format_san(&self.board, mv),
        };
        let mut next = self.board.clone();
        next.try_play(mv).map_err(|_| IllegalMove {
            mv: played.uci.clone(),
            fen: self.to_fen(),
        })?;
        Ok((Position { board: next }, played))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new_game()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.to_fen() == other.to_fen()
    }
}

impl Eq for Position {}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Position").field(&self.to_fen()).finish()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

fn is_dark_square(sq: Square) -> bool {
    (sq.file() as u8 + sq.rank() as u8) % 2 == 0
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
