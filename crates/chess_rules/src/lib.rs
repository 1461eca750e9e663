//! Rules oracle for chess-mentor.
//!
//! Legal-move generation and check detection come from `cozy-chess`; this crate
//! adds what the orchestration layer needs on top of it:
//! - immutable [`Position`] snapshots addressed by FEN
//! - a [`Game`] stack with undo and full draw detection
//! - canonical SAN and standard UCI move text

pub mod error;
pub mod game;
pub mod position;
pub mod san;
pub mod types;
pub mod uci;

pub use error::*;
pub use game::*;
pub use position::*;
pub use san::{format_san, parse_san};
pub use types::*;
pub use uci::{move_to_uci, parse_uci_move};

// The board primitives are part of this crate's API.
pub use cozy_chess::{Board, Color, File, Move, Piece, Rank, Square};
