//! A game as a stack of positions.
//!
//! `positions[0]` is the start position and `positions[i]` the position after
//! `i` plies, so the live position is always reachable by replaying exactly
//! `moves.len()` legal moves. Undo pops one entry from both stacks.

use tracing::debug;

use crate::error::{IllegalMove, ReplayError};
use crate::position::Position;
use crate::san::parse_san;
use crate::types::{DrawReason, MoveProposal, Outcome, PlayedMove};

#[derive(Debug, Clone)]
pub struct Game {
    positions: Vec<Position>,
    moves: Vec<PlayedMove>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Position::new_game())
    }

    pub fn from_position(start: Position) -> Self {
        Self {
            positions: vec![start],
            moves: Vec::new(),
        }
    }

    /// Rebuild a game by replaying SAN moves from the initial position and
    /// checking that they arrive at `expected_fen`.
    pub fn replay(history: &[String], expected: &Position) -> Result<Self, ReplayError> {
        let mut game = Self::new();
        for (ply, san) in history.iter().enumerate() {
            let current = game.current().clone();
            let mv = parse_san(current.board(), san).ok_or_else(|| ReplayError::IllegalSan {
                ply: ply + 1,
                san: san.clone(),
                fen: current.to_fen(),
            })?;
            let (next, played) = current
                .play(mv)
                .map_err(|e| ReplayError::IllegalSan {
                    ply: ply + 1,
                    san: san.clone(),
                    fen: e.fen,
                })?;
            game.push(next, played);
        }
        if game.current() != expected {
            return Err(ReplayError::Mismatch {
                expected: expected.to_fen(),
                actual: game.current().to_fen(),
            });
        }
        Ok(game)
    }

    pub fn current(&self) -> &Position {
        // positions always holds the start entry
        &self.positions[self.positions.len() - 1]
    }

    pub fn moves(&self) -> &[PlayedMove] {
        &self.moves
    }

    /// SAN history, one entry per ply.
    pub fn history(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.san.clone()).collect()
    }

    pub fn last_move(&self) -> Option<&PlayedMove> {
        self.moves.last()
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Validate and play a proposal. On rejection nothing changes.
    pub fn apply(&mut self, proposal: &MoveProposal) -> Result<&PlayedMove, IllegalMove> {
        let (next, played) = match self.current().apply(proposal) {
            Ok(r) => r,
            Err(e) => {
                debug!(mv = %proposal, fen = %e.fen, "rejected move");
                return Err(e);
            }
        };
        self.push(next, played);
        Ok(&self.moves[self.moves.len() - 1])
    }

    /// Reconstitute the previous position. Returns the undone move, or `None`
    /// when no moves have been played.
    pub fn undo(&mut self) -> Option<PlayedMove> {
        let mv = self.moves.pop()?;
        self.positions.pop();
        Some(mv)
    }

    fn push(&mut self, position: Position, played: PlayedMove) {
        self.positions.push(position);
        self.moves.push(played);
    }

    pub fn is_threefold_repetition(&self) -> bool {
        let current = self.current().hash();
        self.positions.iter().filter(|p| p.hash() == current).count() >= 3
    }

    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    pub fn draw_reason(&self) -> Option<DrawReason> {
        let pos = self.current();
        if pos.is_stalemate() {
            Some(DrawReason::Stalemate)
        } else if pos.is_checkmate() {
            None
        } else if pos.is_fifty_move_draw() {
            Some(DrawReason::FiftyMoveRule)
        } else if pos.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.is_threefold_repetition() {
            Some(DrawReason::ThreefoldRepetition)
        } else {
            None
        }
    }

    /// `Some` once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        let pos = self.current();
        if pos.is_checkmate() {
            return Some(Outcome::Checkmate {
                winner: !pos.turn(),
            });
        }
        self.draw_reason().map(Outcome::Draw)
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
