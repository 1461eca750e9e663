//! Search engine session for chess-mentor.
//!
//! A UCI engine is a long-lived process with an asynchronous handshake
//! (`uci` / `uciok`, `isready` / `readyok`) followed by any number of
//! `position` + `go` searches. [`UciSession`] hides that behind one call:
//!
//! ```ignore
//! let session = UciSession::new(ProcessConnector::new("stockfish"), SessionConfig::default());
//! let analysis = session.analyze(fen, 12).await;
//! if analysis.has_suggestion() { /* ... */ }
//! ```
//!
//! `analyze` never fails. An engine that cannot be started, crashes, times
//! out or was terminated yields [`Analysis::unavailable`].

pub mod connector;
pub mod error;
pub mod protocol;
pub mod session;

pub use connector::*;
pub use error::EngineError;
pub use protocol::{EngineLine, InfoLine, Score};
pub use session::*;

use async_trait::async_trait;

/// Centipawn value reported for a forced mate, minus the distance to mate.
pub const MATE_SCORE: i32 = 100_000;

/// Result of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Best move in engine coordinate notation (`e2e4`), empty when the engine
    /// had no suggestion.
    pub best_move: String,
    /// Evaluation in centipawns from the side to move's perspective
    pub score: i32,
    /// Search depth reached
    pub depth: u8,
    /// Moves to mate when the engine reported one (negative = side to move is mated)
    pub mate: Option<i32>,
}

impl Analysis {
    /// The degraded result: no move, zero score, zero depth.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn has_suggestion(&self) -> bool {
        !self.best_move.is_empty()
    }
}

/// Anything that can produce a best move for a FEN at a fixed depth.
///
/// Implemented by [`UciSession`]; tests substitute fakes.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Search `fen` to `depth` plies. Must resolve even when the engine is gone.
    async fn analyze(&self, fen: &str, depth: u8) -> Analysis;

    /// Tell the engine a new game starts (clear hash tables etc.)
    async fn new_game(&self) {}

    /// Release the engine. Later `analyze` calls return the degraded result.
    async fn terminate(&self) {}

    /// Engine name for display
    fn name(&self) -> String {
        "engine".to_string()
    }
}
