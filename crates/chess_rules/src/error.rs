use thiserror::Error;

/// A proposed move that the current position does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal move {mv} in position {fen}")]
pub struct IllegalMove {
    pub mv: String,
    pub fen: String,
}

/// A FEN string that does not describe a playable position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid position {fen:?}: {reason}")]
pub struct InvalidPosition {
    pub fen: String,
    pub reason: String,
}

/// A recorded SAN history that cannot be replayed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("move {ply} ({san}) is not legal in position {fen}")]
    IllegalSan { ply: usize, san: String, fen: String },
    #[error("history ends in {actual}, expected {expected}")]
    Mismatch { expected: String, actual: String },
}
