use std::time::Duration;

use thiserror::Error;

/// Why the engine could not produce an analysis.
///
/// Callers of [`crate::Analyzer::analyze`] never see these; they are logged
/// and turned into the degraded result.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine connection failed: {0}")]
    Connect(String),
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine closed its output")]
    Closed,
    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),
    #[error("engine session failed to initialize")]
    Unavailable,
    #[error("engine session was terminated")]
    Terminated,
}
