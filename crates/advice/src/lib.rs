//! Advice generation for chess-mentor.
//!
//! An [`AdviceRequest`] bundles the position, move history, the engine's best
//! move and the player's [`Difficulty`]. An [`AdviceSource`] turns it into
//! [`Advice`]: [`GeminiAdvisor`] asks a language model, [`OfflineAdvisor`]
//! describes the engine move without one. [`advise_or_fallback`] is the only
//! entry point the orchestration layer uses; it never fails.

pub mod advice;
pub mod difficulty;
pub mod error;
pub mod gemini;
pub mod offline;
pub mod request;

pub use advice::{parse_advice, response_schema, Advice, Highlight, WireAdvice};
pub use difficulty::*;
pub use error::AdviceError;
pub use gemini::{GeminiAdvisor, GeminiConfig};
pub use offline::OfflineAdvisor;
pub use request::AdviceRequest;

use async_trait::async_trait;
use tracing::warn;

/// Something that can comment on a position.
#[async_trait]
pub trait AdviceSource: Send + Sync {
    async fn request_advice(&self, request: &AdviceRequest) -> Result<Advice, AdviceError>;

    /// Short label for logs and the status line
    fn name(&self) -> &str;
}

/// Ask `source` for advice, substituting [`Advice::fallback`] on any error.
pub async fn advise_or_fallback(source: &dyn AdviceSource, request: &AdviceRequest) -> Advice {
    match source.request_advice(request).await {
        Ok(advice) => advice,
        Err(e) => {
            warn!(source = source.name(), error = %e, "advice unavailable, using fallback");
            Advice::fallback(&request.best_move)
        }
    }
}
