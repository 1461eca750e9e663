//! Advice without a language model.

use async_trait::async_trait;
use chess_rules::{format_san, parse_uci_move, Position};

use crate::{Advice, AdviceError, AdviceRequest, AdviceSource, Tone};

/// Describes the engine move in plain words. Used when no API key is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAdvisor;

#[async_trait]
impl AdviceSource for OfflineAdvisor {
    async fn request_advice(&self, request: &AdviceRequest) -> Result<Advice, AdviceError> {
        if request.best_move.is_empty() {
            return Err(AdviceError::Unavailable(
                "the engine has no suggestion".to_string(),
            ));
        }
        let position = Position::from_fen(&request.fen)
            .map_err(|e| AdviceError::Unavailable(e.to_string()))?;
        let mv = parse_uci_move(position.board(), &request.best_move).ok_or_else(|| {
            AdviceError::Unavailable(format!("engine move {} is not legal", request.best_move))
        })?;
        let san = format_san(position.board(), mv);
        let is_mate = san.ends_with('#');

        let text = match &request.last_move {
            Some(last) => format!("After {last}, the engine recommends {san}."),
            None => format!("The engine recommends {san}."),
        };
        let strategic_explanation = match (is_mate, request.difficulty.tone()) {
            (true, _) => format!("{san} delivers checkmate."),
            (false, Tone::Basic) => {
                "Look at what this move attacks and which of your pieces it brings into play."
                    .to_string()
            }
            (false, Tone::Intermediate) => format!(
                "Compare {san} with your candidate moves: check the threats it creates and the squares it controls."
            ),
            (false, Tone::Advanced) => format!(
                "{san} is the engine's principal move at depth {}; work out the forcing replies before playing it.",
                request.difficulty.depth()
            ),
        };

        Ok(Advice {
            text,
            best_move_san: san,
            strategic_explanation,
            is_checkmate_sequence: is_mate,
            highlight: request.suggested_squares(),
        })
    }

    fn name(&self) -> &str {
        "offline"
    }
}
