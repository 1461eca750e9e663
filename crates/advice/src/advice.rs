//! The advice model and its wire form.

use chess_rules::coord_to_square;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Squares to mark on the board for the recommended move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub from: String,
    pub to: String,
}

impl Highlight {
    /// Both squares must be board coordinates like `e2`.
    pub fn new(from: &str, to: &str) -> Option<Self> {
        let from = from.trim().to_ascii_lowercase();
        let to = to.trim().to_ascii_lowercase();
        coord_to_square(&from)?;
        coord_to_square(&to)?;
        Some(Self { from, to })
    }

    /// Origin and destination of a coordinate move (`e2e4`, `e7e8q`).
    pub fn from_coordinate_move(mv: &str) -> Option<Self> {
        let from = mv.get(0..2)?;
        let to = mv.get(2..4)?;
        Self::new(from, to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub text: String,
    pub best_move_san: String,
    pub strategic_explanation: String,
    pub is_checkmate_sequence: bool,
    pub highlight: Option<Highlight>,
}

impl Advice {
    /// Shown whenever the advice source fails.
    pub fn fallback(best_move: &str) -> Self {
        Self {
            text: "Sorry, I had trouble analyzing this position. Please try again shortly."
                .to_string(),
            best_move_san: best_move.to_string(),
            strategic_explanation: "The advice service could not be reached.".to_string(),
            is_checkmate_sequence: false,
            highlight: None,
        }
    }
}

/// JSON object the language model is constrained to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAdvice {
    pub text: String,
    pub best_move_san: String,
    pub strategic_explanation: String,
    pub is_checkmate_sequence: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_square: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_square: Option<String>,
}

impl From<WireAdvice> for Advice {
    fn from(wire: WireAdvice) -> Self {
        let highlight = match (&wire.from_square, &wire.to_square) {
            (Some(from), Some(to)) => Highlight::new(from, to),
            _ => None,
        };
        Advice {
            text: wire.text,
            best_move_san: wire.best_move_san,
            strategic_explanation: wire.strategic_explanation,
            is_checkmate_sequence: wire.is_checkmate_sequence,
            highlight,
        }
    }
}

/// Parse model output into [`Advice`], enforcing the schema.
pub fn parse_advice(text: &str) -> Result<Advice, serde_json::Error> {
    serde_json::from_str::<WireAdvice>(text).map(Advice::from)
}

/// OpenAPI-style schema passed as `responseSchema`.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "text": {
                "type": "STRING",
                "description": "The mentor's overall advice."
            },
            "bestMoveSan": {
                "type": "STRING",
                "description": "The best move in standard algebraic notation (e.g. e4, Nf3)."
            },
            "strategicExplanation": {
                "type": "STRING",
                "description": "Detailed explanation of the strategy behind the move."
            },
            "isCheckmateSequence": {
                "type": "BOOLEAN",
                "description": "Whether this move is part of a forced mating sequence."
            },
            "fromSquare": {
                "type": "STRING",
                "description": "Origin square of the best move (e.g. e2)."
            },
            "toSquare": {
                "type": "STRING",
                "description": "Destination square of the best move (e.g. e4)."
            }
        },
        "required": ["text", "bestMoveSan", "strategicExplanation", "isCheckmateSequence"]
    })
}

#[cfg(test)]
#[path = "advice_tests.rs"]
mod advice_tests;
