use crate::{Difficulty, Highlight};

/// Everything the advice source needs to know about one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceRequest {
    pub fen: String,
    /// SAN tokens from the start of the game
    pub history: Vec<String>,
    /// Engine move in coordinate notation, empty when there is none
    pub best_move: String,
    pub last_move: Option<String>,
    pub difficulty: Difficulty,
    /// Language the advice should be written in
    pub language: String,
}

impl AdviceRequest {
    pub fn new(
        fen: impl Into<String>,
        history: Vec<String>,
        best_move: impl Into<String>,
        last_move: Option<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            fen: fen.into(),
            history,
            best_move: best_move.into(),
            last_move,
            difficulty,
            language: "English".to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Board squares of the engine move, if it has any.
    pub fn suggested_squares(&self) -> Option<Highlight> {
        Highlight::from_coordinate_move(&self.best_move)
    }

    /// The instruction text sent to the language model.
    pub fn prompt(&self) -> String {
        let history = if self.history.is_empty() {
            "(no moves yet)".to_string()
        } else {
            self.history.join(", ")
        };
        let last_move = self.last_move.as_deref().unwrap_or("none");
        let best_move = if self.best_move.is_empty() {
            "no suggestion available"
        } else {
            &self.best_move
        };
        let tone = self.difficulty.tone();

        let mut prompt = String::new();
        prompt.push_str(
            "You are Chess Mentor, a chess grandmaster and coach who specializes in strategy.\n",
        );
        prompt.push_str("The user is playing a game.\n\n");
        prompt.push_str(&format!("Current position (FEN): {}\n", self.fen));
        prompt.push_str(&format!("Move history: {history}\n"));
        prompt.push_str(&format!("Last move played: {last_move}\n"));
        prompt.push_str(&format!("Best move suggested by the engine: {best_move}\n"));
        prompt.push_str(&format!(
            "Player level: {} ({}). {}\n\n",
            self.difficulty,
            tone.label(),
            tone.instruction()
        ));
        prompt.push_str(&format!(
            "Analyze the position and give strategic advice in {}.\n",
            self.language
        ));
        prompt.push_str(
            "If the user's last move was below the engine's suggestion, explain why by comparing the two.\n",
        );
        prompt.push_str(
            "Focus on how the user can make progress towards checkmate or win significant material.\n",
        );
        prompt.push_str("Keep the tone encouraging and educational.\n");
        if !self.best_move.is_empty() {
            prompt.push_str(
                "Set fromSquare to the first two characters of the engine move and toSquare to the next two.\n",
            );
        }
        prompt
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod request_tests;
