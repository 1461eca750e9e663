//! Read-only state for the presentation layer.

use std::fmt;

use chess_rules::{color_name, Color, File, Piece, Position, Rank, Square};
use engine_session::Analysis;
use mentor_advice::{Difficulty, Highlight};

use crate::mentor::AdviceSlot;
use crate::pipeline::Stage;

/// Everything needed to draw the board and the mentor panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub fen: String,
    pub history: Vec<String>,
    pub last_move: Option<String>,
    pub turn: Color,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_draw: bool,
    pub difficulty: Difficulty,
    pub advice: AdviceSlot,
    pub analyzing: bool,
    pub stage: Stage,
    pub highlight: Option<Highlight>,
    pub evaluation: Option<Analysis>,
}

fn piece_char(piece: Piece, color: Color) -> char {
    let c = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    match color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

/// Numbered move list: `1. e4 e5 2. Nf3`.
pub fn format_history(history: &[String]) -> String {
    history
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
}

impl BoardView {
    fn is_highlighted(&self, square: Square) -> bool {
        self.highlight
            .as_ref()
            .is_some_and(|h| h.from == square.to_string() || h.to == square.to_string())
    }

    /// Text diagram, White at the bottom. Highlighted squares are bracketed.
    pub fn render_board(&self) -> String {
        let Ok(position) = Position::from_fen(&self.fen) else {
            return self.fen.clone();
        };
        let board = position.board();
        let mut out = String::new();
        for rank in Rank::ALL.iter().rev() {
            out.push_str(&format!("{} ", *rank as usize + 1));
            for file in File::ALL {
                let square = Square::new(file, *rank);
                let glyph = match (board.piece_on(square), board.color_on(square)) {
                    (Some(piece), Some(color)) => piece_char(piece, color),
                    _ => '.',
                };
                if self.is_highlighted(square) {
                    out.push_str(&format!("[{glyph}]"));
                } else {
                    out.push_str(&format!(" {glyph} "));
                }
            }
            out.push('\n');
        }
        out.push_str("   a  b  c  d  e  f  g  h\n");
        out
    }

    /// Engine evaluation from White's point of view, e.g. `+0.34` or `#-2`.
    pub fn evaluation_text(&self) -> Option<String> {
        let analysis = self.evaluation.as_ref()?;
        if *analysis == Analysis::unavailable() {
            return None;
        }
        let sign = match self.turn {
            Color::White => 1,
            Color::Black => -1,
        };
        Some(match analysis.mate {
            Some(n) => format!("#{}", n * sign),
            None => format!("{:+.2}", f64::from(analysis.score * sign) / 100.0),
        })
    }

    pub fn status_line(&self) -> String {
        if self.is_checkmate {
            format!("Checkmate, {} wins", color_name(!self.turn))
        } else if self.is_draw {
            "Draw".to_string()
        } else if self.is_check {
            format!("{} to move, in check", color_name(self.turn))
        } else {
            format!("{} to move", color_name(self.turn))
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render_board())?;
        writeln!(f, "{} | difficulty: {}", self.status_line(), self.difficulty)?;
        if !self.history.is_empty() {
            writeln!(f, "Moves: {}", format_history(&self.history))?;
        }
        if let Some(eval) = self.evaluation_text() {
            writeln!(f, "Evaluation: {eval}")?;
        }
        match &self.advice {
            AdviceSlot::Ready(advice) => {
                writeln!(f, "Mentor: {}", advice.text)?;
                writeln!(f, "  Best move: {}", advice.best_move_san)?;
                writeln!(f, "  {}", advice.strategic_explanation)?;
                if advice.is_checkmate_sequence {
                    writeln!(f, "  (forced mate)")?;
                }
            }
            AdviceSlot::GameOver(outcome) => writeln!(f, "Game over: {outcome}")?,
            AdviceSlot::Empty if self.analyzing => writeln!(f, "Mentor: {}...", self.stage)?,
            AdviceSlot::Empty => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod view_tests;
