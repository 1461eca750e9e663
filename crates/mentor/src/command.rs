//! Commands typed at the prompt.

use std::str::FromStr;

use chess_rules::{move_to_uci, parse_san, MoveProposal, Position};
use mentor_advice::Difficulty;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Coordinate (`e2e4`, `e7e8n`) or SAN (`Nf3`, `O-O`) text
    Move(String),
    Undo,
    Reset,
    Save,
    Load,
    Difficulty(Difficulty),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Difficulty(#[from] mentor_advice::UnknownDifficulty),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(CommandError::Empty)?;
        let arg = words.next();
        let command = match head.to_ascii_lowercase().as_str() {
            "move" | "m" => Command::Move(
                arg.ok_or(CommandError::MissingArgument("move"))?
                    .to_string(),
            ),
            "undo" | "u" => Command::Undo,
            "reset" | "new" => Command::Reset,
            "save" => Command::Save,
            "load" => Command::Load,
            "difficulty" | "level" => Command::Difficulty(
                arg.ok_or(CommandError::MissingArgument("difficulty"))?
                    .parse()?,
            ),
            "show" | "board" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            // Anything else is taken to be a move
            _ => Command::Move(head.to_string()),
        };
        Ok(command)
    }
}

/// Turn move text into a proposal: coordinate notation first, then SAN.
pub fn parse_move_text(position: &Position, text: &str) -> Option<MoveProposal> {
    if let Ok(proposal) = text.parse::<MoveProposal>() {
        return Some(proposal);
    }
    let mv = parse_san(position.board(), text)?;
    move_to_uci(position.board(), mv).parse().ok()
}

pub const HELP: &str = "\
Commands:
  <move>              play a move, e.g. e2e4, e7e8q, Nf3, O-O
  move <move>         same as above
  undo                take back the last move
  reset               start a new game
  save | load         save or restore the game
  difficulty <tier>   easy, medium or hard
  show                redraw the board
  help                this text
  quit                leave";

#[cfg(test)]
#[path = "command_tests.rs"]
mod command_tests;
