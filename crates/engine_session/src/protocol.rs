//! Parsing of the engine-to-GUI side of UCI.

/// One line of engine output, reduced to what the session needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineLine {
    IdName(String),
    UciOk,
    ReadyOk,
    Info(InfoLine),
    /// `bestmove <mv>`; `None` for `(none)` and the null move `0000`.
    BestMove(Option<String>),
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoLine {
    pub depth: Option<u8>,
    pub score: Option<Score>,
    pub multipv: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Cp(i32),
    Mate(i32),
}

impl Score {
    /// Collapse to centipawns, mapping mate-in-n to just under `MATE_SCORE`.
    pub fn centipawns(self) -> i32 {
        match self {
            Score::Cp(cp) => cp,
            Score::Mate(n) if n >= 0 => crate::MATE_SCORE - n,
            Score::Mate(n) => -crate::MATE_SCORE - n,
        }
    }
}

pub fn parse_line(line: &str) -> EngineLine {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.first().copied() {
        Some("uciok") => EngineLine::UciOk,
        Some("readyok") => EngineLine::ReadyOk,
        Some("id") if parts.get(1) == Some(&"name") => EngineLine::IdName(parts[2..].join(" ")),
        Some("bestmove") => {
            let mv = parts
                .get(1)
                .filter(|m| **m != "(none)" && **m != "0000")
                .map(|m| m.to_string());
            EngineLine::BestMove(mv)
        }
        Some("info") => EngineLine::Info(parse_info(&parts[1..])),
        _ => EngineLine::Other,
    }
}

fn parse_info(parts: &[&str]) -> InfoLine {
    let mut info = InfoLine::default();
    // Bound scores are not exact evaluations
    let bounded = parts
        .iter()
        .any(|p| *p == "lowerbound" || *p == "upperbound");

    let mut i = 0;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                info.depth = parts.get(i + 1).and_then(|d| d.parse().ok());
                i += 1;
            }
            "multipv" => {
                info.multipv = parts.get(i + 1).and_then(|d| d.parse().ok());
                i += 1;
            }
            "score" if !bounded => {
                let value = parts.get(i + 2).and_then(|v| v.parse::<i32>().ok());
                info.score = match (parts.get(i + 1).copied(), value) {
                    (Some("cp"), Some(v)) => Some(Score::Cp(v)),
                    (Some("mate"), Some(v)) => Some(Score::Mate(v)),
                    _ => None,
                };
                i += 2;
            }
            // Everything after pv is moves
            "pv" => break,
            _ => {}
        }
        i += 1;
    }
    info
}

/// Accumulates `info` lines of the principal variation during one search.
#[derive(Debug, Default)]
pub(crate) struct InfoTracker {
    depth: Option<u8>,
    score: Option<Score>,
}

impl InfoTracker {
    pub(crate) fn update(&mut self, info: &InfoLine) {
        if info.multipv.is_some_and(|n| n != 1) {
            return;
        }
        if let Some(score) = info.score {
            self.score = Some(score);
            if info.depth.is_some() {
                self.depth = info.depth;
            }
        }
    }

    pub(crate) fn finish(self, best_move: Option<String>, requested_depth: u8) -> crate::Analysis {
        crate::Analysis {
            best_move: best_move.unwrap_or_default(),
            score: self.score.map(Score::centipawns).unwrap_or(0),
            depth: self.depth.unwrap_or(requested_depth),
            mate: match self.score {
                Some(Score::Mate(n)) => Some(n),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
