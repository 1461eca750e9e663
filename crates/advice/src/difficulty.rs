//! Difficulty tiers: how deep the engine searches and how the mentor talks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Narrative register of the advice text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Basic,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyPolicy {
    pub depth: u8,
    pub tone: Tone,
}

const POLICIES: [(Difficulty, DifficultyPolicy); 3] = [
    (
        Difficulty::Easy,
        DifficultyPolicy {
            depth: 5,
            tone: Tone::Basic,
        },
    ),
    (
        Difficulty::Medium,
        DifficultyPolicy {
            depth: 12,
            tone: Tone::Intermediate,
        },
    ),
    (
        Difficulty::Hard,
        DifficultyPolicy {
            depth: 18,
            tone: Tone::Advanced,
        },
    ),
];

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn policy(self) -> DifficultyPolicy {
        POLICIES
            .iter()
            .find(|(tier, _)| *tier == self)
            .map(|(_, policy)| *policy)
            .unwrap_or(POLICIES[1].1)
    }

    /// Engine search depth for this tier
    pub fn depth(self) -> u8 {
        self.policy().depth
    }

    pub fn tone(self) -> Tone {
        self.policy().tone
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

impl Tone {
    pub fn label(self) -> &'static str {
        match self {
            Tone::Basic => "basic",
            Tone::Intermediate => "intermediate",
            Tone::Advanced => "advanced",
        }
    }

    /// How the model should pitch its explanation.
    pub fn instruction(self) -> &'static str {
        match self {
            Tone::Basic => {
                "The player is a beginner. Use simple language, avoid jargon and explain one clear idea."
            }
            Tone::Intermediate => {
                "The player is an intermediate club player. Name the plans and tactical motifs involved."
            }
            Tone::Advanced => {
                "The player is advanced. Be concise and precise, and discuss concrete variations and long-term imbalances."
            }
        }
    }
}

#[cfg(test)]
#[path = "difficulty_tests.rs"]
mod difficulty_tests;
