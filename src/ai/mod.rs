// AI module for the computer-controlled paddle

mod bot;
mod prediction;
mod predictive_bot;

pub use bot::Bot;
pub use prediction::predict_intercept;
pub use predictive_bot::{PredictiveBot, PredictiveBotConfig};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::AiConfig;

/// AI difficulty; tuning for each level lives in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Perfect prediction, no injected error
    Expert,
}

impl Difficulty {
    /// Get display name for difficulty
    pub fn display_name(&self) -> &str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Difficulty::Easy => "Slow to react, often misjudges the ball",
            Difficulty::Medium => "Decent opponent with the occasional miss",
            Difficulty::Hard => "Quick and mostly accurate",
            Difficulty::Expert => "Never misjudges a bounce",
        }
    }

    /// Whether predictions get a random offset
    pub fn injects_error(&self) -> bool {
        *self != Difficulty::Expert
    }

    pub fn all() -> Vec<Difficulty> {
        vec![
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// Create a bot for the given difficulty, with its RNG seeded from `seed`
pub fn create_bot(difficulty: Difficulty, config: &AiConfig, seed: u64) -> Box<dyn Bot> {
    Box::new(PredictiveBot::for_difficulty(difficulty, config, seed))
}
