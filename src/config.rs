use serde::{Deserialize, Serialize};

/// Computer strength. `Hard` is the tiered corner > edge > flips policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    #[default]
    Hard,
}

impl Difficulty {
    /// Parses the lowercase name used by the page's difficulty buttons.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "normal" => Some(Self::Normal),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// Options for one game session, passed in from JavaScript as a plain object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub difficulty: Difficulty,
    /// Seed for the computer's random choices. Taken from the clock when absent.
    pub seed: Option<u64>,
}
