mod ranker;

pub use ranker::Ranker;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the agent scores candidate destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Highest belief that the target is in the cell.
    Containment,
    /// Highest belief that examining the cell finds the target.
    Detection,
    /// Detection belief discounted by travel: `prob_find / (distance + 1)`.
    #[default]
    Utility,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Containment, Strategy::Detection, Strategy::Utility];

    pub const fn as_str(self) -> &'static str {
        match self {
            Strategy::Containment => "containment",
            Strategy::Detection => "detection",
            Strategy::Utility => "utility",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "containment" | "contain" => Ok(Strategy::Containment),
            "detection" | "find" => Ok(Strategy::Detection),
            "utility" | "cost" => Ok(Strategy::Utility),
            _ => Err(ParseStrategyError(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(pub String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown strategy '{}'; expected containment, detection or utility",
            self.0
        )
    }
}

impl std::error::Error for ParseStrategyError {}
