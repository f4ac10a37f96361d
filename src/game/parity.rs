use serde::Deserialize;
use serde::Serialize;

/// The human's bet on the parity of the combined finger total.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Parity {
    Odds,
    Evens,
}

impl Parity {
    /// Parity of a total.
    pub fn of(total: u8) -> Self {
        match total % 2 {
            1 => Self::Odds,
            _ => Self::Evens,
        }
    }
    pub fn index(&self) -> usize {
        match self {
            Self::Odds => 0,
            Self::Evens => 1,
        }
    }
    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Self::Odds),
            1 => Some(Self::Evens),
            _ => None,
        }
    }
    pub fn flip(&self) -> Self {
        match self {
            Self::Odds => Self::Evens,
            Self::Evens => Self::Odds,
        }
    }
}

impl Default for Parity {
    fn default() -> Self {
        Self::Odds
    }
}

impl std::fmt::Display for Parity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Odds => write!(f, "ODDS"),
            Self::Evens => write!(f, "EVENS"),
        }
    }
}

impl TryFrom<&str> for Parity {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "o" | "odd" | "odds" => Ok(Self::Odds),
            "e" | "even" | "evens" => Ok(Self::Evens),
            _ => Err("expected odds or evens"),
        }
    }
}
