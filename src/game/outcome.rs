use super::*;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    HumanWin,
    RobotWin,
    NoContest,
}

impl Outcome {
    /// The human wins when the parity of the total matches their call.
    /// A round without an accepted finger count is no contest.
    pub fn resolve(human: Option<Fingers>, robot: Fingers, choice: Parity) -> Self {
        match human {
            None => Self::NoContest,
            Some(h) if Parity::of(h.count() + robot.count()) == choice => Self::HumanWin,
            Some(_) => Self::RobotWin,
        }
    }
    pub fn is_decisive(&self) -> bool {
        !matches!(self, Self::NoContest)
    }
    pub fn index(&self) -> usize {
        match self {
            Self::HumanWin => 0,
            Self::RobotWin => 1,
            Self::NoContest => 2,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::HumanWin => write!(f, "human wins"),
            Self::RobotWin => write!(f, "robot wins"),
            Self::NoContest => write!(f, "no contest"),
        }
    }
}
