use crate::game::Parity;
use crate::game::RoundRecord;
use crate::game::Score;
use crate::gameroom::Phase;
use crate::predictor::Prediction;

/// Point-in-time view of the orchestrator, safe to hand to any reader.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub phase: Phase,
    pub score: Score,
    /// One-based round number in the current session.
    pub round: u32,
    /// Parity the human has called, or will call on advance.
    pub choice: Parity,
    /// What the predictor expected when the robot locked in its move.
    pub prediction: Prediction,
    /// Rounds the predictor has observed.
    pub observed: usize,
    /// Most recently resolved round of this session.
    pub last: Option<RoundRecord>,
    /// Diagnostic of the fault that aborted the last session.
    pub fault: Option<String>,
    pub linked: bool,
}
