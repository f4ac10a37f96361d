use super::*;
use crate::ID;
use crate::predictor::Prediction;
use serde::Deserialize;
use serde::Serialize;

/// One resolved round. Created only at resolution and never edited;
/// the outcome is derived from the moves, so it cannot disagree with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    id: u64,
    session: ID<Session>,
    round: u32,
    human: Option<Fingers>,
    choice: Parity,
    prediction: Prediction,
    robot: Fingers,
    explored: bool,
    outcome: Outcome,
    timestamp: u64,
    elapsed: u64,
    duration: u64,
}

impl RoundRecord {
    pub fn new(
        id: u64,
        session: ID<Session>,
        round: u32,
        choice: Parity,
        robot: Fingers,
        human: Option<Fingers>,
        prediction: Prediction,
    ) -> Self {
        Self {
            id,
            session,
            round,
            human,
            choice,
            prediction,
            robot,
            explored: false,
            outcome: Outcome::resolve(human, robot, choice),
            timestamp: crate::now_ms(),
            elapsed: 0,
            duration: 0,
        }
    }
    /// Whether the robot's move came from exploration rather than exploitation.
    pub fn with_exploration(mut self, explored: bool) -> Self {
        self.explored = explored;
        self
    }
    /// Milliseconds since session start, and milliseconds the round took.
    pub fn with_timing(mut self, elapsed: u64, duration: u64) -> Self {
        self.elapsed = elapsed;
        self.duration = duration;
        self
    }
}

impl RoundRecord {
    /// Global, strictly increasing sequence number.
    pub fn id(&self) -> u64 {
        self.id
    }
    pub fn session(&self) -> ID<Session> {
        self.session
    }
    /// One-based round number within the session.
    pub fn round(&self) -> u32 {
        self.round
    }
    pub fn human(&self) -> Option<Fingers> {
        self.human
    }
    pub fn choice(&self) -> Parity {
        self.choice
    }
    pub fn prediction(&self) -> &Prediction {
        &self.prediction
    }
    pub fn robot(&self) -> Fingers {
        self.robot
    }
    pub fn explored(&self) -> bool {
        self.explored
    }
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }
    pub fn duration(&self) -> u64 {
        self.duration
    }
    pub fn total(&self) -> Option<u8> {
        self.human.map(|h| h.count() + self.robot.count())
    }
}

impl std::fmt::Display for RoundRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.human {
            Some(h) => write!(
                f,
                "#{} R{} human {} + robot {} = {} ({}) called {}: {}",
                self.id,
                self.round,
                h,
                self.robot,
                h.count() + self.robot.count(),
                Parity::of(h.count() + self.robot.count()),
                self.choice,
                self.outcome
            ),
            None => write!(
                f,
                "#{} R{} no hand, robot {} called {}: {}",
                self.id, self.round, self.robot, self.choice, self.outcome
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn f(n: u8) -> Fingers {
        Fingers::try_from(n).unwrap()
    }
    #[test]
    fn outcome_follows_moves() {
        let record = RoundRecord::new(
            1,
            ID::default(),
            1,
            Parity::Odds,
            f(4),
            Some(f(3)),
            Prediction::uniform(),
        );
        assert_eq!(record.outcome(), Outcome::HumanWin);
        assert_eq!(record.total(), Some(7));
    }
    #[test]
    fn json_roundtrip_preserves_record() {
        let record = RoundRecord::new(9, ID::default(), 2, Parity::Evens, f(1), None, Prediction::uniform())
            .with_timing(1200, 4000)
            .with_exploration(true);
        let json = serde_json::to_string(&record).unwrap();
        let back = serde_json::from_str::<RoundRecord>(&json).unwrap();
        assert_eq!(record, back);
        assert!(json.contains("\"NO_CONTEST\""));
    }
}
