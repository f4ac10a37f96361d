use super::*;
use crate::ID;
use crate::WINS_NEEDED;
use crate::fault::Fault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Complete,
}

/// Round wins per side. Never decreases; never exceeds [`WINS_NEEDED`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub human: u8,
    pub robot: u8,
}

impl Score {
    pub fn decisive(&self) -> usize {
        (self.human + self.robot) as usize
    }
    pub fn finished(&self) -> bool {
        self.human >= WINS_NEEDED || self.robot >= WINS_NEEDED
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "human {} - {} robot", self.human, self.robot)
    }
}

/// A best-of-3 match. Owned exclusively by the orchestrator.
#[derive(Debug, Clone)]
pub struct Session {
    id: ID<Self>,
    records: Vec<RoundRecord>,
    score: Score,
    status: Status,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            id: ID::default(),
            records: Vec::new(),
            score: Score::default(),
            status: Status::InProgress,
        }
    }
}

impl Session {
    pub fn id(&self) -> ID<Self> {
        self.id
    }
    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }
    pub fn score(&self) -> Score {
        self.score
    }
    pub fn status(&self) -> Status {
        self.status
    }
    /// One-based number of the round about to be played.
    pub fn next_round(&self) -> u32 {
        u32::try_from(self.records.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }
    /// True if the human took the session; None while it is in progress.
    pub fn human_won(&self) -> Option<bool> {
        match self.status {
            Status::InProgress => None,
            Status::Complete => Some(self.score.human >= WINS_NEEDED),
        }
    }

    /// Append a resolved round and score it. Completes the session exactly
    /// when a side first reaches [`WINS_NEEDED`].
    pub fn append(&mut self, record: RoundRecord) -> Result<Status, Fault> {
        if self.status == Status::Complete {
            return Err(Fault::Invariant(format!(
                "round appended to completed session {}",
                self.id
            )));
        }
        if record.session() != self.id {
            return Err(Fault::Invariant(format!(
                "round {} belongs to session {}, not {}",
                record.id(),
                record.session(),
                self.id
            )));
        }
        match record.outcome() {
            Outcome::HumanWin => self.score.human += 1,
            Outcome::RobotWin => self.score.robot += 1,
            Outcome::NoContest => {}
        }
        self.records.push(record);
        if self.score.finished() {
            self.status = Status::Complete;
        }
        self.verify()?;
        Ok(self.status)
    }

    /// Scores must agree with the recorded outcomes.
    pub fn verify(&self) -> Result<(), Fault> {
        let human = self
            .records
            .iter()
            .filter(|r| r.outcome() == Outcome::HumanWin)
            .count();
        let robot = self
            .records
            .iter()
            .filter(|r| r.outcome() == Outcome::RobotWin)
            .count();
        if human != self.score.human as usize || robot != self.score.robot as usize {
            return Err(Fault::Invariant(format!(
                "score {} disagrees with {} human / {} robot recorded wins",
                self.score, human, robot
            )));
        }
        if self.score.human > WINS_NEEDED || self.score.robot > WINS_NEEDED {
            return Err(Fault::Invariant(format!("score {} out of range", self.score)));
        }
        if self.score.finished() != (self.status == Status::Complete) {
            return Err(Fault::Invariant(format!(
                "score {} inconsistent with status {:?}",
                self.score, self.status
            )));
        }
        Ok(())
    }
}
