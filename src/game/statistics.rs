use super::*;
use crate::FINGERS;
use crate::PARITIES;
use crate::Probability;
use crate::WINS_NEEDED;
use std::collections::BTreeMap;

/// Lifetime player statistics derived from the archived rounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub rounds: usize,
    pub decisive: usize,
    pub games: usize,
    pub human_games: usize,
    pub human_rounds: usize,
    pub fingers: [usize; FINGERS],
    pub parity: [usize; PARITIES],
    pub explored: usize,
    pub hits: usize,
}

impl Statistics {
    /// Fraction of decisive rounds the human won.
    pub fn win_rate(&self) -> Probability {
        match self.decisive {
            0 => 0.,
            n => self.human_rounds as Probability / n as Probability,
        }
    }
    /// Fraction of decisive rounds where the predicted most likely
    /// finger count was what the human actually showed.
    pub fn hit_rate(&self) -> Probability {
        match self.decisive {
            0 => 0.,
            n => self.hits as Probability / n as Probability,
        }
    }
    pub fn favorite(&self) -> Option<Fingers> {
        self.fingers
            .iter()
            .enumerate()
            .filter(|(_, n)| **n > 0)
            .max_by(|(i, a), (j, b)| a.cmp(b).then(j.cmp(i)))
            .and_then(|(i, _)| Fingers::from_index(i))
    }
}

impl From<&[RoundRecord]> for Statistics {
    fn from(records: &[RoundRecord]) -> Self {
        let mut stats = Self::default();
        let mut sessions = BTreeMap::<_, Score>::new();
        for record in records {
            stats.rounds += 1;
            stats.parity[record.choice().index()] += 1;
            stats.explored += record.explored() as usize;
            let score = sessions.entry(record.session()).or_default();
            match record.outcome() {
                Outcome::HumanWin => score.human += 1,
                Outcome::RobotWin => score.robot += 1,
                Outcome::NoContest => {}
            }
            if let Some(h) = record.human() {
                stats.decisive += 1;
                stats.fingers[h.index()] += 1;
                stats.hits += (record.prediction().likely() == h) as usize;
                stats.human_rounds += (record.outcome() == Outcome::HumanWin) as usize;
            }
        }
        stats.games = sessions.values().filter(|s| s.finished()).count();
        stats.human_games = sessions
            .values()
            .filter(|s| s.human >= WINS_NEEDED)
            .count();
        stats
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "games completed  {:>6} (human won {})", self.games, self.human_games)?;
        writeln!(f, "rounds played    {:>6} ({} decisive)", self.rounds, self.decisive)?;
        writeln!(f, "human win rate   {:>6.1}%", 100. * self.win_rate())?;
        writeln!(f, "prediction hits  {:>6.1}%", 100. * self.hit_rate())?;
        writeln!(f, "explored moves   {:>6}", self.explored)?;
        writeln!(
            f,
            "parity calls     ODDS {} / EVENS {}",
            self.parity[Parity::Odds.index()],
            self.parity[Parity::Evens.index()]
        )?;
        write!(
            f,
            "finger counts    {}",
            Fingers::all()
                .map(|h| format!("{}:{}", h, self.fingers[h.index()]))
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}
