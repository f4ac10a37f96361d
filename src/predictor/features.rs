use super::*;
use crate::FINGERS;
use crate::PARITIES;
use crate::game::*;
use serde::Deserialize;
use serde::Serialize;

/// Finger contexts: the previous count, or none (cold start / no contest).
pub const FINGER_CONTEXTS: usize = FINGERS + 1;
/// Parity contexts: previous call crossed with previous outcome, or none.
pub const PARITY_CONTEXTS: usize = PARITIES * 3 + 1;

/// What the predictor keeps from each resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    round: u64,
    fingers: Option<Fingers>,
    parity: Parity,
    outcome: Outcome,
    elapsed: u64,
    volatility: f32,
}

impl Features {
    /// Extract features of a new round given the rounds already in the window.
    /// Volatility is the fraction of consecutive rounds, among the last `span`,
    /// where the human changed either finger count or parity call.
    pub fn observe(record: &RoundRecord, window: &Window, span: usize) -> Self {
        let moves = window
            .recent(span.saturating_sub(1))
            .map(|f| (f.fingers, f.parity))
            .chain(std::iter::once((record.human(), record.choice())))
            .collect::<Vec<_>>();
        let changes = moves.windows(2).filter(|w| w[0] != w[1]).count();
        let volatility = match moves.len() {
            0 | 1 => 0.,
            n => changes as f32 / (n - 1) as f32,
        };
        Self {
            round: record.id(),
            fingers: record.human(),
            parity: record.choice(),
            outcome: record.outcome(),
            elapsed: record.elapsed(),
            volatility,
        }
    }
    pub fn round(&self) -> u64 {
        self.round
    }
    pub fn fingers(&self) -> Option<Fingers> {
        self.fingers
    }
    pub fn parity(&self) -> Parity {
        self.parity
    }
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
    /// Milliseconds into the session when the round resolved.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }
    pub fn volatility(&self) -> f32 {
        self.volatility
    }
    /// Context this round sets for the next finger prediction.
    pub fn finger_context(&self) -> usize {
        self.fingers.map(|f| f.index()).unwrap_or(FINGERS)
    }
    /// Context this round sets for the next parity prediction.
    pub fn parity_context(&self) -> usize {
        self.parity.index() * 3 + self.outcome.index()
    }
}

/// Contexts used when there is no previous round.
pub fn opening_contexts() -> (usize, usize) {
    (FINGER_CONTEXTS - 1, PARITY_CONTEXTS - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ID;
    fn record(id: u64, human: Option<u8>, choice: Parity) -> RoundRecord {
        RoundRecord::new(
            id,
            ID::default(),
            1,
            choice,
            Fingers::try_from(2).unwrap(),
            human.map(|h| Fingers::try_from(h).unwrap()),
            Prediction::uniform(),
        )
    }
    #[test]
    fn first_round_is_calm() {
        let window = Window::new(5);
        let f = Features::observe(&record(1, Some(3), Parity::Odds), &window, 4);
        assert_eq!(f.volatility(), 0.);
        assert_eq!(f.finger_context(), 2);
    }
    #[test]
    fn alternating_human_is_fully_volatile() {
        let mut window = Window::new(5);
        let plays = [(1, Parity::Odds), (2, Parity::Evens), (1, Parity::Odds), (2, Parity::Evens)];
        let mut last = None;
        for (i, (h, p)) in plays.into_iter().enumerate() {
            let f = Features::observe(&record(i as u64 + 1, Some(h), p), &window, 4);
            window.push(f);
            last = Some(f);
        }
        assert_eq!(last.unwrap().volatility(), 1.);
    }
    #[test]
    fn repeating_human_is_calm() {
        let mut window = Window::new(5);
        for i in 1..=5 {
            let f = Features::observe(&record(i, Some(4), Parity::Evens), &window, 4);
            assert_eq!(f.volatility(), 0.);
            window.push(f);
        }
    }
    #[test]
    fn contexts_are_in_range() {
        let window = Window::new(2);
        for outcome_case in [Some(1), None] {
            for p in [Parity::Odds, Parity::Evens] {
                let f = Features::observe(&record(1, outcome_case, p), &window, 4);
                assert!(f.finger_context() < FINGER_CONTEXTS);
                assert!(f.parity_context() < PARITY_CONTEXTS - 1);
            }
        }
    }
}
