use crate::FINGERS;
use crate::Probability;
use crate::config::PolicyConfig;
use crate::game::Fingers;
use crate::game::Outcome;
use crate::game::Parity;
use crate::predictor::Prediction;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Epsilon-greedy counter-move selection over a seeded generator.
///
/// Exploits the robot move with the highest win probability against the
/// predicted finger distribution with probability `1 - ε`, otherwise plays
/// uniformly at random. `ε` decays from `epsilon` toward `floor` as the
/// predictor observes more rounds.
#[derive(Debug, Clone)]
pub struct Policy {
    config: PolicyConfig,
    seed: u64,
    rng: SmallRng,
}

impl Policy {
    pub fn new(config: PolicyConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        log::debug!("[room] policy seed {}", seed);
        Self {
            config,
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Exploration rate after `observed` rounds.
    pub fn epsilon(&self, observed: usize) -> Probability {
        let PolicyConfig {
            epsilon,
            floor,
            decay,
            ..
        } = self.config;
        let n = observed.min(i32::MAX as usize) as i32;
        floor + (epsilon - floor) * decay.powi(n)
    }

    /// Probability the robot takes the round by showing `robot` when the
    /// human has called `choice`.
    pub fn value(prediction: &Prediction, choice: Parity, robot: Fingers) -> Probability {
        Fingers::all()
            .filter(|human| Outcome::resolve(Some(*human), robot, choice) == Outcome::RobotWin)
            .map(|human| prediction.finger(human))
            .sum()
    }

    /// Best counter-move; the smaller count wins ties.
    pub fn greedy(prediction: &Prediction, choice: Parity) -> Fingers {
        Fingers::all().fold(Fingers::clamp(Fingers::MIN), |best, robot| {
            match Self::value(prediction, choice, robot) > Self::value(prediction, choice, best) {
                true => robot,
                false => best,
            }
        })
    }

    /// The robot's move and whether it came from exploration.
    pub fn choose(&mut self, prediction: &Prediction, choice: Parity, observed: usize) -> (Fingers, bool) {
        let epsilon = self.epsilon(observed);
        match self.rng.random::<Probability>() < epsilon {
            true => {
                let n = self.rng.random_range(0..FINGERS);
                (Fingers::from_index(n).unwrap_or_else(|| Fingers::clamp(Fingers::MIN)), true)
            }
            false => (Self::greedy(prediction, choice), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(n: u8) -> Fingers {
        Fingers::try_from(n).unwrap()
    }
    fn config(epsilon: f32, floor: f32, seed: u64) -> PolicyConfig {
        PolicyConfig {
            epsilon,
            floor,
            decay: 0.9,
            seed: Some(seed),
        }
    }

    #[test]
    fn epsilon_decays_to_floor() {
        let policy = Policy::new(PolicyConfig::default());
        assert!((policy.epsilon(0) - 0.2).abs() < 1e-6);
        assert!(policy.epsilon(10) < policy.epsilon(1));
        assert!(policy.epsilon(10_000) >= 0.05);
        assert!((policy.epsilon(10_000) - 0.05).abs() < 1e-4);
    }

    #[test]
    fn greedy_counters_a_predictable_human() {
        // human nearly always shows 2 and calls odds: robot wants an even total
        let prediction = Prediction::new([0.01, 0.96, 0.01, 0.01, 0.01], [1., 0.]);
        assert_eq!(Policy::greedy(&prediction, Parity::Odds), f(2));
        assert!(Policy::value(&prediction, Parity::Odds, f(2)) > 0.95);
        assert!(Policy::value(&prediction, Parity::Odds, f(3)) < 0.05);
    }

    #[test]
    fn uniform_prediction_prefers_odd_counts_against_odds() {
        // three of five human counts are odd, so an odd robot count makes an even total 3/5 of the time
        let prediction = Prediction::uniform();
        assert_eq!(Policy::greedy(&prediction, Parity::Odds), f(1));
        assert!((Policy::value(&prediction, Parity::Odds, f(1)) - 0.6).abs() < 1e-5);
        assert_eq!(Policy::greedy(&prediction, Parity::Evens), f(2));
    }

    #[test]
    fn zero_epsilon_never_explores() {
        let mut policy = Policy::new(config(0., 0., 1));
        let prediction = Prediction::uniform();
        for _ in 0..100 {
            assert_eq!(policy.choose(&prediction, Parity::Odds, 0), (f(1), false));
        }
    }

    #[test]
    fn full_epsilon_covers_every_move() {
        let mut policy = Policy::new(config(1., 1., 7));
        let seen = (0..200)
            .map(|_| policy.choose(&Prediction::uniform(), Parity::Evens, 0))
            .inspect(|(_, explored)| assert!(explored))
            .map(|(robot, _)| robot)
            .collect::<std::collections::BTreeSet<_>>();
        assert_eq!(seen.len(), FINGERS);
    }

    #[test]
    fn same_seed_same_moves() {
        let mut a = Policy::new(config(0.5, 0.5, 42));
        let mut b = Policy::new(config(0.5, 0.5, 42));
        let prediction = Prediction::uniform();
        for n in 0..50 {
            assert_eq!(
                a.choose(&prediction, Parity::Odds, n),
                b.choose(&prediction, Parity::Odds, n)
            );
        }
    }
}
