use crate::FINGERS;
use crate::PARITIES;
use crate::Probability;
use crate::game::Fingers;
use crate::game::Parity;
use serde::Deserialize;
use serde::Serialize;

/// Distributions over the human's next finger count and next parity call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    fingers: [Probability; FINGERS],
    parity: [Probability; PARITIES],
}

impl Prediction {
    pub fn uniform() -> Self {
        Self {
            fingers: [1. / FINGERS as Probability; FINGERS],
            parity: [1. / PARITIES as Probability; PARITIES],
        }
    }
    /// Normalizes both heads. Degenerate (zero-mass) input falls back to uniform.
    pub fn new(fingers: [Probability; FINGERS], parity: [Probability; PARITIES]) -> Self {
        Self {
            fingers: normalize(fingers),
            parity: normalize(parity),
        }
    }
    pub fn fingers(&self) -> &[Probability; FINGERS] {
        &self.fingers
    }
    pub fn parity(&self) -> &[Probability; PARITIES] {
        &self.parity
    }
    pub fn finger(&self, f: Fingers) -> Probability {
        self.fingers[f.index()]
    }
    pub fn call(&self, p: Parity) -> Probability {
        self.parity[p.index()]
    }
    /// Most likely finger count; the smaller count wins ties.
    pub fn likely(&self) -> Fingers {
        let best = (0..FINGERS).fold(0, |best, i| match self.fingers[i] > self.fingers[best] {
            true => i,
            false => best,
        });
        Fingers::clamp(best as u8 + Fingers::MIN)
    }
    /// Most likely parity call; odds wins ties.
    pub fn likely_call(&self) -> Parity {
        match self.call(Parity::Evens) > self.call(Parity::Odds) {
            true => Parity::Evens,
            false => Parity::Odds,
        }
    }
    /// Finite, non-negative, and summing to one within tolerance.
    pub fn is_valid(&self) -> bool {
        fn ok(xs: &[Probability]) -> bool {
            xs.iter().all(|x| x.is_finite() && *x >= 0.)
                && (xs.iter().sum::<Probability>() - 1.).abs() < 1e-3
        }
        ok(&self.fingers) && ok(&self.parity)
    }
}

impl Default for Prediction {
    fn default() -> Self {
        Self::uniform()
    }
}

fn normalize<const N: usize>(xs: [Probability; N]) -> [Probability; N] {
    let sum = xs.iter().filter(|x| x.is_finite()).sum::<Probability>();
    match sum > 0. && xs.iter().all(|x| x.is_finite() && *x >= 0.) {
        true => xs.map(|x| x / sum),
        false => [1. / N as Probability; N],
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for h in Fingers::all() {
            write!(f, "{}:{:.2} ", h, self.finger(h))?;
        }
        write!(
            f,
            "| ODDS {:.2} EVENS {:.2}",
            self.call(Parity::Odds),
            self.call(Parity::Evens)
        )
    }
}
