use super::*;
use std::collections::VecDeque;

/// Replays a fixed sequence of samples, then reports no hand forever.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    samples: VecDeque<Sample>,
}

impl Scripted {
    /// Fully confident readings of the given finger counts, one per poll.
    pub fn hands(counts: &[u8]) -> Self {
        Self::from(
            counts
                .iter()
                .map(|n| Sample::new(Some(*n), 1.))
                .collect::<Vec<_>>(),
        )
    }
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl From<Vec<Sample>> for Scripted {
    fn from(samples: Vec<Sample>) -> Self {
        Self {
            samples: samples.into(),
        }
    }
}

impl Capture for Scripted {
    fn sample(&mut self) -> Sample {
        self.samples.pop_front().unwrap_or_else(Sample::absent)
    }
}
