use crate::Probability;
use crate::game::Fingers;

/// One reading from a capture adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    fingers: Option<u8>,
    confidence: Probability,
    timestamp: u64,
}

impl Sample {
    pub fn new(fingers: Option<u8>, confidence: Probability) -> Self {
        Self {
            fingers,
            confidence: confidence.clamp(0., 1.),
            timestamp: crate::now_ms(),
        }
    }
    /// No hand in view.
    pub fn absent() -> Self {
        Self::new(None, 0.)
    }
    pub fn fingers(&self) -> Option<u8> {
        self.fingers
    }
    pub fn confidence(&self) -> Probability {
        self.confidence
    }
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
    /// A playable finger count, if the reading is confident enough.
    /// Zero fingers means no hand was detected.
    pub fn accept(&self, threshold: Probability) -> Option<Fingers> {
        self.fingers
            .filter(|_| self.confidence >= threshold)
            .and_then(|n| Fingers::try_from(n).ok())
    }
}
