use super::*;
use std::sync::Arc;
use std::sync::Mutex;

/// Finger counts typed by an operator in place of a camera.
/// Each shown count is consumed by the first poll that reads it.
#[derive(Debug, Clone, Default)]
pub struct Manual {
    slot: Arc<Mutex<Option<u8>>>,
}

impl Manual {
    /// Handle for the input side; shares the slot with the adapter.
    pub fn hand(&self) -> Hand {
        Hand {
            slot: self.slot.clone(),
        }
    }
}

impl Capture for Manual {
    fn sample(&mut self) -> Sample {
        match self.slot.lock() {
            Ok(mut slot) => slot
                .take()
                .map(|n| Sample::new(Some(n), 1.))
                .unwrap_or_else(Sample::absent),
            Err(_) => Sample::absent(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hand {
    slot: Arc<Mutex<Option<u8>>>,
}

impl Hand {
    pub fn show(&self, n: u8) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = Some(n),
            Err(_) => log::warn!("[capture] manual input unavailable"),
        }
    }
}
