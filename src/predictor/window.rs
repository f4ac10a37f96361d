use super::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::VecDeque;

/// The most recent rounds, oldest first, bounded by capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    capacity: usize,
    rounds: VecDeque<Features>,
}

impl Window {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            rounds: VecDeque::with_capacity(capacity),
        }
    }
    pub fn push(&mut self, features: Features) {
        while self.rounds.len() >= self.capacity.max(1) {
            self.rounds.pop_front();
        }
        self.rounds.push_back(features);
    }
    pub fn last(&self) -> Option<&Features> {
        self.rounds.back()
    }
    /// The last `n` rounds, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Features> {
        self.rounds.iter().skip(self.rounds.len().saturating_sub(n))
    }
    pub fn iter(&self) -> impl Iterator<Item = &Features> {
        self.rounds.iter()
    }
    pub fn len(&self) -> usize {
        self.rounds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
