//! progress/timers.rs
//! Per-phase wall-clock durations collected while a run reports progress.

use std::collections::{hash_map, HashMap};
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::progress::phase::Phase;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimes {
    times: HashMap<Phase, Duration>,
}

impl PhaseTimes {
    /// Add duration to a phase (accumulates if already present).
    pub fn add(&mut self, phase: Phase, dur: Duration) {
        *self.times.entry(phase).or_insert(Duration::ZERO) += dur;
    }

    pub fn get(&self, phase: Phase) -> Duration {
        self.times.get(&phase).copied().unwrap_or(Duration::ZERO)
    }

    pub fn get_ms(&self, phase: Phase) -> f64 {
        self.get(phase).as_secs_f64() * 1_000.0
    }

    pub fn contains(&self, phase: Phase) -> bool {
        self.times.contains_key(&phase)
    }

    /// Sum of all phase durations.
    pub fn total(&self) -> Duration {
        self.times.values().copied().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Phase, &Duration)> {
        self.times.iter()
    }
}

impl<'a> IntoIterator for &'a PhaseTimes {
    type Item = (&'a Phase, &'a Duration);
    type IntoIter = hash_map::Iter<'a, Phase, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter()
    }
}
