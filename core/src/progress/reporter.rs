//! progress/reporter.rs
//! Throttled progress emitter.
//!
//! Rules:
//! - At most one event per phase every `min_interval`.
//! - Only `complete` reaches 100% of a phase; `report` stops one unit short,
//!   so a stage that fails after its last byte never looks finished.
//! - The 100% event is always emitted, exactly once.
//! - `finish` emits the terminal `done` event and resets the per-run state so
//!   the same reporter can drive the next export or import.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::constants::DEFAULT_PROGRESS_INTERVAL;
use crate::progress::phase::{Phase, ProgressEvent};
use crate::progress::timers::PhaseTimes;

type Sink<'a> = Box<dyn FnMut(&ProgressEvent) + 'a>;

pub struct ProgressReporter<'a> {
    sink: Option<Sink<'a>>,
    min_interval: Duration,
    last_emit: HashMap<Phase, Instant>,
    started: HashMap<Phase, Instant>,
    completed: HashSet<Phase>,
    current: PhaseTimes,
    last_run: PhaseTimes,
}

impl<'a> ProgressReporter<'a> {
    /// Reporter forwarding events to `sink`.
    pub fn new<F>(sink: F) -> Self
    where
        F: FnMut(&ProgressEvent) + 'a,
    {
        Self::build(Some(Box::new(sink)))
    }

    /// Reporter that only tracks phase timings.
    pub fn silent() -> Self {
        Self::build(None)
    }

    fn build(sink: Option<Sink<'a>>) -> Self {
        Self {
            sink,
            min_interval: DEFAULT_PROGRESS_INTERVAL,
            last_emit: HashMap::new(),
            started: HashMap::new(),
            completed: HashSet::new(),
            current: PhaseTimes::default(),
            last_run: PhaseTimes::default(),
        }
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn set_min_interval(&mut self, min_interval: Duration) {
        self.min_interval = min_interval;
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Report `processed` out of `total` units for `phase`.
    ///
    /// Never completes the phase: `processed` is held below `total` until
    /// `complete` is called. Updates after a phase has completed are dropped
    /// until the run is finished.
    pub fn report(&mut self, phase: Phase, processed: u64, total: u64) {
        if phase == Phase::Done {
            self.finish(total);
            return;
        }
        if total == 0 {
            return;
        }
        self.record(phase, processed.min(total - 1), total);
    }

    /// Mark `phase` as fully processed.
    pub fn complete(&mut self, phase: Phase, total: u64) {
        self.record(phase, total, total);
    }

    fn record(&mut self, phase: Phase, processed: u64, total: u64) {
        if self.completed.contains(&phase) {
            return;
        }

        let now = Instant::now();
        self.started.entry(phase).or_insert(now);

        let event = ProgressEvent::new(phase, processed, total);
        let complete = event.is_complete();

        if !complete {
            if let Some(last) = self.last_emit.get(&phase) {
                if now.duration_since(*last) < self.min_interval {
                    return;
                }
            }
        }

        self.emit(&event);
        self.last_emit.insert(phase, now);

        if complete {
            self.completed.insert(phase);
            let started = self.started.get(&phase).copied().unwrap_or(now);
            let elapsed = now.duration_since(started);
            self.current.add(phase, elapsed);
            debug!(%phase, total, elapsed_us = elapsed.as_micros() as u64, "phase complete");
        }
    }

    /// Emit the terminal `done` event and reset per-run state.
    pub fn finish(&mut self, total: u64) {
        let event = ProgressEvent::new(Phase::Done, total, total);
        self.emit(&event);

        self.last_run = std::mem::take(&mut self.current);
        self.clear_run();
    }

    /// Drop per-run state left behind by a run that failed before `finish`.
    pub fn begin(&mut self) {
        self.current = PhaseTimes::default();
        self.clear_run();
    }

    fn clear_run(&mut self) {
        self.last_emit.clear();
        self.started.clear();
        self.completed.clear();
    }

    /// Phase durations of the last finished run.
    pub fn phase_times(&self) -> &PhaseTimes {
        &self.last_run
    }

    pub fn is_phase_complete(&self, phase: Phase) -> bool {
        self.completed.contains(&phase)
    }

    fn emit(&mut self, event: &ProgressEvent) {
        if let Some(sink) = self.sink.as_mut() {
            sink(event);
        }
    }
}

impl Default for ProgressReporter<'_> {
    fn default() -> Self {
        Self::silent()
    }
}

impl fmt::Debug for ProgressReporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("has_sink", &self.sink.is_some())
            .field("min_interval", &self.min_interval)
            .field("completed", &self.completed)
            .finish()
    }
}
