//! progress/mod.rs
//! Phase-tagged, rate-limited progress reporting for export and import runs.
//!
//! A `ProgressReporter` is an explicit object owned by the caller. It holds the
//! throttling state for one run at a time, so independent runs never share
//! timers.

pub mod phase;
pub mod timers;
pub mod reporter;

pub use phase::*;
pub use timers::*;
pub use reporter::*;
