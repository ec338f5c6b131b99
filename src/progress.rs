// src/progress.rs
use crate::worker::SingerOutcome;

/// Lightweight progress reporting for a harvest run.
/// Frontends implement this to surface per-singer outcomes to users;
/// diagnostics go through `log`, not through here.
pub trait Progress {
    /// Called at the start with the number of singer tasks submitted.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called as each singer task reaches a terminal state.
    /// Completion order is scheduler-dependent.
    fn singer_done(&mut self, _id: u32, _outcome: &SingerOutcome) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink you can pass when you don't care.
pub struct NullProgress;
impl Progress for NullProgress {}
