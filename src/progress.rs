// src/progress.rs
use crate::data::Status;

/// Lightweight progress reporting for a run.
/// Frontends implement this to surface status to users; the default methods do nothing.
pub trait Progress {
    /// Called at the start with the number of categories.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called once per category after its fallback chain committed.
    fn item_done(&mut self, _key: &str, _status: Status, _count: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
