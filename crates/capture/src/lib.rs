//! Incremental console output capture.
//!
//! Each poll of an instance returns its *entire* console buffer, never a
//! delta. The capture layer resolves where unseen content begins by
//! aligning the new snapshot against the previous one, then appends only
//! that suffix to a per-instance append-only log file. One independent
//! polling worker runs per instance; workers share nothing mutable.

pub mod fetch;
pub mod overlap;
pub mod resource;
pub mod sink;
pub mod supervisor;
pub mod worker;

pub use resource::Resource;
pub use sink::LogSink;
pub use worker::Worker;
