//! Teardown workflows
//!
//! [`TeardownEngine`] runs the single-function and stack-wide workflows over
//! the gateways and narrates every step to a [`ProgressSink`].

mod batch;
mod engine;
pub mod progress;
mod summary;

pub use engine::TeardownEngine;
pub use progress::{LogSink, ProgressSink, TeardownEvent, TeardownStep, WriterSink};
pub use summary::TeardownSummary;
