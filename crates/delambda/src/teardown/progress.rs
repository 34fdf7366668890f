//! Progress reporting for teardown workflows
//!
//! Workflows narrate each step as a [`TeardownEvent`]. Where the narration
//! goes is up to the [`ProgressSink`]: stdout for the CLI, `tracing` for
//! library callers, or memory in tests.

use super::summary::TeardownSummary;
use std::fmt;
use std::io::Write;
use std::sync::Mutex;
use tracing::{info, warn};

/// Network step a batch member can fail on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStep {
    Fetch,
    DisableIpv6,
    Detach,
    Delete,
}

impl fmt::Display for TeardownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TeardownStep::Fetch => "get function",
            TeardownStep::DisableIpv6 => "disable IPv6",
            TeardownStep::Detach => "detach VPC",
            TeardownStep::Delete => "delete function",
        })
    }
}

/// One narrated step of a teardown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownEvent {
    GroupResolved { group: String, count: usize },
    MemberStarted { name: String },
    /// Detach requested but there is nothing to detach
    AlreadyDetached { name: String },
    /// IPv6 disable requested but the function has no attachment
    Ipv6SkippedNotAttached { name: String },
    /// IPv6 disable requested but dual-stack is already off
    Ipv6NotEnabled { name: String },
    Ipv6Disabled { name: String },
    NetworkDetached { name: String },
    Deleting { name: String },
    Deleted { name: String },
    DeletingLogs { log_group: String },
    LogsDeleted { log_group: String },
    LogsSkipped,
    /// Log cleanup failed after the function was deleted
    LogsWarning { log_group: String, error: String },
    StepFailed {
        name: String,
        step: TeardownStep,
        error: String,
    },
    MemberSucceeded { name: String },
    MemberCancelled { name: String },
    Summary(TeardownSummary),
}

impl TeardownEvent {
    /// Whether this event reports something going wrong
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            TeardownEvent::LogsWarning { .. }
                | TeardownEvent::StepFailed { .. }
                | TeardownEvent::MemberCancelled { .. }
        ) || matches!(self, TeardownEvent::Summary(s) if s.failed > 0)
    }
}

impl fmt::Display for TeardownEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeardownEvent::GroupResolved { group, count } => {
                write!(f, "Found {count} Lambda function(s) in stack {group}")
            }
            TeardownEvent::MemberStarted { name } => {
                write!(f, "=== Processing function: {name} ===")
            }
            TeardownEvent::AlreadyDetached { name } => {
                write!(f, "Function {name} is not attached to a VPC, already detached, skipping")
            }
            TeardownEvent::Ipv6SkippedNotAttached { name } => {
                write!(f, "Function {name} is not attached to a VPC, skipping IPv6 disable")
            }
            TeardownEvent::Ipv6NotEnabled { name } => {
                write!(f, "IPv6 is not enabled for {name}, skipping IPv6 disable")
            }
            TeardownEvent::Ipv6Disabled { name } => write!(f, "Disabled IPv6 for function {name}"),
            TeardownEvent::NetworkDetached { name } => {
                write!(f, "Detached VPC from function {name}")
            }
            TeardownEvent::Deleting { name } => write!(f, "Deleting function {name}..."),
            TeardownEvent::Deleted { name } => write!(f, "Deleted function {name}"),
            TeardownEvent::DeletingLogs { log_group } => {
                write!(f, "Deleting CloudWatch Logs log group {log_group}...")
            }
            TeardownEvent::LogsDeleted { log_group } => {
                write!(f, "Deleted CloudWatch Logs log group {log_group}")
            }
            TeardownEvent::LogsSkipped => f.write_str("Skipping log deletion"),
            TeardownEvent::LogsWarning { log_group, error } => {
                write!(f, "Warning: failed to delete log group {log_group}: {error}")
            }
            TeardownEvent::StepFailed { name, error, .. } => {
                write!(f, "Failed to process {name}: {error}")
            }
            TeardownEvent::MemberSucceeded { name } => write!(f, "Successfully processed {name}"),
            TeardownEvent::MemberCancelled { name } => {
                write!(f, "Cancelled before processing {name}")
            }
            TeardownEvent::Summary(s) => {
                write!(
                    f,
                    "=== Summary === total: {}, succeeded: {}, failed: {}",
                    s.total, s.succeeded, s.failed
                )?;
                for (name, error) in &s.failures {
                    write!(f, "\n  - {name}: {error}")?;
                }
                Ok(())
            }
        }
    }
}

/// Trait for receiving teardown narration
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: TeardownEvent);
}

impl<P: ProgressSink + ?Sized> ProgressSink for &P {
    fn report(&self, event: TeardownEvent) {
        (**self).report(event);
    }
}

/// Writes one line per event to any writer (stdout in the CLI)
pub struct WriterSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ProgressSink for WriterSink<W> {
    fn report(&self, event: TeardownEvent) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        // Blank line between batch members, as a visual separator
        if matches!(
            event,
            TeardownEvent::MemberStarted { .. } | TeardownEvent::Summary(_)
        ) {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{event}");
    }
}

/// Sends narration to `tracing` (for non-interactive callers)
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn report(&self, event: TeardownEvent) {
        if event.is_warning() {
            warn!(target: "delambda::progress", "{event}");
        } else {
            info!(target: "delambda::progress", "{event}");
        }
    }
}
