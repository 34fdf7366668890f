//! Fixed-interval polling for asynchronous function updates, with
//! cancellation support.
//!
//! Lambda applies VPC changes asynchronously. After each mutating call the
//! function is re-fetched until it settles as `Active`/`Successful`, reports
//! a failure, or the attempt ceiling is reached.

use crate::error::TeardownError;
use backon::{BackoffBuilder, ConstantBuilder};
use delambda_common::defaults::{MAX_POLL_ATTEMPTS, POLL_INTERVAL};
use delambda_common::{Function, FunctionState, LastUpdateStatus};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Polling cadence for update completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between state fetches
    pub interval: Duration,
    /// Total number of state fetches before giving up
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

impl PollConfig {
    /// Poll without delay, for tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            interval: Duration::ZERO,
            max_attempts,
        }
    }
}

/// Where a function's most recent update stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateProgress {
    Complete,
    InProgress,
    Failed {
        state: FunctionState,
        last_update_status: LastUpdateStatus,
        reason: Option<String>,
    },
}

impl UpdateProgress {
    pub fn of(function: &Function) -> Self {
        if function.is_update_complete() {
            UpdateProgress::Complete
        } else if function.is_update_failed() {
            UpdateProgress::Failed {
                state: function.state.clone(),
                last_update_status: function.last_update_status.clone(),
                reason: function.state_reason_code.clone(),
            }
        } else {
            UpdateProgress::InProgress
        }
    }
}

/// Poll `check` until the update completes, fails, or the ceiling is hit.
///
/// The token is checked before each fetch and raced against each sleep.
/// Errors returned by `check` abort the wait unchanged.
///
/// # Returns
/// * `Ok(attempts)` - Update completed after that many fetches
/// * `Err(UpdateFailed)` - Provider reported a failed transition
/// * `Err(Timeout)` - `max_attempts` fetches never reached a terminal state
/// * `Err(Cancelled)` - Token fired
pub async fn wait_for_update<F, Fut>(
    config: PollConfig,
    cancel: Option<&CancellationToken>,
    name: &str,
    check: F,
) -> Result<u32, TeardownError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<UpdateProgress, TeardownError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut delays = ConstantBuilder::default()
        .with_delay(config.interval)
        .with_max_times((max_attempts - 1) as usize)
        .build();
    let mut attempts = 0u32;

    loop {
        if cancel.is_some_and(|token| token.is_cancelled()) {
            return Err(TeardownError::Cancelled {
                name: name.to_string(),
            });
        }

        attempts += 1;
        match check().await? {
            UpdateProgress::Complete => {
                debug!(function = %name, attempts, "Function update complete");
                return Ok(attempts);
            }
            UpdateProgress::Failed {
                state,
                last_update_status,
                reason,
            } => {
                return Err(TeardownError::UpdateFailed {
                    name: name.to_string(),
                    state,
                    last_update_status,
                    reason,
                });
            }
            UpdateProgress::InProgress => {}
        }

        let Some(delay) = delays.next() else {
            return Err(TeardownError::Timeout {
                name: name.to_string(),
                attempts,
            });
        };

        debug!(
            function = %name,
            attempt = attempts,
            delay_ms = delay.as_millis(),
            "Function update in progress, polling again"
        );

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = async {
                if let Some(token) = cancel {
                    token.cancelled().await
                } else {
                    std::future::pending::<()>().await
                }
            } => {
                return Err(TeardownError::Cancelled { name: name.to_string() });
            }
        }
    }
}
