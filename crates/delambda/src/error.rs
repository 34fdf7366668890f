//! Teardown workflow errors

use crate::aws::AwsError;
use delambda_common::{FunctionState, LastUpdateStatus};
use std::error::Error as _;
use thiserror::Error;

/// Errors produced by the gateways and teardown workflows
#[derive(Debug, Error)]
pub enum TeardownError {
    #[error("function {name} not found")]
    NotFound { name: String },

    /// The function has no VPC attachment with at least one subnet.
    ///
    /// Often benign: callers match on it to skip optional network steps.
    #[error("function {name} is not attached to a VPC")]
    NotAttached { name: String },

    #[error(
        "update of function {name} failed: state={state}, last_update_status={last_update_status}, reason={}",
        .reason.as_deref().unwrap_or("unknown")
    )]
    UpdateFailed {
        name: String,
        state: FunctionState,
        last_update_status: LastUpdateStatus,
        reason: Option<String>,
    },

    #[error("timed out waiting for function {name} after {attempts} polls")]
    Timeout { name: String, attempts: u32 },

    #[error("cancelled while processing {name}")]
    Cancelled { name: String },

    #[error("no Lambda functions found in stack {group}")]
    EmptyGroup { group: String },

    #[error("failed to process {failed} of {total} function(s)")]
    PartialFailure { failed: usize, total: usize },

    #[error("failed to {operation} {name}")]
    Gateway {
        operation: &'static str,
        name: String,
        source: AwsError,
    },
}

impl TeardownError {
    /// Wrap a provider error, promoting "not found" to [`TeardownError::NotFound`]
    pub fn from_aws(operation: &'static str, name: &str, err: AwsError) -> Self {
        if err.is_not_found() {
            TeardownError::NotFound {
                name: name.to_string(),
            }
        } else {
            TeardownError::Gateway {
                operation,
                name: name.to_string(),
                source: err,
            }
        }
    }

    /// Wrap a provider error as-is
    pub fn gateway(operation: &'static str, name: &str, err: AwsError) -> Self {
        TeardownError::Gateway {
            operation,
            name: name.to_string(),
            source: err,
        }
    }

    pub fn is_not_attached(&self) -> bool {
        matches!(self, TeardownError::NotAttached { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TeardownError::Cancelled { .. })
    }

    /// The underlying provider error, if any
    pub fn aws_error(&self) -> Option<&AwsError> {
        match self {
            TeardownError::Gateway { source, .. } => Some(source),
            _ => None,
        }
    }

    /// One-line message including every cause, for per-member reports
    pub fn full_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
