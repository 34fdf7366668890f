//! AWS error classification
//!
//! Provides typed errors for AWS SDK operations using the `.code()` method
//! instead of string matching on Debug format.

use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata};
use thiserror::Error;

/// AWS error categories for skip and cleanup logic
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AwsError {
    /// Resource was not found (safe to skip in cleanup)
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// Resource is busy with another operation (e.g., an update in progress)
    #[error("Resource conflict: {message}")]
    Conflict { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    Throttled,

    /// Credentials missing, expired, or lacking permissions
    #[error("Access denied: {message}")]
    AccessDenied { message: String },

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsError::NotFound { .. })
    }

    /// Get a user-friendly suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            AwsError::Conflict { .. } => {
                Some("The function is still being updated. Wait a moment and retry.".to_string())
            }
            AwsError::Throttled => {
                Some("AWS API rate limit hit. Wait a moment and retry.".to_string())
            }
            AwsError::AccessDenied { .. } => Some(
                "Check your credentials with `aws sts get-caller-identity` or pass --profile."
                    .to_string(),
            ),
            AwsError::Sdk { code: Some(c), .. } => suggestion_for_code(c),
            _ => None,
        }
    }
}

/// Known AWS error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &["ResourceNotFoundException", "NoSuchEntity"];

/// Known AWS error codes for a resource busy with another operation
const CONFLICT_CODES: &[&str] = &["ResourceConflictException", "ResourceInUseException"];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "TooManyRequestsException",
];

/// Known AWS error codes for credential and permission problems
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDeniedException",
    "AccessDenied",
    "UnrecognizedClientException",
    "ExpiredTokenException",
];

/// Classify an AWS error from its code and message.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound { message },
        Some(c) if CONFLICT_CODES.contains(&c) => AwsError::Conflict { message },
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled,
        Some(c) if ACCESS_DENIED_CODES.contains(&c) => AwsError::AccessDenied { message },
        // CloudFormation reports a missing stack as a validation error
        Some("ValidationError") if message.contains("does not exist") => {
            AwsError::NotFound { message }
        }
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Classify any SDK error that exposes error metadata.
///
/// Errors without a service message (timeouts, dispatch failures) fall back
/// to the full display chain so the cause is not lost.
pub fn classify_sdk_error<E>(err: &E) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = match err.message() {
        Some(m) => m.to_string(),
        None => DisplayErrorContext(err).to_string(),
    };
    classify_aws_error(err.code(), Some(&message))
}

/// Error code to user-friendly suggestion mapping
const SUGGESTIONS: &[(&str, &str)] = &[
    (
        "InvalidParameterValueException",
        "Check the function name; ARNs and partial ARNs are also accepted.",
    ),
    (
        "ServiceException",
        "The Lambda service had an internal error. Retry the command.",
    ),
];

/// Get a user-friendly suggestion for a known error code.
fn suggestion_for_code(code: &str) -> Option<String> {
    SUGGESTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| (*s).to_string())
}
