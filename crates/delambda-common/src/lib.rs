//! delambda-common - Shared domain types
//!
//! This crate holds the domain model used by the teardown workflows,
//! and has no AWS SDK dependencies.
//!
//! ## Modules
//!
//! - [`defaults`]: Polling constants and naming conventions
//! - [`function`]: Lambda function and VPC attachment model
//! - [`log_group`]: CloudWatch Logs log group naming
//! - [`options`]: Teardown option flags

pub mod defaults;
pub mod function;
pub mod log_group;
pub mod options;

// Re-export commonly used types
pub use function::{Function, FunctionState, LastUpdateStatus, NetworkAttachment};
pub use log_group::LogGroup;
pub use options::TeardownOptions;
