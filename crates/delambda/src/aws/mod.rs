//! AWS client modules
//!
//! Thin wrappers around the SDK clients the teardown workflows need:
//! - Lambda: list, fetch, reconfigure and delete functions
//! - CloudWatch Logs: find and delete log groups
//! - CloudFormation: list the resources of a stack
//!
//! Each wrapper implements an `*Operations` trait so the workflows can run
//! against in-memory fakes in tests.

pub mod context;
pub mod error;
pub mod lambda;
pub mod logs;
pub mod stack;

pub use context::{AwsContext, FromAwsContext};
pub use error::{AwsError, classify_aws_error, classify_sdk_error};
pub use lambda::{LambdaClient, LambdaOperations, VpcConfigUpdate};
pub use logs::{LogsClient, LogsOperations};
pub use stack::{StackClient, StackOperations, StackResource};
