//! delambda - safe teardown of VPC-attached AWS Lambda functions
//!
//! Lambda functions attached to a VPC cannot simply be deleted: the network
//! attachment (and possibly IPv6 dual-stack) has to be unwound first, and each
//! change completes asynchronously. This crate drives that sequence for a
//! single function or for every function in a CloudFormation stack.
//!
//! ## Modules
//!
//! - [`aws`]: SDK client wrappers behind the `*Operations` traits
//! - [`gateway`]: Attachment checks, update polling and idempotent deletes
//! - [`teardown`]: The single-function and stack-wide workflows
//! - [`discovery`]: Read-only function listing
//! - [`output`]: Table and JSON rendering for listings
//! - [`wait`]: Fixed-interval update polling with cancellation

pub mod aws;
pub mod config;
pub mod discovery;
pub mod error;
pub mod gateway;
pub mod output;
pub mod teardown;
pub mod wait;

#[cfg(test)]
mod testing;

pub use error::TeardownError;
pub use teardown::{TeardownEngine, TeardownSummary};
