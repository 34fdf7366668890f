//! Shared test utilities for delambda
//!
//! Helpers for the live AWS integration tests, kept out of the main crate
//! so they can be used from `tests/` without circular dependencies.
//!
//! ## Modules
//!
//! - [`aws`]: AWS region detection and unique resource naming

pub mod aws;

pub use aws::{get_test_region, test_function_name, test_run_id};
