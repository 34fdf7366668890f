//! Resource gateways
//!
//! Each gateway wraps one provider trait from [`crate::aws`] and adds the
//! decision logic the workflows rely on: attachment checks and update polling
//! for functions, idempotent delete for log groups, resource-type filtering
//! for stacks.

pub mod function;
pub mod logs;
pub mod stack;

pub use function::FunctionGateway;
pub use logs::LogGroupGateway;
pub use stack::StackGateway;
