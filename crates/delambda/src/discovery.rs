//! Read-only function discovery

use crate::aws::{LambdaOperations, StackOperations};
use crate::error::TeardownError;
use crate::gateway::{FunctionGateway, StackGateway};
use delambda_common::Function;
use tracing::debug;

/// Every function in the account and region
pub async fn list_functions<L: LambdaOperations>(
    functions: &FunctionGateway<L>,
) -> Result<Vec<Function>, TeardownError> {
    functions.find_all().await
}

/// Current configuration of every Lambda function in `stack`.
///
/// Fails on an empty stack and on the first member that cannot be fetched.
pub async fn list_stack_functions<L, S>(
    functions: &FunctionGateway<L>,
    stacks: &StackGateway<S>,
    stack: &str,
) -> Result<Vec<Function>, TeardownError>
where
    L: LambdaOperations,
    S: StackOperations,
{
    let names = stacks.list_function_members(stack).await?;
    if names.is_empty() {
        return Err(TeardownError::EmptyGroup {
            group: stack.to_string(),
        });
    }

    let mut found = Vec::with_capacity(names.len());
    for name in &names {
        found.push(functions.find_by_name(name).await?);
    }

    debug!(stack = %stack, count = found.len(), "Listed stack functions");
    Ok(found)
}
