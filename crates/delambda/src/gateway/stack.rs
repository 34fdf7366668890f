//! Stack gateway over [`StackOperations`]

use crate::aws::StackOperations;
use crate::error::TeardownError;
use delambda_common::defaults::LAMBDA_FUNCTION_RESOURCE_TYPE;
use tracing::debug;

pub struct StackGateway<S> {
    stacks: S,
}

impl<S: StackOperations> StackGateway<S> {
    pub fn new(stacks: S) -> Self {
        Self { stacks }
    }

    /// Physical names of the stack's Lambda functions, in listing order
    pub async fn list_function_members(&self, stack: &str) -> Result<Vec<String>, TeardownError> {
        let resources = self
            .stacks
            .list_stack_resources(stack)
            .await
            .map_err(|e| TeardownError::gateway("list resources of stack", stack, e))?;

        let members: Vec<String> = resources
            .into_iter()
            .filter(|r| r.resource_type == LAMBDA_FUNCTION_RESOURCE_TYPE)
            .filter_map(|r| r.physical_id)
            .collect();

        debug!(stack = %stack, count = members.len(), "Resolved stack functions");
        Ok(members)
    }
}
