//! CloudFormation stack resource listing

use super::context::{AwsContext, FromAwsContext};
use super::error::{AwsError, classify_sdk_error};
use aws_sdk_cloudformation::Client;
use std::future::Future;
use tracing::debug;

/// One resource summary from `ListStackResources`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackResource {
    pub logical_id: String,
    /// Missing while the resource is still being created, or after it failed to create
    pub physical_id: Option<String>,
    pub resource_type: String,
}

impl StackResource {
    pub fn new(
        logical_id: impl Into<String>,
        physical_id: Option<&str>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            physical_id: physical_id.map(str::to_string),
            resource_type: resource_type.into(),
        }
    }
}

/// Trait for CloudFormation operations that can be faked in tests
pub trait StackOperations: Send + Sync {
    /// Every resource of the stack, following pagination
    fn list_stack_resources(
        &self,
        stack: &str,
    ) -> impl Future<Output = Result<Vec<StackResource>, AwsError>> + Send;
}

/// CloudFormation client backed by the AWS SDK
pub struct StackClient {
    client: Client,
}

impl FromAwsContext for StackClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.cloudformation_client(),
        }
    }
}

impl StackClient {
    /// Create a new CloudFormation client
    pub async fn new(region: &str) -> Self {
        let ctx = AwsContext::new(region).await;
        Self::from_context(&ctx)
    }
}

impl StackOperations for StackClient {
    async fn list_stack_resources(&self, stack: &str) -> Result<Vec<StackResource>, AwsError> {
        let mut resources = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_stack_resources()
                .stack_name(stack)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| classify_sdk_error(&e))?;

            resources.extend(response.stack_resource_summaries().iter().map(|s| {
                StackResource::new(
                    s.logical_resource_id().unwrap_or_default(),
                    s.physical_resource_id().filter(|id| !id.is_empty()),
                    s.resource_type().unwrap_or_default(),
                )
            }));

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(stack = %stack, count = resources.len(), "Listed stack resources");
        Ok(resources)
    }
}
