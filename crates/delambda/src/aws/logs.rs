//! CloudWatch Logs log group management

use super::context::{AwsContext, FromAwsContext};
use super::error::{AwsError, classify_sdk_error};
use aws_sdk_cloudwatchlogs::Client;
use std::future::Future;
use tracing::debug;

/// Trait for CloudWatch Logs operations that can be faked in tests
pub trait LogsOperations: Send + Sync {
    /// Names of every log group whose name starts with `prefix`
    fn describe_log_groups(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<String>, AwsError>> + Send;

    /// Delete a log group and all of its streams
    fn delete_log_group(&self, name: &str) -> impl Future<Output = Result<(), AwsError>> + Send;
}

/// CloudWatch Logs client backed by the AWS SDK
pub struct LogsClient {
    client: Client,
}

impl FromAwsContext for LogsClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.logs_client(),
        }
    }
}

impl LogsClient {
    /// Create a new logs client
    pub async fn new(region: &str) -> Self {
        let ctx = AwsContext::new(region).await;
        Self::from_context(&ctx)
    }
}

impl LogsOperations for LogsClient {
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>, AwsError> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .describe_log_groups()
                .log_group_name_prefix(prefix)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| classify_sdk_error(&e))?;

            names.extend(
                response
                    .log_groups()
                    .iter()
                    .filter_map(|g| g.log_group_name())
                    .map(|n| n.to_string()),
            );

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(prefix = %prefix, count = names.len(), "Described log groups");
        Ok(names)
    }

    async fn delete_log_group(&self, name: &str) -> Result<(), AwsError> {
        self.client
            .delete_log_group()
            .log_group_name(name)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        Ok(())
    }
}
