//! Configuration types for the CLI

use crate::aws::AwsContext;

/// AWS connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsConfig {
    /// AWS region (falls back to the SDK's usual resolution when unset)
    pub region: Option<String>,
    /// Shared config profile name
    pub profile: Option<String>,
}

impl AwsConfig {
    /// Load the SDK configuration these settings describe
    pub async fn load(&self) -> AwsContext {
        AwsContext::with_profile(self.region.as_deref(), self.profile.as_deref()).await
    }
}

/// Settings shared by every subcommand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub aws: AwsConfig,
    /// Debug-level logging for this crate
    pub verbose: bool,
}

impl CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    ///
    /// The AWS SDK is capped at `warn` either way.
    pub fn default_log_directives(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        format!(
            "delambda={level},aws_config=warn,aws_sdk_lambda=warn,aws_sdk_cloudformation=warn,aws_sdk_cloudwatchlogs=warn,aws_smithy_runtime=warn"
        )
    }
}

/// What a `detach` or `delete` command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Function(String),
    Stack(String),
}

impl Target {
    /// Exactly one of the two must be given
    pub fn from_flags(lambda: Option<String>, stack: Option<String>) -> Option<Self> {
        match (lambda, stack) {
            (Some(name), None) => Some(Target::Function(name)),
            (None, Some(stack)) => Some(Target::Stack(stack)),
            _ => None,
        }
    }
}
