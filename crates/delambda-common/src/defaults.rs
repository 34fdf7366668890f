//! Default values shared across delambda components

use std::time::Duration;

/// Interval between function state polls after a configuration update
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Maximum number of state polls before giving up on an update
pub const MAX_POLL_ATTEMPTS: u32 = 60;

/// Log group prefix Lambda uses for function logs
pub const LAMBDA_LOG_GROUP_PREFIX: &str = "/aws/lambda/";

/// CloudFormation resource type of a Lambda function
pub const LAMBDA_FUNCTION_RESOURCE_TYPE: &str = "AWS::Lambda::Function";
