//! Lambda function management

use super::context::{AwsContext, FromAwsContext};
use super::error::{AwsError, classify_sdk_error};
use aws_sdk_lambda::{
    Client,
    types::{FunctionConfiguration, VpcConfig},
};
use delambda_common::{Function, FunctionState, LastUpdateStatus, NetworkAttachment};
use std::future::Future;
use tracing::debug;

/// Requested VPC configuration for an update.
///
/// Lambda treats empty subnet and security group lists as "detach".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcConfigUpdate {
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
    pub ipv6_allowed_for_dual_stack: bool,
}

impl VpcConfigUpdate {
    /// Remove the function from its VPC
    pub fn detached() -> Self {
        Self {
            subnet_ids: Vec::new(),
            security_group_ids: Vec::new(),
            ipv6_allowed_for_dual_stack: false,
        }
    }

    /// Keep the current attachment but turn off IPv6 dual-stack
    pub fn without_ipv6(attachment: &NetworkAttachment) -> Self {
        Self {
            subnet_ids: attachment.subnet_ids.clone(),
            security_group_ids: attachment.security_group_ids.clone(),
            ipv6_allowed_for_dual_stack: false,
        }
    }

    /// Whether this update removes the attachment entirely
    pub fn is_detach(&self) -> bool {
        self.subnet_ids.is_empty() && self.security_group_ids.is_empty()
    }
}

/// Trait for Lambda operations that can be faked in tests.
///
/// This is the raw provider seam; attachment checks and update polling live
/// in [`crate::gateway::FunctionGateway`].
pub trait LambdaOperations: Send + Sync {
    /// List every function in the account and region, following pagination
    fn list_functions(&self) -> impl Future<Output = Result<Vec<Function>, AwsError>> + Send;

    /// Fetch the current configuration of one function
    fn get_function(&self, name: &str) -> impl Future<Output = Result<Function, AwsError>> + Send;

    /// Replace the function's VPC configuration
    fn update_vpc_config(
        &self,
        name: &str,
        update: VpcConfigUpdate,
    ) -> impl Future<Output = Result<(), AwsError>> + Send;

    /// Delete the function
    fn delete_function(&self, name: &str) -> impl Future<Output = Result<(), AwsError>> + Send;
}

/// Lambda client backed by the AWS SDK
pub struct LambdaClient {
    client: Client,
}

impl FromAwsContext for LambdaClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.lambda_client(),
        }
    }
}

impl LambdaClient {
    /// Create a new Lambda client (loads AWS config from environment)
    pub async fn new(region: &str) -> Self {
        let ctx = AwsContext::new(region).await;
        Self::from_context(&ctx)
    }
}

impl LambdaOperations for LambdaClient {
    async fn list_functions(&self) -> Result<Vec<Function>, AwsError> {
        let mut functions = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let response = self
                .client
                .list_functions()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| classify_sdk_error(&e))?;

            functions.extend(response.functions().iter().map(function_from_configuration));

            match response.next_marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        debug!(count = functions.len(), "Listed Lambda functions");
        Ok(functions)
    }

    async fn get_function(&self, name: &str) -> Result<Function, AwsError> {
        let response = self
            .client
            .get_function()
            .function_name(name)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        response
            .configuration()
            .map(function_from_configuration)
            .ok_or_else(|| AwsError::Sdk {
                code: None,
                message: format!("GetFunction returned no configuration for {name}"),
            })
    }

    async fn update_vpc_config(&self, name: &str, update: VpcConfigUpdate) -> Result<(), AwsError> {
        debug!(
            function = %name,
            subnets = update.subnet_ids.len(),
            security_groups = update.security_group_ids.len(),
            ipv6 = update.ipv6_allowed_for_dual_stack,
            "Updating VPC configuration"
        );

        let vpc_config = VpcConfig::builder()
            .set_subnet_ids(Some(update.subnet_ids))
            .set_security_group_ids(Some(update.security_group_ids))
            .ipv6_allowed_for_dual_stack(update.ipv6_allowed_for_dual_stack)
            .build();

        self.client
            .update_function_configuration()
            .function_name(name)
            .vpc_config(vpc_config)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        Ok(())
    }

    async fn delete_function(&self, name: &str) -> Result<(), AwsError> {
        self.client
            .delete_function()
            .function_name(name)
            .send()
            .await
            .map_err(|e| classify_sdk_error(&e))?;

        Ok(())
    }
}

/// Convert an SDK function configuration into the domain model
fn function_from_configuration(cfg: &FunctionConfiguration) -> Function {
    let network = cfg.vpc_config().map(|vpc| NetworkAttachment {
        vpc_id: vpc
            .vpc_id()
            .filter(|id| !id.is_empty())
            .map(|id| id.to_string()),
        subnet_ids: vpc.subnet_ids().to_vec(),
        security_group_ids: vpc.security_group_ids().to_vec(),
        ipv6_allowed_for_dual_stack: vpc.ipv6_allowed_for_dual_stack().unwrap_or(false),
    });

    Function {
        name: cfg.function_name().unwrap_or_default().to_string(),
        runtime: cfg.runtime().map(|r| r.as_str().to_string()),
        state: cfg
            .state()
            .map_or(FunctionState::Unknown(String::new()), |s| {
                FunctionState::from(s.as_str())
            }),
        last_update_status: cfg
            .last_update_status()
            .map_or(LastUpdateStatus::Unknown(String::new()), |s| {
                LastUpdateStatus::from(s.as_str())
            }),
        state_reason_code: cfg.state_reason_code().map(|c| c.as_str().to_string()),
        network,
    }
}
