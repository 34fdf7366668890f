//! Function gateway: attachment checks and update polling over [`LambdaOperations`]

use crate::aws::{LambdaOperations, VpcConfigUpdate};
use crate::error::TeardownError;
use crate::wait::{PollConfig, UpdateProgress, wait_for_update};
use delambda_common::Function;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct FunctionGateway<L> {
    lambda: L,
    poll: PollConfig,
    cancel: Option<CancellationToken>,
}

impl<L: LambdaOperations> FunctionGateway<L> {
    pub fn new(lambda: L) -> Self {
        Self {
            lambda,
            poll: PollConfig::default(),
            cancel: None,
        }
    }

    /// Override the update polling cadence
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Stop update polling when `token` fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Every function in the account and region.
    ///
    /// A failure on any page fails the whole call.
    pub async fn find_all(&self) -> Result<Vec<Function>, TeardownError> {
        self.lambda
            .list_functions()
            .await
            .map_err(|e| TeardownError::gateway("list", "functions", e))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Function, TeardownError> {
        self.lambda
            .get_function(name)
            .await
            .map_err(|e| TeardownError::from_aws("get function", name, e))
    }

    /// Turn off IPv6 dual-stack while keeping the attachment, then wait for
    /// the update to settle.
    pub async fn disable_secondary_addressing(&self, name: &str) -> Result<(), TeardownError> {
        let function = self.find_by_name(name).await?;
        let attachment = function
            .attachment()
            .ok_or_else(|| TeardownError::NotAttached {
                name: name.to_string(),
            })?;

        debug!(function = %name, "Disabling IPv6 dual-stack");
        self.apply(name, VpcConfigUpdate::without_ipv6(attachment), "disable IPv6 for")
            .await
    }

    /// Clear subnets and security groups, then wait for the update to settle.
    pub async fn detach_network(&self, name: &str) -> Result<(), TeardownError> {
        let function = self.find_by_name(name).await?;
        if !function.is_attached_to_vpc() {
            return Err(TeardownError::NotAttached {
                name: name.to_string(),
            });
        }

        debug!(function = %name, "Detaching VPC");
        self.apply(name, VpcConfigUpdate::detached(), "detach VPC from")
            .await
    }

    pub async fn delete(&self, name: &str) -> Result<(), TeardownError> {
        debug!(function = %name, "Deleting function");
        self.lambda
            .delete_function(name)
            .await
            .map_err(|e| TeardownError::from_aws("delete function", name, e))
    }

    /// Block until the function's last update completes
    pub async fn wait_until_updated(&self, name: &str) -> Result<(), TeardownError> {
        let attempts = wait_for_update(self.poll, self.cancel.as_ref(), name, move || async move {
            let function = self.find_by_name(name).await?;
            Ok(UpdateProgress::of(&function))
        })
        .await?;
        debug!(function = %name, attempts, "Function ready");
        Ok(())
    }

    async fn apply(
        &self,
        name: &str,
        update: VpcConfigUpdate,
        operation: &'static str,
    ) -> Result<(), TeardownError> {
        self.lambda
            .update_vpc_config(name, update)
            .await
            .map_err(|e| TeardownError::from_aws(operation, name, e))?;
        self.wait_until_updated(name).await
    }
}
