//! Single-function teardown
//!
//! `Start -> [DisableIpv6] -> [DetachNetwork] -> Delete -> [DeleteLogs] -> Done`
//!
//! The bracketed steps depend on [`TeardownOptions`] and on whether the
//! function is attached to a VPC at the time each step runs. A missing
//! attachment is never an error on the optional steps.

use super::progress::{ProgressSink, TeardownEvent};
use crate::aws::{
    AwsContext, FromAwsContext, LambdaClient, LambdaOperations, LogsClient, LogsOperations,
    StackClient, StackOperations,
};
use crate::error::TeardownError;
use crate::gateway::{FunctionGateway, LogGroupGateway, StackGateway};
use delambda_common::{LogGroup, TeardownOptions};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Drives teardown workflows against a set of gateways, narrating to `P`.
pub struct TeardownEngine<L, G, S, P> {
    pub(super) functions: FunctionGateway<L>,
    pub(super) logs: LogGroupGateway<G>,
    pub(super) stacks: StackGateway<S>,
    pub(super) progress: P,
    pub(super) cancel: CancellationToken,
}

impl<P: ProgressSink> TeardownEngine<LambdaClient, LogsClient, StackClient, P> {
    /// Engine backed by the real AWS services
    pub fn from_context(ctx: &AwsContext, progress: P) -> Self {
        Self::new(
            FunctionGateway::new(LambdaClient::from_context(ctx)),
            LogGroupGateway::new(LogsClient::from_context(ctx)),
            StackGateway::new(StackClient::from_context(ctx)),
            progress,
        )
    }
}

impl<L, G, S, P> TeardownEngine<L, G, S, P>
where
    L: LambdaOperations,
    G: LogsOperations,
    S: StackOperations,
    P: ProgressSink,
{
    pub fn new(
        functions: FunctionGateway<L>,
        logs: LogGroupGateway<G>,
        stacks: StackGateway<S>,
        progress: P,
    ) -> Self {
        Self {
            functions,
            logs,
            stacks,
            progress,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop polling and skip remaining batch members once `token` fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.functions = self.functions.with_cancellation(token.clone());
        self.cancel = token;
        self
    }

    pub fn functions(&self) -> &FunctionGateway<L> {
        &self.functions
    }

    pub fn stacks(&self) -> &StackGateway<S> {
        &self.stacks
    }

    pub(super) fn report(&self, event: TeardownEvent) {
        self.progress.report(event);
    }

    /// Tear down one function. The first fatal error aborts the workflow,
    /// possibly leaving the function half torn down.
    pub async fn teardown_one(
        &self,
        name: &str,
        options: TeardownOptions,
    ) -> Result<(), TeardownError> {
        debug!(function = %name, ?options, "Tearing down function");

        if options.detach_network {
            if options.should_disable_ipv6() {
                self.disable_ipv6_if_attached(name).await?;
            }

            match self.functions.detach_network(name).await {
                Ok(()) => self.report(TeardownEvent::NetworkDetached {
                    name: name.to_string(),
                }),
                Err(e) if e.is_not_attached() => self.report(TeardownEvent::AlreadyDetached {
                    name: name.to_string(),
                }),
                Err(e) => return Err(e),
            }
        }

        self.report(TeardownEvent::Deleting {
            name: name.to_string(),
        });
        self.functions.delete(name).await?;
        self.report(TeardownEvent::Deleted {
            name: name.to_string(),
        });

        if options.delete_logs {
            self.delete_log_group_inner(&LogGroup::for_function(name))
                .await?;
        } else {
            self.report(TeardownEvent::LogsSkipped);
        }

        Ok(())
    }

    /// Detach one function from its VPC without deleting it.
    ///
    /// Unlike [`teardown_one`](Self::teardown_one), a function that is not
    /// attached is an error here.
    pub async fn detach_one(&self, name: &str, disable_ipv6: bool) -> Result<(), TeardownError> {
        debug!(function = %name, disable_ipv6, "Detaching function from VPC");

        if disable_ipv6 {
            self.disable_ipv6_if_attached(name).await?;
        }

        self.functions.detach_network(name).await?;
        self.report(TeardownEvent::NetworkDetached {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Delete a log group by name. Absent groups count as deleted.
    pub async fn delete_log_group(&self, name: &str) -> Result<(), TeardownError> {
        self.delete_log_group_inner(&LogGroup::new(name)).await
    }

    async fn delete_log_group_inner(&self, log_group: &LogGroup) -> Result<(), TeardownError> {
        self.report(TeardownEvent::DeletingLogs {
            log_group: log_group.to_string(),
        });
        self.logs.delete(log_group).await?;
        self.report(TeardownEvent::LogsDeleted {
            log_group: log_group.to_string(),
        });
        Ok(())
    }

    async fn disable_ipv6_if_attached(&self, name: &str) -> Result<(), TeardownError> {
        match self.functions.disable_secondary_addressing(name).await {
            Ok(()) => {
                self.report(TeardownEvent::Ipv6Disabled {
                    name: name.to_string(),
                });
                Ok(())
            }
            Err(e) if e.is_not_attached() => {
                self.report(TeardownEvent::Ipv6SkippedNotAttached {
                    name: name.to_string(),
                });
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
