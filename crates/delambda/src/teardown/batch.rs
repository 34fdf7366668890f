//! Stack-wide teardown
//!
//! Members are processed one at a time. A member's failure ends that
//! member's processing and is tallied; it never stops the batch. The summary
//! is reported before the aggregate error is returned.

use super::engine::TeardownEngine;
use super::progress::{ProgressSink, TeardownEvent, TeardownStep};
use super::summary::TeardownSummary;
use crate::aws::{LambdaOperations, LogsOperations, StackOperations};
use crate::error::TeardownError;
use delambda_common::{Function, LogGroup, TeardownOptions};
use tracing::{debug, warn};

/// What to do with each member of a batch
#[derive(Debug, Clone, Copy)]
enum GroupMode {
    Teardown(TeardownOptions),
    DetachOnly { disable_ipv6: bool },
}

type StepResult = Result<(), (TeardownStep, TeardownError)>;

impl<L, G, S, P> TeardownEngine<L, G, S, P>
where
    L: LambdaOperations,
    G: LogsOperations,
    S: StackOperations,
    P: ProgressSink,
{
    /// Tear down every Lambda function in `stack`.
    ///
    /// Log cleanup failures are reported as warnings and do not count against
    /// the member.
    pub async fn teardown_group(
        &self,
        stack: &str,
        options: TeardownOptions,
    ) -> Result<TeardownSummary, TeardownError> {
        self.run_group(stack, GroupMode::Teardown(options)).await
    }

    /// Detach every Lambda function in `stack` from its VPC.
    ///
    /// Members that are not attached count as succeeded.
    pub async fn detach_group(
        &self,
        stack: &str,
        disable_ipv6: bool,
    ) -> Result<TeardownSummary, TeardownError> {
        self.run_group(stack, GroupMode::DetachOnly { disable_ipv6 })
            .await
    }

    /// Resolve the stack's functions, failing on an empty stack
    async fn resolve_group(&self, stack: &str) -> Result<Vec<String>, TeardownError> {
        let members = self.stacks.list_function_members(stack).await?;
        if members.is_empty() {
            return Err(TeardownError::EmptyGroup {
                group: stack.to_string(),
            });
        }
        Ok(members)
    }

    async fn run_group(
        &self,
        stack: &str,
        mode: GroupMode,
    ) -> Result<TeardownSummary, TeardownError> {
        let members = self.resolve_group(stack).await?;
        debug!(stack = %stack, count = members.len(), ?mode, "Processing stack");
        self.report(TeardownEvent::GroupResolved {
            group: stack.to_string(),
            count: members.len(),
        });

        let mut summary = TeardownSummary::new(members.len());

        for name in &members {
            if self.cancel.is_cancelled() {
                let err = TeardownError::Cancelled { name: name.clone() };
                self.report(TeardownEvent::MemberCancelled { name: name.clone() });
                summary.record_failure(name, &err);
                continue;
            }

            self.report(TeardownEvent::MemberStarted { name: name.clone() });

            let result = match mode {
                GroupMode::Teardown(options) => self.teardown_member(name, options).await,
                GroupMode::DetachOnly { disable_ipv6 } => {
                    self.detach_member(name, disable_ipv6).await
                }
            };

            match result {
                Ok(()) => {
                    self.report(TeardownEvent::MemberSucceeded { name: name.clone() });
                    summary.record_success();
                }
                Err((step, err)) => {
                    warn!(function = %name, %step, error = %err.full_message(), "Member failed");
                    self.report(TeardownEvent::StepFailed {
                        name: name.clone(),
                        step,
                        error: err.full_message(),
                    });
                    summary.record_failure(name, &err);
                }
            }
        }

        self.report(TeardownEvent::Summary(summary.clone()));
        summary.into_result()
    }

    async fn fetch_member(&self, name: &str) -> Result<Function, (TeardownStep, TeardownError)> {
        self.functions
            .find_by_name(name)
            .await
            .map_err(|e| (TeardownStep::Fetch, e))
    }

    async fn teardown_member(&self, name: &str, options: TeardownOptions) -> StepResult {
        let function = self.fetch_member(name).await?;

        if options.detach_network {
            self.unwind_network(name, &function, options.disable_ipv6).await?;
        }

        self.report(TeardownEvent::Deleting {
            name: name.to_string(),
        });
        self.functions
            .delete(name)
            .await
            .map_err(|e| (TeardownStep::Delete, e))?;
        self.report(TeardownEvent::Deleted {
            name: name.to_string(),
        });

        if options.delete_logs {
            // The function is gone; log cleanup is best-effort from here
            let log_group = LogGroup::for_function(name);
            self.report(TeardownEvent::DeletingLogs {
                log_group: log_group.to_string(),
            });
            match self.logs.delete(&log_group).await {
                Ok(()) => self.report(TeardownEvent::LogsDeleted {
                    log_group: log_group.to_string(),
                }),
                Err(e) => {
                    warn!(log_group = %log_group, error = %e.full_message(), "Log group cleanup failed");
                    self.report(TeardownEvent::LogsWarning {
                        log_group: log_group.to_string(),
                        error: e.full_message(),
                    });
                }
            }
        } else {
            self.report(TeardownEvent::LogsSkipped);
        }

        Ok(())
    }

    async fn detach_member(&self, name: &str, disable_ipv6: bool) -> StepResult {
        let function = self.fetch_member(name).await?;
        self.unwind_network(name, &function, disable_ipv6).await
    }

    /// Network steps gated on the attachment seen by the member's fetch
    async fn unwind_network(&self, name: &str, function: &Function, disable_ipv6: bool) -> StepResult {
        if !function.is_attached_to_vpc() {
            self.report(TeardownEvent::AlreadyDetached {
                name: name.to_string(),
            });
            return Ok(());
        }

        if disable_ipv6 {
            if function.has_ipv6_enabled() {
                match self.functions.disable_secondary_addressing(name).await {
                    Ok(()) => self.report(TeardownEvent::Ipv6Disabled {
                        name: name.to_string(),
                    }),
                    Err(e) if e.is_not_attached() => {
                        self.report(TeardownEvent::Ipv6SkippedNotAttached {
                            name: name.to_string(),
                        })
                    }
                    Err(e) => return Err((TeardownStep::DisableIpv6, e)),
                }
            } else {
                self.report(TeardownEvent::Ipv6NotEnabled {
                    name: name.to_string(),
                });
            }
        }

        match self.functions.detach_network(name).await {
            Ok(()) => self.report(TeardownEvent::NetworkDetached {
                name: name.to_string(),
            }),
            // Detached by someone else since the fetch
            Err(e) if e.is_not_attached() => self.report(TeardownEvent::AlreadyDetached {
                name: name.to_string(),
            }),
            Err(e) => return Err((TeardownStep::Detach, e)),
        }

        Ok(())
    }
}
