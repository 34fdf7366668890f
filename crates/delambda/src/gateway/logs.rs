//! Log group gateway over [`LogsOperations`]

use crate::aws::LogsOperations;
use crate::error::TeardownError;
use delambda_common::LogGroup;
use tracing::debug;

pub struct LogGroupGateway<G> {
    logs: G,
}

impl<G: LogsOperations> LogGroupGateway<G> {
    pub fn new(logs: G) -> Self {
        Self { logs }
    }

    /// Whether a log group with exactly this name exists
    pub async fn exists(&self, log_group: &LogGroup) -> Result<bool, TeardownError> {
        let names = self
            .logs
            .describe_log_groups(log_group.name())
            .await
            .map_err(|e| TeardownError::gateway("describe log groups for", log_group.name(), e))?;
        Ok(names.iter().any(|n| n == log_group.name()))
    }

    /// Delete the log group. A group that does not exist counts as deleted.
    pub async fn delete(&self, log_group: &LogGroup) -> Result<(), TeardownError> {
        match self.logs.delete_log_group(log_group.name()).await {
            Ok(()) => {
                debug!(log_group = %log_group, "Deleted log group");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!(log_group = %log_group, "Log group already absent");
                Ok(())
            }
            Err(e) => Err(TeardownError::gateway(
                "delete log group",
                log_group.name(),
                e,
            )),
        }
    }
}
