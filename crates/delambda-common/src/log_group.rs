//! CloudWatch Logs log group naming

use crate::defaults::LAMBDA_LOG_GROUP_PREFIX;
use std::fmt;

/// A CloudWatch Logs log group, identified by name only
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogGroup {
    name: String,
}

impl LogGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The log group Lambda writes to for the given function
    pub fn for_function(function_name: &str) -> Self {
        Self {
            name: format!("{LAMBDA_LOG_GROUP_PREFIX}{function_name}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for LogGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
