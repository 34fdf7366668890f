//! Teardown option flags

/// Which optional teardown steps to run.
///
/// Passed by value into every workflow entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownOptions {
    /// Detach the function from its VPC before deleting
    pub detach_network: bool,
    /// Disable IPv6 dual-stack before detaching (only with `detach_network`)
    pub disable_ipv6: bool,
    /// Delete the function's log group after deleting the function
    pub delete_logs: bool,
}

impl TeardownOptions {
    /// Every step enabled
    pub fn full() -> Self {
        Self {
            detach_network: true,
            disable_ipv6: true,
            delete_logs: true,
        }
    }

    /// Only the VPC steps, no deletion of logs
    pub fn detach_only(disable_ipv6: bool) -> Self {
        Self {
            detach_network: true,
            disable_ipv6,
            delete_logs: false,
        }
    }

    /// Whether the IPv6 step runs at all
    pub fn should_disable_ipv6(&self) -> bool {
        self.detach_network && self.disable_ipv6
    }
}

impl Default for TeardownOptions {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv6_requires_detach() {
        let opts = TeardownOptions {
            detach_network: false,
            disable_ipv6: true,
            delete_logs: false,
        };
        assert!(!opts.should_disable_ipv6());
        assert!(TeardownOptions::full().should_disable_ipv6());
        assert!(!TeardownOptions::detach_only(false).should_disable_ipv6());
    }
}
