//! Lambda function domain model
//!
//! A [`Function`] is a snapshot of the provider's view of a function at the
//! time it was fetched. Snapshots are never cached: every workflow step
//! re-fetches before mutating.

use serde::{Serialize, Serializer};
use std::fmt;

/// Lifecycle state of a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionState {
    Pending,
    Active,
    Inactive,
    Failed,
    /// A state this tool does not know about
    Unknown(String),
}

impl FunctionState {
    pub fn as_str(&self) -> &str {
        match self {
            FunctionState::Pending => "Pending",
            FunctionState::Active => "Active",
            FunctionState::Inactive => "Inactive",
            FunctionState::Failed => "Failed",
            FunctionState::Unknown(s) => s,
        }
    }
}

impl From<&str> for FunctionState {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => FunctionState::Pending,
            "Active" => FunctionState::Active,
            "Inactive" => FunctionState::Inactive,
            "Failed" => FunctionState::Failed,
            other => FunctionState::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for FunctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FunctionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Status of the most recent configuration update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastUpdateStatus {
    Successful,
    Failed,
    InProgress,
    Unknown(String),
}

impl LastUpdateStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LastUpdateStatus::Successful => "Successful",
            LastUpdateStatus::Failed => "Failed",
            LastUpdateStatus::InProgress => "InProgress",
            LastUpdateStatus::Unknown(s) => s,
        }
    }
}

impl From<&str> for LastUpdateStatus {
    fn from(s: &str) -> Self {
        match s {
            "Successful" => LastUpdateStatus::Successful,
            "Failed" => LastUpdateStatus::Failed,
            "InProgress" => LastUpdateStatus::InProgress,
            other => LastUpdateStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for LastUpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LastUpdateStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// VPC binding of a function.
///
/// Owned by its [`Function`]; it only changes as a side effect of updating the
/// function's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkAttachment {
    pub vpc_id: Option<String>,
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
    pub ipv6_allowed_for_dual_stack: bool,
}

impl NetworkAttachment {
    /// An attachment only counts when it references at least one subnet
    pub fn has_subnets(&self) -> bool {
        !self.subnet_ids.is_empty()
    }
}

/// Lambda function snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: String,
    /// Absent for container image functions
    pub runtime: Option<String>,
    pub state: FunctionState,
    pub last_update_status: LastUpdateStatus,
    /// Machine-readable reason code reported alongside the state
    pub state_reason_code: Option<String>,
    pub network: Option<NetworkAttachment>,
}

impl Function {
    /// Create an active function with no VPC attachment
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runtime: None,
            state: FunctionState::Active,
            last_update_status: LastUpdateStatus::Successful,
            state_reason_code: None,
            network: None,
        }
    }

    /// Set the runtime identifier
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    /// Set the VPC attachment
    pub fn with_network(mut self, network: NetworkAttachment) -> Self {
        self.network = Some(network);
        self
    }

    /// Check if the function is attached to a VPC (present and has subnets)
    pub fn is_attached_to_vpc(&self) -> bool {
        self.network.as_ref().is_some_and(NetworkAttachment::has_subnets)
    }

    /// Check if IPv6 dual-stack is enabled on the attachment
    pub fn has_ipv6_enabled(&self) -> bool {
        self.network
            .as_ref()
            .is_some_and(|n| n.ipv6_allowed_for_dual_stack)
    }

    /// The attachment, if the function is attached to a VPC
    pub fn attachment(&self) -> Option<&NetworkAttachment> {
        self.network.as_ref().filter(|n| n.has_subnets())
    }

    /// Active with a successful last update
    pub fn is_update_complete(&self) -> bool {
        self.state == FunctionState::Active
            && self.last_update_status == LastUpdateStatus::Successful
    }

    /// Either the function or its last update has failed
    pub fn is_update_failed(&self) -> bool {
        self.state == FunctionState::Failed || self.last_update_status == LastUpdateStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vpc(subnets: &[&str], ipv6: bool) -> NetworkAttachment {
        NetworkAttachment {
            vpc_id: Some("vpc-123".to_string()),
            subnet_ids: subnets.iter().map(|s| s.to_string()).collect(),
            security_group_ids: vec!["sg-1".to_string()],
            ipv6_allowed_for_dual_stack: ipv6,
        }
    }

    #[test]
    fn test_no_network_is_not_attached() {
        let f = Function::new("fn");
        assert!(!f.is_attached_to_vpc());
        assert!(!f.has_ipv6_enabled());
        assert!(f.attachment().is_none());
    }

    #[test]
    fn test_empty_subnets_is_not_attached() {
        let f = Function::new("fn").with_network(vpc(&[], true));
        assert!(!f.is_attached_to_vpc());
        // The flag is still reported from the raw attachment
        assert!(f.has_ipv6_enabled());
        assert!(f.attachment().is_none());
    }

    #[test]
    fn test_subnets_is_attached() {
        let f = Function::new("fn").with_network(vpc(&["subnet-a"], false));
        assert!(f.is_attached_to_vpc());
        assert!(!f.has_ipv6_enabled());
        assert_eq!(f.attachment().map(|a| a.subnet_ids.len()), Some(1));
    }

    #[test]
    fn test_state_parsing() {
        assert_eq!(FunctionState::from("Active"), FunctionState::Active);
        assert_eq!(FunctionState::from("Failed"), FunctionState::Failed);
        assert_eq!(
            FunctionState::from("Deleting"),
            FunctionState::Unknown("Deleting".to_string())
        );
        assert_eq!(FunctionState::from("Deleting").as_str(), "Deleting");
        assert_eq!(
            LastUpdateStatus::from("InProgress"),
            LastUpdateStatus::InProgress
        );
    }

    #[test]
    fn test_update_terminal_conditions() {
        let mut f = Function::new("fn");
        assert!(f.is_update_complete());
        assert!(!f.is_update_failed());

        f.last_update_status = LastUpdateStatus::InProgress;
        assert!(!f.is_update_complete());
        assert!(!f.is_update_failed());

        f.state = FunctionState::Pending;
        f.last_update_status = LastUpdateStatus::Failed;
        assert!(f.is_update_failed());

        f.state = FunctionState::Failed;
        f.last_update_status = LastUpdateStatus::Successful;
        assert!(f.is_update_failed());
        assert!(!f.is_update_complete());
    }

    #[test]
    fn test_serializes_states_as_strings() {
        let f = Function::new("fn").with_runtime("python3.12");
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["state"], "Active");
        assert_eq!(json["last_update_status"], "Successful");
        assert_eq!(json["runtime"], "python3.12");
    }
}
