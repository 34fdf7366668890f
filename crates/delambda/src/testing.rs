//! In-memory fakes for the provider traits, shared by unit tests.
//!
//! Each fake is cheaply cloneable and shares its state, so a test can hand
//! one clone to the code under test and inspect another afterwards.

use crate::aws::{
    AwsError, LambdaOperations, LogsOperations, StackOperations, StackResource, VpcConfigUpdate,
};
use crate::gateway::{FunctionGateway, LogGroupGateway, StackGateway};
use crate::teardown::{ProgressSink, TeardownEngine, TeardownEvent};
use crate::wait::PollConfig;
use delambda_common::defaults::LAMBDA_FUNCTION_RESOURCE_TYPE;
use delambda_common::{Function, FunctionState, LastUpdateStatus, NetworkAttachment};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// One observed state after a configuration update
pub type PollStep = (FunctionState, LastUpdateStatus, Option<&'static str>);

/// A function attached to `vpc-test` with the given subnets
pub fn attached(name: &str, subnets: &[&str], ipv6: bool) -> Function {
    Function::new(name)
        .with_runtime("python3.12")
        .with_network(NetworkAttachment {
            vpc_id: Some("vpc-test".to_string()),
            subnet_ids: subnets.iter().map(|s| s.to_string()).collect(),
            security_group_ids: vec!["sg-test".to_string()],
            ipv6_allowed_for_dual_stack: ipv6,
        })
}

/// `pending` in-progress polls followed by success
pub fn pending_then_active(pending: usize) -> Vec<PollStep> {
    let mut steps = vec![(FunctionState::Pending, LastUpdateStatus::InProgress, None); pending];
    steps.push((FunctionState::Active, LastUpdateStatus::Successful, None));
    steps
}

/// A stack resource for a Lambda function whose physical id is `name`
pub fn lambda_resource(name: &str) -> StackResource {
    StackResource::new(name, Some(name), LAMBDA_FUNCTION_RESOURCE_TYPE)
}

/// Engine over clones of the given fakes, polling without delay
pub fn engine(
    lambda: &FakeLambda,
    logs: &FakeLogs,
    stacks: &FakeStack,
    sink: &RecordingSink,
) -> TeardownEngine<FakeLambda, FakeLogs, FakeStack, RecordingSink> {
    TeardownEngine::new(
        FunctionGateway::new(lambda.clone()).with_poll_config(PollConfig::immediate(60)),
        LogGroupGateway::new(logs.clone()),
        StackGateway::new(stacks.clone()),
        sink.clone(),
    )
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LambdaCall {
    List,
    Get(String),
    Update(String),
    Delete(String),
}

#[derive(Default)]
struct LambdaState {
    functions: BTreeMap<String, Function>,
    /// Applied to a function on each update
    update_scripts: HashMap<String, Vec<PollStep>>,
    /// Steps still to be observed by gets since the last update
    active_polls: HashMap<String, VecDeque<PollStep>>,
    fail_list: Option<AwsError>,
    fail_get: HashMap<String, AwsError>,
    fail_update: HashMap<String, AwsError>,
    fail_delete: HashMap<String, AwsError>,
    /// Gets left before the attachment disappears out from under us
    detach_after_gets: HashMap<String, usize>,
    calls: Vec<LambdaCall>,
    updates: Vec<(String, VpcConfigUpdate)>,
}

/// Fake Lambda service.
///
/// Updates are applied immediately. Without a script the function reads back
/// as `Active`/`Successful`; with one, each later get observes the next
/// scripted state and the last state sticks.
#[derive(Clone, Default)]
pub struct FakeLambda {
    state: Arc<Mutex<LambdaState>>,
}

impl FakeLambda {
    pub fn insert(&self, function: Function) {
        lock(&self.state)
            .functions
            .insert(function.name.clone(), function);
    }

    pub fn script_updates(&self, name: &str, steps: Vec<PollStep>) {
        lock(&self.state)
            .update_scripts
            .insert(name.to_string(), steps);
    }

    pub fn fail_list(&self, err: AwsError) {
        lock(&self.state).fail_list = Some(err);
    }

    pub fn fail_get(&self, name: &str, err: AwsError) {
        lock(&self.state).fail_get.insert(name.to_string(), err);
    }

    pub fn fail_update(&self, name: &str, err: AwsError) {
        lock(&self.state).fail_update.insert(name.to_string(), err);
    }

    pub fn fail_delete(&self, name: &str, err: AwsError) {
        lock(&self.state).fail_delete.insert(name.to_string(), err);
    }

    /// Drop the function's attachment right after its `gets`-th get, as if
    /// another client detached it concurrently
    pub fn detach_after_gets(&self, name: &str, gets: usize) {
        lock(&self.state)
            .detach_after_gets
            .insert(name.to_string(), gets);
    }

    pub fn get(&self, name: &str) -> Option<Function> {
        lock(&self.state).functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        lock(&self.state).functions.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.state).functions.is_empty()
    }

    /// Remaining function names, sorted
    pub fn names(&self) -> Vec<String> {
        lock(&self.state).functions.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<LambdaCall> {
        lock(&self.state).calls.clone()
    }

    pub fn updates(&self) -> Vec<(String, VpcConfigUpdate)> {
        lock(&self.state).updates.clone()
    }
}

fn not_found(name: &str) -> AwsError {
    AwsError::NotFound {
        message: format!("Function not found: {name}"),
    }
}

impl LambdaOperations for FakeLambda {
    async fn list_functions(&self) -> Result<Vec<Function>, AwsError> {
        let mut state = lock(&self.state);
        state.calls.push(LambdaCall::List);
        if let Some(err) = state.fail_list.clone() {
            return Err(err);
        }
        Ok(state.functions.values().cloned().collect())
    }

    async fn get_function(&self, name: &str) -> Result<Function, AwsError> {
        let mut state = lock(&self.state);
        state.calls.push(LambdaCall::Get(name.to_string()));
        if let Some(err) = state.fail_get.get(name) {
            return Err(err.clone());
        }

        let step = state.active_polls.get_mut(name).and_then(|q| q.pop_front());
        let function = state
            .functions
            .get_mut(name)
            .ok_or_else(|| not_found(name))?;
        if let Some((fn_state, status, reason)) = step {
            function.state = fn_state;
            function.last_update_status = status;
            function.state_reason_code = reason.map(str::to_string);
        }
        let snapshot = function.clone();

        let detach_now = match state.detach_after_gets.get_mut(name) {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            None => false,
        };
        if detach_now {
            state.detach_after_gets.remove(name);
            if let Some(function) = state.functions.get_mut(name) {
                function.network = None;
            }
        }
        Ok(snapshot)
    }

    async fn update_vpc_config(&self, name: &str, update: VpcConfigUpdate) -> Result<(), AwsError> {
        let mut state = lock(&self.state);
        state.calls.push(LambdaCall::Update(name.to_string()));
        if let Some(err) = state.fail_update.get(name) {
            return Err(err.clone());
        }

        let script = state.update_scripts.get(name).cloned();
        let function = state
            .functions
            .get_mut(name)
            .ok_or_else(|| not_found(name))?;
        let vpc_id = function.network.as_ref().and_then(|n| n.vpc_id.clone());
        function.network = Some(NetworkAttachment {
            vpc_id: if update.is_detach() { None } else { vpc_id },
            subnet_ids: update.subnet_ids.clone(),
            security_group_ids: update.security_group_ids.clone(),
            ipv6_allowed_for_dual_stack: update.ipv6_allowed_for_dual_stack,
        });
        if let Some(script) = script {
            state.active_polls.insert(name.to_string(), script.into());
        }
        state.updates.push((name.to_string(), update));
        Ok(())
    }

    async fn delete_function(&self, name: &str) -> Result<(), AwsError> {
        let mut state = lock(&self.state);
        state.calls.push(LambdaCall::Delete(name.to_string()));
        if let Some(err) = state.fail_delete.get(name) {
            return Err(err.clone());
        }
        state
            .functions
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }
}

#[derive(Default)]
struct LogsState {
    groups: BTreeSet<String>,
    fail_delete: HashMap<String, AwsError>,
    delete_attempts: usize,
}

/// Fake CloudWatch Logs. Deleting a missing group fails with `NotFound`,
/// like the real service.
#[derive(Clone, Default)]
pub struct FakeLogs {
    state: Arc<Mutex<LogsState>>,
}

impl FakeLogs {
    pub fn with_groups(groups: &[&str]) -> Self {
        let fake = Self::default();
        lock(&fake.state)
            .groups
            .extend(groups.iter().map(|g| g.to_string()));
        fake
    }

    pub fn fail_delete(&self, name: &str, err: AwsError) {
        lock(&self.state).fail_delete.insert(name.to_string(), err);
    }

    pub fn contains(&self, name: &str) -> bool {
        lock(&self.state).groups.contains(name)
    }

    pub fn delete_attempts(&self) -> usize {
        lock(&self.state).delete_attempts
    }
}

impl LogsOperations for FakeLogs {
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>, AwsError> {
        Ok(lock(&self.state)
            .groups
            .iter()
            .filter(|g| g.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn delete_log_group(&self, name: &str) -> Result<(), AwsError> {
        let mut state = lock(&self.state);
        state.delete_attempts += 1;
        if let Some(err) = state.fail_delete.get(name) {
            return Err(err.clone());
        }
        if state.groups.remove(name) {
            Ok(())
        } else {
            Err(AwsError::NotFound {
                message: "The specified log group does not exist.".to_string(),
            })
        }
    }
}

#[derive(Default)]
struct StackState {
    stacks: HashMap<String, Vec<StackResource>>,
    fail_list: Option<AwsError>,
}

/// Fake CloudFormation. Unknown stacks fail the way the real service does.
#[derive(Clone, Default)]
pub struct FakeStack {
    state: Arc<Mutex<StackState>>,
}

impl FakeStack {
    pub fn insert(&self, stack: &str, resources: Vec<StackResource>) {
        lock(&self.state)
            .stacks
            .insert(stack.to_string(), resources);
    }

    pub fn fail_list(&self, err: AwsError) {
        lock(&self.state).fail_list = Some(err);
    }
}

impl StackOperations for FakeStack {
    async fn list_stack_resources(&self, stack: &str) -> Result<Vec<StackResource>, AwsError> {
        let state = lock(&self.state);
        if let Some(err) = state.fail_list.clone() {
            return Err(err);
        }
        state.stacks.get(stack).cloned().ok_or_else(|| AwsError::NotFound {
            message: format!("Stack with id {stack} does not exist"),
        })
    }
}

/// Records every event for later assertions
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<TeardownEvent>>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<TeardownEvent> {
        lock(&self.events).clone()
    }

    /// Events rendered as narration lines
    pub fn lines(&self) -> Vec<String> {
        lock(&self.events).iter().map(|e| e.to_string()).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, event: TeardownEvent) {
        lock(&self.events).push(event);
    }
}
