//! CloudFormation orchestrator
//!
//! Creates, updates and deletes the namespace stack and polls until
//! CloudFormation reports a terminal status. New stack events are forwarded
//! to the event sink as they appear.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use aws_sdk_cloudformation::primitives::DateTimeFormat;
use aws_sdk_cloudformation::types::{
    Capability, ChangeSetStatus, ChangeSetType, Parameter, Stack, StackEvent,
};
use aws_sdk_cloudformation::Client;
use tokio::runtime::Runtime;

use super::error_message;
use crate::domain::entities::{ResolvedTarget, StackDescriptor};
use crate::domain::ports::{
    DeployEvent, DeployEventSink, OrchestrationError, Orchestrator, StackChange, StackOutcome,
};
use crate::domain::value_objects::UpdateMode;

const NO_UPDATES: &str = "No updates are to be performed";
const NO_CHANGES: &str = "didn't contain changes";
const DOES_NOT_EXIST: &str = "does not exist";
const REVIEW_IN_PROGRESS: &str = "REVIEW_IN_PROGRESS";
const DELETE_COMPLETE: &str = "DELETE_COMPLETE";
const ROLLBACK_COMPLETE: &str = "ROLLBACK_COMPLETE";

/// Where a stack status sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Running,
    Succeeded,
    Failed,
}

/// A missing status is treated as still running
fn classify(status: Option<&str>) -> Progress {
    let Some(status) = status else {
        return Progress::Running;
    };
    if status.ends_with("_IN_PROGRESS") {
        Progress::Running
    } else if status.contains("ROLLBACK") || status.ends_with("_FAILED") {
        Progress::Failed
    } else {
        Progress::Succeeded
    }
}

/// How a deploy should treat the stack found under the target name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Existing {
    /// Nothing to update; create through a change set
    Absent,
    Updatable,
    /// Failed creation; only deletion gets it out of this state
    Stuck,
}

/// `found` is `None` when no stack exists, `Some(None)` when it reported no status
fn existing(found: Option<Option<&str>>) -> Existing {
    match found {
        None => Existing::Absent,
        Some(Some(REVIEW_IN_PROGRESS)) => Existing::Absent,
        Some(Some(ROLLBACK_COMPLETE)) => Existing::Stuck,
        Some(_) => Existing::Updatable,
    }
}

fn status_of(stack: &Stack) -> Option<&str> {
    stack.stack_status().map(|s| s.as_str())
}

pub struct CloudFormationOrchestrator {
    runtime: Arc<Runtime>,
    client: Client,
    poll_interval: Duration,
}

impl CloudFormationOrchestrator {
    pub fn new(runtime: Arc<Runtime>, client: Client, poll_interval: Duration) -> Self {
        Self {
            runtime,
            client,
            poll_interval,
        }
    }

    /// `None` when CloudFormation says the stack does not exist
    async fn find_stack(&self, name_or_id: &str) -> Result<Option<Stack>, OrchestrationError> {
        match self.client.describe_stacks().stack_name(name_or_id).send().await {
            Ok(output) => Ok(output.stacks().first().cloned()),
            Err(e) => {
                let message = error_message(&e);
                if message.contains(DOES_NOT_EXIST) {
                    Ok(None)
                } else {
                    Err(OrchestrationError::Rejected {
                        operation: "describe",
                        stack_name: name_or_id.to_string(),
                        message,
                    })
                }
            }
        }
    }

    async fn deploy_async(
        &self,
        descriptor: &StackDescriptor,
        mode: UpdateMode,
        events: &dyn DeployEventSink,
    ) -> Result<StackOutcome, OrchestrationError> {
        let name = descriptor.stack_name();
        let found = self.find_stack(name).await?;
        let exists = match existing(found.as_ref().map(status_of)) {
            Existing::Absent => false,
            Existing::Updatable => true,
            Existing::Stuck => {
                return Err(OrchestrationError::Unrecoverable {
                    stack_name: name.to_string(),
                    status: ROLLBACK_COMPLETE.to_string(),
                })
            }
        };

        let mut stream = EventStream::new(name);
        if exists {
            stream.prime(&self.client).await;
        }

        let started = if exists && mode == UpdateMode::Fast {
            self.update_directly(descriptor).await?
        } else {
            self.apply_change_set(descriptor, exists).await?
        };
        if !started {
            tracing::info!(stack = name, "no changes to deploy");
            let outputs = match self.find_stack(name).await? {
                Some(stack) => collect_outputs(&stack),
                None => BTreeMap::new(),
            };
            return Ok(StackOutcome {
                change: StackChange::Unchanged,
                outputs,
            });
        }

        let stack = self.wait_for_stack(name, &mut stream, events).await?;
        Ok(StackOutcome {
            change: if exists {
                StackChange::Updated
            } else {
                StackChange::Created
            },
            outputs: collect_outputs(&stack),
        })
    }

    /// `UpdateStack` without a change set. `Ok(false)` when nothing changed.
    async fn update_directly(&self, descriptor: &StackDescriptor) -> Result<bool, OrchestrationError> {
        let name = descriptor.stack_name();
        tracing::info!(stack = name, "updating stack");

        let result = self
            .client
            .update_stack()
            .stack_name(name)
            .template_body(&descriptor.template_body)
            .set_parameters(Some(parameters(descriptor)))
            .set_capabilities(Some(capabilities()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let message = error_message(&e);
                if message.contains(NO_UPDATES) {
                    Ok(false)
                } else {
                    Err(OrchestrationError::Rejected {
                        operation: "update",
                        stack_name: name.to_string(),
                        message,
                    })
                }
            }
        }
    }

    /// Create, wait for and execute a change set. `Ok(false)` when it is empty.
    async fn apply_change_set(
        &self,
        descriptor: &StackDescriptor,
        exists: bool,
    ) -> Result<bool, OrchestrationError> {
        let name = descriptor.stack_name();
        let change_set_name = format!("yippie-{}", chrono::Utc::now().timestamp_millis());
        let change_set_type = if exists {
            ChangeSetType::Update
        } else {
            ChangeSetType::Create
        };
        tracing::info!(
            stack = name,
            change_set = %change_set_name,
            kind = change_set_type.as_str(),
            "creating change set"
        );

        let rejected = |operation: &'static str, message: String| OrchestrationError::Rejected {
            operation,
            stack_name: name.to_string(),
            message,
        };

        let created = self
            .client
            .create_change_set()
            .stack_name(name)
            .change_set_name(&change_set_name)
            .change_set_type(change_set_type)
            .template_body(&descriptor.template_body)
            .set_parameters(Some(parameters(descriptor)))
            .set_capabilities(Some(capabilities()))
            .send()
            .await
            .map_err(|e| rejected("create change set", error_message(&e)))?;
        let change_set_id = created.id().unwrap_or(change_set_name.as_str()).to_string();

        loop {
            tokio::time::sleep(self.poll_interval).await;
            let described = self
                .client
                .describe_change_set()
                .stack_name(name)
                .change_set_name(&change_set_id)
                .send()
                .await
                .map_err(|e| rejected("describe change set", error_message(&e)))?;

            match described.status() {
                Some(ChangeSetStatus::CreateComplete) => break,
                Some(ChangeSetStatus::Failed) => {
                    let reason = described.status_reason().unwrap_or_default();
                    if reason.contains(NO_CHANGES) || reason.contains(NO_UPDATES) {
                        if let Err(e) = self
                            .client
                            .delete_change_set()
                            .stack_name(name)
                            .change_set_name(&change_set_id)
                            .send()
                            .await
                        {
                            tracing::warn!(change_set = %change_set_id, "failed to delete empty change set: {}", error_message(&e));
                        }
                        return Ok(false);
                    }
                    return Err(rejected("create change set", reason.to_string()));
                }
                other => {
                    tracing::debug!(status = ?other, "change set pending");
                }
            }
        }

        self.client
            .execute_change_set()
            .stack_name(name)
            .change_set_name(&change_set_id)
            .send()
            .await
            .map_err(|e| rejected("execute change set", error_message(&e)))?;
        tracing::info!(stack = name, "change set executing");
        Ok(true)
    }

    /// Poll until the stack leaves its in-progress state
    async fn wait_for_stack(
        &self,
        name_or_id: &str,
        stream: &mut EventStream,
        events: &dyn DeployEventSink,
    ) -> Result<Stack, OrchestrationError> {
        loop {
            tokio::time::sleep(self.poll_interval).await;
            stream.pump(&self.client, events).await;

            let stack = self.find_stack(name_or_id).await?.ok_or_else(|| {
                OrchestrationError::StackNotFound {
                    stack_name: stream.stack_name.clone(),
                }
            })?;
            let status = status_of(&stack);
            match classify(status) {
                Progress::Running => continue,
                Progress::Succeeded => {
                    tracing::info!(stack = name_or_id, status = status.unwrap_or_default(), "stack operation complete");
                    return Ok(stack);
                }
                Progress::Failed => {
                    stream.pump(&self.client, events).await;
                    let reason = stream
                        .first_failure
                        .clone()
                        .or_else(|| stack.stack_status_reason().map(str::to_string))
                        .unwrap_or_else(|| "no reason reported".to_string());
                    return Err(OrchestrationError::Failed {
                        stack_name: stream.stack_name.clone(),
                        status: status.unwrap_or_default().to_string(),
                        reason,
                    });
                }
            }
        }
    }

    async fn destroy_async(
        &self,
        target: &ResolvedTarget,
        events: &dyn DeployEventSink,
    ) -> Result<(), OrchestrationError> {
        let name = target.stack_name.as_str();
        let stack = self
            .find_stack(name)
            .await?
            .ok_or_else(|| OrchestrationError::StackNotFound {
                stack_name: name.to_string(),
            })?;

        // Deleted stacks are only describable by id
        let stack_id = stack.stack_id().unwrap_or(name).to_string();
        let mut stream = EventStream::new(name).tracking(&stack_id);
        stream.prime(&self.client).await;

        tracing::info!(stack = name, "deleting stack");
        self.client
            .delete_stack()
            .stack_name(&stack_id)
            .send()
            .await
            .map_err(|e| OrchestrationError::Rejected {
                operation: "delete",
                stack_name: name.to_string(),
                message: error_message(&e),
            })?;

        loop {
            tokio::time::sleep(self.poll_interval).await;
            stream.pump(&self.client, events).await;

            let Some(stack) = self.find_stack(&stack_id).await? else {
                return Ok(());
            };
            let status = status_of(&stack);
            if status == Some(DELETE_COMPLETE) {
                tracing::info!(stack = name, "stack deleted");
                return Ok(());
            }
            if classify(status) == Progress::Failed {
                return Err(OrchestrationError::Failed {
                    stack_name: name.to_string(),
                    status: status.unwrap_or_default().to_string(),
                    reason: stream
                        .first_failure
                        .clone()
                        .or_else(|| stack.stack_status_reason().map(str::to_string))
                        .unwrap_or_else(|| "no reason reported".to_string()),
                });
            }
        }
    }
}

impl Orchestrator for CloudFormationOrchestrator {
    fn deploy(
        &self,
        descriptor: &StackDescriptor,
        mode: UpdateMode,
        events: &dyn DeployEventSink,
    ) -> Result<StackOutcome, OrchestrationError> {
        self.runtime
            .block_on(self.deploy_async(descriptor, mode, events))
    }

    fn destroy(
        &self,
        target: &ResolvedTarget,
        events: &dyn DeployEventSink,
    ) -> Result<(), OrchestrationError> {
        self.runtime.block_on(self.destroy_async(target, events))
    }
}

/// Forwards stack events not seen before, oldest first
struct EventStream {
    stack_name: String,
    lookup: String,
    seen: HashSet<String>,
    first_failure: Option<String>,
}

impl EventStream {
    fn new(stack_name: &str) -> Self {
        Self {
            stack_name: stack_name.to_string(),
            lookup: stack_name.to_string(),
            seen: HashSet::new(),
            first_failure: None,
        }
    }

    fn tracking(mut self, stack_id: &str) -> Self {
        self.lookup = stack_id.to_string();
        self
    }

    async fn fetch(&self, client: &Client) -> Vec<StackEvent> {
        match client.describe_stack_events().stack_name(&self.lookup).send().await {
            Ok(output) => output.stack_events().to_vec(),
            Err(e) => {
                tracing::debug!(stack = %self.stack_name, "no stack events: {}", error_message(&e));
                Vec::new()
            }
        }
    }

    /// Mark every existing event as seen
    async fn prime(&mut self, client: &Client) {
        let fetched = self.fetch(client).await;
        self.seen
            .extend(fetched.iter().filter_map(|e| e.event_id()).map(str::to_string));
    }

    async fn pump(&mut self, client: &Client, events: &dyn DeployEventSink) {
        let fetched = self.fetch(client).await;
        // Newest first on the wire
        for event in fetched.iter().rev() {
            if let Some(progress) = self.observe(event) {
                if events.wants_detailed_events() {
                    events.on_event(progress);
                }
            }
        }
    }

    /// Record `event` and turn it into a progress event, unless it was seen
    /// before or carries no id
    fn observe(&mut self, event: &StackEvent) -> Option<DeployEvent> {
        let id = event.event_id()?;
        if !self.seen.insert(id.to_string()) {
            return None;
        }

        let status = event
            .resource_status()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default();
        let reason = event.resource_status_reason().map(str::to_string);
        if self.first_failure.is_none() && status.ends_with("_FAILED") {
            if let Some(reason) = &reason {
                self.first_failure = Some(format!(
                    "{}: {}",
                    event.logical_resource_id().unwrap_or("stack"),
                    reason
                ));
            }
        }

        let logical_id = event.logical_resource_id().unwrap_or_default().to_string();
        tracing::debug!(stack = %self.stack_name, resource = %logical_id, status = %status, "stack event");

        Some(DeployEvent::StackProgress {
            timestamp: event
                .timestamp()
                .and_then(|t| t.fmt(DateTimeFormat::DateTime).ok())
                .unwrap_or_default(),
            logical_id,
            resource_type: event.resource_type().unwrap_or_default().to_string(),
            status,
            reason,
        })
    }
}

fn parameters(descriptor: &StackDescriptor) -> Vec<Parameter> {
    descriptor
        .parameters
        .iter()
        .map(|p| {
            Parameter::builder()
                .parameter_key(&p.key)
                .parameter_value(&p.value)
                .build()
        })
        .collect()
}

fn capabilities() -> Vec<Capability> {
    vec![
        Capability::CapabilityIam,
        Capability::CapabilityNamedIam,
        Capability::CapabilityAutoExpand,
    ]
}

fn collect_outputs(stack: &Stack) -> BTreeMap<String, String> {
    stack
        .outputs()
        .iter()
        .filter_map(|o| match (o.output_key(), o.output_value()) {
            (Some(key), Some(value)) => Some((key.to_string(), value.to_string())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cloudformation::primitives::DateTime;
    use aws_sdk_cloudformation::types::ResourceStatus;

    #[test]
    fn in_progress_statuses_keep_polling() {
        for status in [
            "CREATE_IN_PROGRESS",
            "UPDATE_IN_PROGRESS",
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            "UPDATE_ROLLBACK_IN_PROGRESS",
            "DELETE_IN_PROGRESS",
            "REVIEW_IN_PROGRESS",
        ] {
            assert_eq!(classify(Some(status)), Progress::Running, "{status}");
        }
    }

    #[test]
    fn completed_statuses_succeed() {
        for status in ["CREATE_COMPLETE", "UPDATE_COMPLETE", "DELETE_COMPLETE", "IMPORT_COMPLETE"] {
            assert_eq!(classify(Some(status)), Progress::Succeeded, "{status}");
        }
    }

    #[test]
    fn rollbacks_and_failures_fail() {
        for status in [
            "ROLLBACK_COMPLETE",
            "UPDATE_ROLLBACK_COMPLETE",
            "CREATE_FAILED",
            "DELETE_FAILED",
            "UPDATE_FAILED",
            "ROLLBACK_FAILED",
        ] {
            assert_eq!(classify(Some(status)), Progress::Failed, "{status}");
        }
    }

    #[test]
    fn missing_status_keeps_polling() {
        assert_eq!(classify(None), Progress::Running);
    }

    #[test]
    fn rollback_complete_stack_cannot_be_updated() {
        assert_eq!(existing(None), Existing::Absent);
        assert_eq!(existing(Some(Some("REVIEW_IN_PROGRESS"))), Existing::Absent);
        assert_eq!(existing(Some(Some("ROLLBACK_COMPLETE"))), Existing::Stuck);
        assert_eq!(existing(Some(Some("UPDATE_ROLLBACK_COMPLETE"))), Existing::Updatable);
        assert_eq!(existing(Some(Some("CREATE_COMPLETE"))), Existing::Updatable);
        assert_eq!(existing(Some(None)), Existing::Updatable);
    }

    fn event(id: Option<&str>, status: ResourceStatus, reason: Option<&str>) -> StackEvent {
        StackEvent::builder()
            .set_event_id(id.map(str::to_string))
            .logical_resource_id("SiteBucket")
            .resource_type("AWS::S3::Bucket")
            .resource_status(status)
            .set_resource_status_reason(reason.map(str::to_string))
            .timestamp(DateTime::from_secs(0))
            .build()
    }

    #[test]
    fn observe_forwards_each_event_once() {
        let mut stream = EventStream::new("demo-StackStatic");
        let first = event(Some("e1"), ResourceStatus::CreateInProgress, None);

        match stream.observe(&first) {
            Some(DeployEvent::StackProgress {
                timestamp,
                logical_id,
                status,
                ..
            }) => {
                assert_eq!(timestamp, "1970-01-01T00:00:00Z");
                assert_eq!(logical_id, "SiteBucket");
                assert_eq!(status, "CREATE_IN_PROGRESS");
            }
            other => panic!("expected StackProgress, got {other:?}"),
        }
        assert!(stream.observe(&first).is_none());
    }

    #[test]
    fn observe_skips_events_without_id() {
        let mut stream = EventStream::new("demo-StackStatic");
        let anonymous = event(None, ResourceStatus::CreateFailed, Some("boom"));
        assert!(stream.observe(&anonymous).is_none());
        assert!(stream.first_failure.is_none());
    }

    #[test]
    fn observe_keeps_first_failure_reason() {
        let mut stream = EventStream::new("demo-StackStatic");
        stream.observe(&event(
            Some("e1"),
            ResourceStatus::CreateFailed,
            Some("bucket name taken"),
        ));
        stream.observe(&event(
            Some("e2"),
            ResourceStatus::DeleteFailed,
            Some("later failure"),
        ));
        assert_eq!(
            stream.first_failure.as_deref(),
            Some("SiteBucket: bucket name taken")
        );
    }

    #[test]
    fn missing_timestamp_renders_empty() {
        let mut stream = EventStream::new("demo-StackStatic");
        let event = StackEvent::builder().event_id("e1").build();
        match stream.observe(&event) {
            Some(DeployEvent::StackProgress { timestamp, status, .. }) => {
                assert_eq!(timestamp, "");
                assert_eq!(status, "");
            }
            other => panic!("expected StackProgress, got {other:?}"),
        }
    }
}
