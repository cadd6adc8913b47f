//! Deployment Coordinator
//!
//! Drives one deploy or destroy run:
//! 1. Archive the source folder under a fresh key
//! 2. Upload the archive to the artifact bucket
//! 3. Resolve the target and synthesize the stack descriptor
//! 4. Hand the descriptor to the orchestrator and wait for it
//!
//! Destroy skips steps 1-3. Each step is a phase transition reported to the
//! event sink; the first failing step ends the run in `Failed`. Template
//! binding is checked before step 1, so a configuration gap fails without
//! side effects.

use std::cell::Cell;
use std::sync::Arc;

use crate::application::synth::{self, StackTemplate};
use crate::config::DeploymentConfig;
use crate::domain::entities::ResolvedTarget;
use crate::domain::ports::{
    ArchiveBuilder, ArtifactStore, Clock, DeployEvent, DeployEventSink, NoopEventSink, Operation,
    Orchestrator,
};
use crate::domain::value_objects::{ArchiveKey, Phase};
use crate::error::DeployResult;

use super::result::{DeploySummary, DestroySummary, RunOutcome};

/// Walks the phase state machine and reports every transition
struct PhaseTracker<'a> {
    current: Cell<Phase>,
    events: &'a dyn DeployEventSink,
}

impl<'a> PhaseTracker<'a> {
    fn new(events: &'a dyn DeployEventSink) -> Self {
        Self {
            current: Cell::new(Phase::Start),
            events,
        }
    }

    fn advance(&self, next: Phase) {
        let current = self.current.get();
        debug_assert!(current.allows(next), "illegal transition {current} -> {next}");
        tracing::debug!(from = %current, to = %next, "phase");
        self.current.set(next);
        self.events.on_event(DeployEvent::PhaseChanged { phase: next });
    }

    /// Close the run: `Success` on `Ok`, `Failed` plus the error on `Err`
    fn finish<T>(&self, result: DeployResult<T>) -> DeployResult<T> {
        match &result {
            Ok(_) => self.advance(Phase::Success),
            Err(e) => {
                tracing::error!(kind = e.kind(), phase = %self.current.get(), "{}", e);
                self.advance(Phase::Failed);
                self.events.on_event(DeployEvent::Failed {
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
        result
    }
}

/// Without a content deployer the stack never copies the archive into the
/// site bucket
pub(super) fn content_deployer_notice(config: &DeploymentConfig) -> Option<&'static str> {
    config.content_deployer_arn.is_none().then_some(
        "no content deployer configured (AWS_CONTENTDEPLOYERARN); the archive is uploaded but the site bucket is not populated",
    )
}

/// Deployment coordinator - sequences archive, upload, synthesis and orchestration
///
/// Parameterized by its ports so tests can substitute every side effect.
pub struct DeploymentCoordinator<A, S, O, C>
where
    A: ArchiveBuilder,
    S: ArtifactStore,
    O: Orchestrator,
    C: Clock,
{
    config: DeploymentConfig,
    template: StackTemplate,
    archiver: A,
    store: S,
    orchestrator: O,
    clock: C,
}

impl<A, S, O, C> DeploymentCoordinator<A, S, O, C>
where
    A: ArchiveBuilder,
    S: ArtifactStore,
    O: Orchestrator,
    C: Clock,
{
    pub fn new(
        config: DeploymentConfig,
        template: StackTemplate,
        archiver: A,
        store: S,
        orchestrator: O,
        clock: C,
    ) -> Self {
        Self {
            config,
            template,
            archiver,
            store,
            orchestrator,
            clock,
        }
    }

    /// Same target for deploy and destroy
    pub fn target(&self) -> ResolvedTarget {
        ResolvedTarget::resolve(
            &self.config.namespace,
            &self.config.domain_name,
            &self.config.region,
        )
    }

    /// Run `operation` with event reporting
    pub fn run(
        &self,
        operation: Operation,
        events: Arc<dyn DeployEventSink>,
    ) -> DeployResult<RunOutcome> {
        match operation {
            Operation::Deploy => self.deploy_with_events(events).map(RunOutcome::Deployed),
            Operation::Destroy => self.destroy_with_events(events).map(RunOutcome::Destroyed),
        }
    }

    /// Deploy without event reporting
    pub fn deploy(&self) -> DeployResult<DeploySummary> {
        self.deploy_with_events(Arc::new(NoopEventSink))
    }

    /// Destroy without event reporting
    pub fn destroy(&self) -> DeployResult<DestroySummary> {
        self.destroy_with_events(Arc::new(NoopEventSink))
    }

    pub fn deploy_with_events(
        &self,
        events: Arc<dyn DeployEventSink>,
    ) -> DeployResult<DeploySummary> {
        let target = self.target();
        events.on_event(DeployEvent::Started {
            operation: Operation::Deploy,
            namespace: target.namespace.clone(),
            stack_name: target.stack_name.clone(),
        });

        let tracker = PhaseTracker::new(events.as_ref());
        let result = tracker.finish(self.deploy_steps(target, &tracker, events.as_ref()));

        if let Ok(summary) = &result {
            events.on_event(DeployEvent::Completed {
                operation: Operation::Deploy,
                stack_name: summary.stack_name.clone(),
                production_url: Some(summary.production_url.clone()),
                preview_url: Some(summary.preview_url.clone()),
                change: Some(summary.change.as_str()),
            });
        }
        result
    }

    fn deploy_steps(
        &self,
        target: ResolvedTarget,
        tracker: &PhaseTracker<'_>,
        events: &dyn DeployEventSink,
    ) -> DeployResult<DeploySummary> {
        let config = &self.config;
        self.template.check_bindable(config)?;
        if let Some(notice) = content_deployer_notice(config) {
            tracing::warn!("{}", notice);
        }

        tracker.advance(Phase::Archiving);
        let key = ArchiveKey::new(&config.namespace, self.clock.now_millis());
        let artifact = self.archiver.build(&config.source_folder, key)?;
        events.on_event(DeployEvent::Archived {
            key: artifact.key().to_string(),
            entry_count: artifact.entries().len(),
            size: artifact.len(),
            sha256: artifact.sha256().to_string(),
        });

        tracker.advance(Phase::Uploading);
        let artifact_key = artifact.key().clone();
        let receipt = self.store.upload(&config.artifact_bucket, artifact)?;
        events.on_event(DeployEvent::Uploaded {
            bucket: receipt.bucket.clone(),
            key: receipt.key.clone(),
            size: receipt.size,
        });

        tracker.advance(Phase::Synthesizing);
        let descriptor = synth::synthesize(&self.template, config, target, artifact_key);
        let mode = config.update_mode();
        events.on_event(DeployEvent::Synthesized {
            stack_name: descriptor.stack_name().to_string(),
            parameter_count: descriptor.parameters.len(),
            mode,
        });

        tracker.advance(Phase::Orchestrating);
        let outcome = self.orchestrator.deploy(&descriptor, mode, events)?;
        tracing::info!(
            stack = descriptor.stack_name(),
            change = outcome.change.as_str(),
            "deploy finished"
        );

        let target = descriptor.target;
        Ok(DeploySummary {
            stack_name: target.stack_name,
            production_url: target.production_host,
            preview_url: target.preview_host,
            bucket: receipt.bucket,
            artifact_key: receipt.key,
            change: outcome.change,
            outputs: outcome.outputs,
        })
    }

    pub fn destroy_with_events(
        &self,
        events: Arc<dyn DeployEventSink>,
    ) -> DeployResult<DestroySummary> {
        let target = self.target();
        events.on_event(DeployEvent::Started {
            operation: Operation::Destroy,
            namespace: target.namespace.clone(),
            stack_name: target.stack_name.clone(),
        });

        let tracker = PhaseTracker::new(events.as_ref());
        tracker.advance(Phase::Orchestrating);
        let result = tracker.finish(
            self.orchestrator
                .destroy(&target, events.as_ref())
                .map_err(Into::into),
        );

        result.map(|()| {
            tracing::info!(stack = %target.stack_name, "destroy finished");
            events.on_event(DeployEvent::Completed {
                operation: Operation::Destroy,
                stack_name: target.stack_name.clone(),
                production_url: None,
                preview_url: None,
                change: None,
            });
            DestroySummary {
                stack_name: target.stack_name,
            }
        })
    }
}
