// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires a fresh in-memory `Store`/`Directory`/engines together for one
//! CLI invocation.
//!
//! There is no persistent backing store or daemon process to share state
//! across invocations in this reference CLI (§2.1 — `ats-daemon` is the
//! process that holds long-lived state; `ats-cli` is a convenience
//! wrapper for local exercising). Every subcommand therefore seeds the
//! job/candidate/application fixtures it needs up front, in the same
//! process, before calling the operation it demonstrates.

use std::sync::Arc;

use ats_adapters::{InMemoryDirectory, LoggingNotificationDispatcher, TracingAuditLogger};
use ats_core::{Application, ApplicationId, CandidateId, Contact, JobId, Stage, SystemClock, UserId};
use ats_engine::{BulkCoordinator, EngineConfig, EscalationService, SLAMonitor, StageRegistry, WorkflowEngine};
use ats_storage::{InMemoryStore, Store};

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub clock: SystemClock,
    pub directory: Arc<InMemoryDirectory>,
    pub workflow: WorkflowEngine<SystemClock>,
    pub registry: StageRegistry,
    pub escalations: EscalationService<SystemClock>,
    pub monitor: SLAMonitor<SystemClock>,
    pub bulk: BulkCoordinator<SystemClock>,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = SystemClock;
        let directory = Arc::new(InMemoryDirectory::new());
        let dispatcher = Arc::new(LoggingNotificationDispatcher);
        let audit = Arc::new(TracingAuditLogger);
        let config = EngineConfig::default();

        let workflow = WorkflowEngine::new(
            store.clone(),
            clock.clone(),
            directory.clone(),
            dispatcher.clone(),
            audit.clone(),
        );
        let registry =
            StageRegistry::with_default_sla_hours(store.clone(), config.sla.default_stage_sla_hours);
        let escalations = EscalationService::new(
            store.clone(),
            clock.clone(),
            directory.clone(),
            dispatcher.clone(),
            audit.clone(),
            config.sla.clone(),
        );
        let monitor = SLAMonitor::new(store.clone(), clock.clone(), escalations.clone(), config.sla);
        let bulk = BulkCoordinator::new(store.clone(), clock.clone(), workflow.clone(), audit, config.bulk_retention);

        Self { store, clock, directory, workflow, registry, escalations, monitor, bulk }
    }

    /// Seed a job with a hiring manager and the canonical six default
    /// stages.
    pub async fn seed_job(&self, title: &str) -> anyhow::Result<(JobId, Vec<Stage>)> {
        let job_id = JobId::new();
        let creator = UserId::new();
        self.directory.put_job(job_id, creator, title);
        self.directory.put_user(creator, Contact::new(format!("{creator}@example.com"), "Hiring Manager"));
        let stages = self.registry.create_defaults(job_id).await?;
        Ok((job_id, stages))
    }

    /// Seed a candidate and an `applied` application against `job_id`.
    pub async fn seed_application(&self, job_id: JobId) -> anyhow::Result<ApplicationId> {
        let candidate_id = CandidateId::new();
        self.directory.put_candidate(candidate_id, Contact::new(format!("{candidate_id}@example.com"), "Candidate"));
        let application = Application::new(ApplicationId::new(), candidate_id, job_id, self.clock.epoch_ms());
        let application_id = application.id;
        self.store.put_application(application).await?;
        Ok(application_id)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
