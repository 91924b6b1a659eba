// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WorkflowEngine`: the state machine that moves an application
//! between stages (§4.2).

use std::sync::Arc;

use ats_adapters::{AuditEvent, AuditLogger, Directory, NotificationDispatcher};
use ats_core::{
    add_hours, canonicalize_status, ApplicationId, Clock, HistoryId, StageId, StageTransition,
    StatusHistoryEntry, TransitionId, UserId, WorkflowError,
};
use ats_storage::Store;

use crate::notification_planner::{self, TransitionEvent};

/// One entry in an application's `timeline()` — a transition plus its
/// derived duration.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub transition: StageTransition,
    pub duration_hours: Option<f64>,
}

pub struct WorkflowEngine<C: Clock> {
    store: Arc<dyn Store>,
    clock: C,
    directory: Arc<dyn Directory>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    audit: Arc<dyn AuditLogger>,
}

impl<C: Clock> Clone for WorkflowEngine<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
            directory: self.directory.clone(),
            dispatcher: self.dispatcher.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<C: Clock> WorkflowEngine<C> {
    pub fn new(
        store: Arc<dyn Store>,
        clock: C,
        directory: Arc<dyn Directory>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        audit: Arc<dyn AuditLogger>,
    ) -> Self {
        Self { store, clock, directory, dispatcher, audit }
    }

    /// Move `application_id` to `target_stage_id` (§4.2). Idempotent if
    /// the application's open transition already references the target
    /// stage. Retries once against a freshly-read open transition on a
    /// `ConcurrentAdvance` race before giving up (SPEC_FULL.md §9.1(a)).
    pub async fn advance(
        &self,
        application_id: ApplicationId,
        target_stage_id: StageId,
        actor: UserId,
        notes: Option<String>,
    ) -> Result<StageTransition, WorkflowError> {
        match self.try_advance(application_id, target_stage_id, actor, notes.clone()).await {
            Err(WorkflowError::ConcurrentAdvance) => {
                self.try_advance(application_id, target_stage_id, actor, notes).await
            }
            other => other,
        }
    }

    async fn try_advance(
        &self,
        application_id: ApplicationId,
        target_stage_id: StageId,
        actor: UserId,
        notes: Option<String>,
    ) -> Result<StageTransition, WorkflowError> {
        let application = self
            .store
            .get_application(&application_id)
            .await
            .map_err(|_| WorkflowError::ApplicationNotFound)?;

        let target_stage =
            self.store.get_stage(&target_stage_id).await.map_err(|_| WorkflowError::StageNotFound)?;
        if !target_stage.active {
            return Err(WorkflowError::StageNotFound);
        }
        if target_stage.job_id != application.job_id {
            return Err(WorkflowError::StageNotForApplicationJob);
        }

        let open = self.store.open_transition_of(&application_id).await?;
        if let Some(open) = &open {
            if open.stage_id == target_stage.id {
                return Ok(open.clone());
            }
        }

        let now = self.clock.epoch_ms();
        let new_transition = StageTransition::open(
            TransitionId::new(),
            application_id,
            target_stage.id,
            now,
            add_hours(now, target_stage.sla_hours),
            notes.clone(),
        );
        let new_status = canonicalize_status(&target_stage.name);
        let reason = notes.unwrap_or_else(|| format!("Advanced to stage: {}", target_stage.name));
        let history_id = HistoryId::new();
        let history = StatusHistoryEntry::new(
            history_id,
            application_id,
            Some(application.status.clone()),
            new_status.clone(),
            actor,
            Some(reason.clone()),
            now,
        );

        self.store
            .advance_transition(
                &application_id,
                open.as_ref().map(|t| t.id),
                new_transition.clone(),
                new_status.clone(),
                history,
            )
            .await?;

        tracing::info!(
            %application_id,
            target_stage = %target_stage.id,
            new_status = %new_status,
            "application advanced"
        );

        self.audit
            .log(AuditEvent::new(
                "application_advanced",
                actor.to_string(),
                now,
                serde_json::json!({
                    "application_id": application_id.to_string(),
                    "stage_id": target_stage.id.to_string(),
                    "new_status": new_status,
                }),
            ))
            .await;

        self.plan_and_dispatch(
            application_id,
            application.candidate_id,
            application.job_id,
            history_id,
            Some(application.status.clone()),
            new_status,
            actor,
            Some(reason),
            now,
        )
        .await;

        Ok(new_transition)
    }

    /// Resolve directory facts, build the planner's event, and
    /// best-effort dispatch every resulting intent. Failures here never
    /// propagate to the caller of `advance` (§7).
    #[allow(clippy::too_many_arguments)]
    async fn plan_and_dispatch(
        &self,
        application_id: ApplicationId,
        candidate_id: ats_core::CandidateId,
        job_id: ats_core::JobId,
        history_id: HistoryId,
        previous_status: Option<String>,
        new_status: String,
        actor: UserId,
        change_reason: Option<String>,
        planned_at: ats_core::EpochMs,
    ) {
        let candidate = self.directory.candidate_contact(&candidate_id).await;
        let job_title = self.directory.job_title(&job_id).await;
        let job_creator = self.directory.job_creator(&job_id).await;
        let changed_by = self.directory.user_contact(&actor).await;

        let (candidate, job_title, job_creator) = match (candidate, job_title, job_creator) {
            (Ok(c), Ok(t), Ok(j)) => (c, t, j),
            _ => {
                tracing::warn!(%application_id, "directory lookup failed, skipping notification planning");
                return;
            }
        };
        let hiring_manager = match self.directory.user_contact(&job_creator).await {
            Ok(c) => c,
            Err(_) => {
                tracing::warn!(%application_id, "hiring manager contact lookup failed, skipping notification planning");
                return;
            }
        };
        let changed_by_display = changed_by.map(|c| c.display_name).unwrap_or_else(|_| actor.to_string());

        let event = TransitionEvent {
            application_id,
            history_id,
            candidate_email: candidate.email,
            candidate_name: candidate.display_name,
            hiring_manager_email: hiring_manager.email,
            hiring_manager_name: hiring_manager.display_name,
            job_title,
            previous_status,
            new_status,
            changed_by_display,
            change_reason,
            history_timestamp: planned_at,
            planned_at,
        };

        for intent in notification_planner::plan(&event) {
            if let Err(e) = self.dispatcher.dispatch(&intent).await {
                tracing::warn!(notification_id = %intent.id, error = %e, "notification dispatch failed");
            }
        }
    }

    /// Move an application's denormalized status without moving its
    /// stage. Used by `BulkCoordinator` for `set_status`/`reject`/
    /// `approve` actions (§4.5) — these write exactly one
    /// `StatusHistoryEntry` like `advance` does, but touch no
    /// transition, so they carry no SLA deadline of their own.
    pub async fn set_status(
        &self,
        application_id: ApplicationId,
        new_status: impl Into<String>,
        actor: UserId,
        reason: Option<String>,
    ) -> Result<StatusHistoryEntry, WorkflowError> {
        let new_status = new_status.into();
        let application = self
            .store
            .get_application(&application_id)
            .await
            .map_err(|_| WorkflowError::ApplicationNotFound)?;

        let now = self.clock.epoch_ms();
        let history_id = HistoryId::new();
        let history = StatusHistoryEntry::new(
            history_id,
            application_id,
            Some(application.status.clone()),
            new_status.clone(),
            actor,
            reason.clone(),
            now,
        );

        self.store.set_status(&application_id, new_status.clone(), history.clone()).await?;

        tracing::info!(%application_id, new_status = %new_status, "application status set");

        self.audit
            .log(AuditEvent::new(
                "application_status_set",
                actor.to_string(),
                now,
                serde_json::json!({
                    "application_id": application_id.to_string(),
                    "new_status": new_status,
                }),
            ))
            .await;

        self.plan_and_dispatch(
            application_id,
            application.candidate_id,
            application.job_id,
            history_id,
            Some(application.status.clone()),
            new_status,
            actor,
            reason,
            now,
        )
        .await;

        Ok(history)
    }

    pub async fn current_transition(
        &self,
        application_id: ApplicationId,
    ) -> Result<Option<StageTransition>, WorkflowError> {
        Ok(self.store.open_transition_of(&application_id).await?)
    }

    pub async fn timeline(&self, application_id: ApplicationId) -> Result<Vec<TimelineEntry>, WorkflowError> {
        let transitions = self.store.list_transitions_for_application(&application_id).await?;
        Ok(transitions
            .into_iter()
            .map(|t| {
                let duration_hours = t.duration_hours();
                TimelineEntry { transition: t, duration_hours }
            })
            .collect())
    }

    /// Applications whose open transition references the named stage
    /// within a job.
    pub async fn applications_in_stage(
        &self,
        job_id: ats_core::JobId,
        stage_name: &str,
    ) -> Result<Vec<ats_core::Application>, WorkflowError> {
        let stages = self.store.list_stages_for_job(&job_id, true).await?;
        let Some(stage) = stages.iter().find(|s| s.name == stage_name) else {
            return Ok(Vec::new());
        };

        let applications = self.store.list_applications_for_job(&job_id).await?;
        let mut matching = Vec::new();
        for application in applications {
            if let Some(open) = self.store.open_transition_of(&application.id).await? {
                if open.stage_id == stage.id {
                    matching.push(application);
                }
            }
        }
        Ok(matching)
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
