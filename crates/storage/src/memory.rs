// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory reference implementation of [`Store`].
//!
//! Five `HashMap` tables plus a secondary `open_transition` index, all
//! guarded by one `parking_lot::Mutex`. A single mutex is sufficient to
//! provide the linearizability `advance_transition`/`escalate` require
//! per §5; a SQL-backed store would use row locks or a CAS on the
//! open-transition id in its place.

use async_trait::async_trait;
use ats_core::{
    Application, ApplicationId, EpochMs, Escalation, EscalationId, JobId, Stage, StageId,
    StageTransition, StatusHistoryEntry, StoreError, TransitionId, UserId,
};
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::store::Store;

#[derive(Default)]
struct Tables {
    applications: HashMap<ApplicationId, Application>,
    stages: HashMap<StageId, Stage>,
    transitions: HashMap<TransitionId, StageTransition>,
    /// application_id -> id of its open transition, if any.
    open_transition: HashMap<ApplicationId, TransitionId>,
    history: Vec<StatusHistoryEntry>,
    escalations: HashMap<EscalationId, Escalation>,
}

/// In-memory [`Store`]. Cheap to clone (an `Arc` inside), suitable for
/// tests, the daemon's default config, and the CLI's local-exercising
/// mode.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: std::sync::Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> StoreError {
    StoreError::NotFound(format!("{kind} {id} not found"))
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_application(&self, id: &ApplicationId) -> Result<Application, StoreError> {
        let tables = self.tables.lock();
        tables.applications.get(id).cloned().ok_or_else(|| not_found("application", id))
    }

    async fn put_application(&self, application: Application) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        tables.applications.insert(application.id, application);
        Ok(())
    }

    async fn list_applications_for_job(&self, job_id: &JobId) -> Result<Vec<Application>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables.applications.values().filter(|a| &a.job_id == job_id).cloned().collect())
    }

    async fn get_stage(&self, id: &StageId) -> Result<Stage, StoreError> {
        let tables = self.tables.lock();
        tables.stages.get(id).cloned().ok_or_else(|| not_found("stage", id))
    }

    async fn put_stage(&self, stage: Stage) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        tables.stages.insert(stage.id, stage);
        Ok(())
    }

    async fn list_stages_for_job(
        &self,
        job_id: &JobId,
        include_inactive: bool,
    ) -> Result<Vec<Stage>, StoreError> {
        let tables = self.tables.lock();
        let mut stages: Vec<Stage> = tables
            .stages
            .values()
            .filter(|s| &s.job_id == job_id && (include_inactive || s.active))
            .cloned()
            .collect();
        stages.sort_by_key(|s| s.order_index);
        Ok(stages)
    }

    async fn get_transition(&self, id: &TransitionId) -> Result<StageTransition, StoreError> {
        let tables = self.tables.lock();
        tables.transitions.get(id).cloned().ok_or_else(|| not_found("transition", id))
    }

    async fn open_transition_of(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<StageTransition>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .open_transition
            .get(application_id)
            .and_then(|id| tables.transitions.get(id))
            .cloned())
    }

    async fn list_transitions_for_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<StageTransition>, StoreError> {
        let tables = self.tables.lock();
        let mut transitions: Vec<StageTransition> = tables
            .transitions
            .values()
            .filter(|t| &t.application_id == application_id)
            .cloned()
            .collect();
        transitions.sort_by_key(|t| t.entered_at);
        Ok(transitions)
    }

    async fn list_open_overdue(&self, now: EpochMs) -> Result<Vec<StageTransition>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .transitions
            .values()
            .filter(|t| t.is_open() && !t.is_escalated && t.sla_deadline < now)
            .cloned()
            .collect())
    }

    async fn advance_transition(
        &self,
        application_id: &ApplicationId,
        expected_open: Option<TransitionId>,
        new_transition: StageTransition,
        new_status: String,
        history: StatusHistoryEntry,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();

        let actual_open = tables.open_transition.get(application_id).copied();
        if actual_open != expected_open {
            return Err(StoreError::Conflict(format!(
                "open transition for {application_id} changed: expected {expected_open:?}, found {actual_open:?}"
            )));
        }

        if let Some(open_id) = expected_open {
            let exited_at = new_transition.entered_at;
            if let Some(prior) = tables.transitions.get_mut(&open_id) {
                prior.exited_at = Some(exited_at);
            }
        }

        tables.open_transition.insert(*application_id, new_transition.id);
        tables.transitions.insert(new_transition.id, new_transition);

        if let Some(app) = tables.applications.get_mut(application_id) {
            app.status = new_status;
        }

        tables.history.push(history);
        Ok(())
    }

    async fn put_history(&self, entry: StatusHistoryEntry) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        tables.history.push(entry);
        Ok(())
    }

    async fn set_status(
        &self,
        application_id: &ApplicationId,
        new_status: String,
        history: StatusHistoryEntry,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();
        let app = tables
            .applications
            .get_mut(application_id)
            .ok_or_else(|| not_found("application", application_id))?;
        app.status = new_status;
        tables.history.push(history);
        Ok(())
    }

    async fn list_history_for_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<StatusHistoryEntry>, StoreError> {
        let tables = self.tables.lock();
        let mut entries: Vec<StatusHistoryEntry> = tables
            .history
            .iter()
            .filter(|h| &h.application_id == application_id)
            .cloned()
            .collect();
        entries.sort_by_key(|h| h.created_at);
        Ok(entries)
    }

    async fn escalate(&self, escalation: Escalation) -> Result<(), StoreError> {
        let mut tables = self.tables.lock();

        let transition = tables
            .transitions
            .get_mut(&escalation.transition_id)
            .ok_or_else(|| not_found("transition", escalation.transition_id))?;

        if transition.is_escalated {
            return Err(StoreError::Conflict(format!(
                "transition {} already escalated",
                escalation.transition_id
            )));
        }

        transition.is_escalated = true;
        transition.escalated_at = Some(escalation.created_at);
        transition.escalated_to_user = Some(escalation.assignee);

        tables.escalations.insert(escalation.id, escalation);
        Ok(())
    }

    async fn get_escalation(&self, id: &EscalationId) -> Result<Escalation, StoreError> {
        let tables = self.tables.lock();
        tables.escalations.get(id).cloned().ok_or_else(|| not_found("escalation", id))
    }

    async fn get_escalation_for_transition(
        &self,
        transition_id: &TransitionId,
    ) -> Result<Option<Escalation>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .escalations
            .values()
            .find(|e| &e.transition_id == transition_id && !e.resolved)
            .cloned())
    }

    async fn resolve_escalation(
        &self,
        id: &EscalationId,
        resolver: UserId,
        resolved_at: EpochMs,
    ) -> Result<Escalation, StoreError> {
        let mut tables = self.tables.lock();
        let escalation =
            tables.escalations.get_mut(id).ok_or_else(|| not_found("escalation", id))?;

        if escalation.resolved {
            return Err(StoreError::Conflict(format!("escalation {id} already resolved")));
        }

        escalation.resolved = true;
        escalation.resolved_at = Some(resolved_at);
        escalation.resolved_by = Some(resolver);
        Ok(escalation.clone())
    }

    async fn list_escalations_for_user(
        &self,
        user: &UserId,
        unresolved_only: bool,
    ) -> Result<Vec<Escalation>, StoreError> {
        let tables = self.tables.lock();
        let mut escalations: Vec<Escalation> = tables
            .escalations
            .values()
            .filter(|e| &e.assignee == user && (!unresolved_only || !e.resolved))
            .cloned()
            .collect();
        escalations.sort_by_key(|e| e.created_at);
        Ok(escalations)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
