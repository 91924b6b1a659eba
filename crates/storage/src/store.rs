// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Store` trait: abstract transactional persistence for
//! applications, stages, transitions, escalations, and history.

use async_trait::async_trait;
use ats_core::{
    Application, ApplicationId, EpochMs, Escalation, EscalationId, JobId, Stage, StageId,
    StageTransition, StatusHistoryEntry, StoreError, TransitionId, UserId,
};

/// Abstract persistence for the five entities in the data model (§3).
///
/// Implementations fail with [`StoreError::NotFound`],
/// [`StoreError::Conflict`], or [`StoreError::Unavailable`] — the engine
/// maps these into its own error taxonomy at the boundary.
///
/// `advance_transition` and `escalate` are the two compound writes that
/// must be atomic: "no partially-applied transition" is a contract of
/// this trait, not something every caller re-derives by hand.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_application(&self, id: &ApplicationId) -> Result<Application, StoreError>;

    /// Seed or overwrite an application record. Applications are created
    /// externally in production (§3's lifecycle note); this exists so the
    /// in-memory reference store and the CLI/daemon's local-exercising
    /// mode have a way to populate one.
    async fn put_application(&self, application: Application) -> Result<(), StoreError>;

    async fn list_applications_for_job(&self, job_id: &JobId) -> Result<Vec<Application>, StoreError>;

    async fn get_stage(&self, id: &StageId) -> Result<Stage, StoreError>;

    async fn put_stage(&self, stage: Stage) -> Result<(), StoreError>;

    /// Ordered by `order_index`; active-only unless `include_inactive`.
    async fn list_stages_for_job(
        &self,
        job_id: &JobId,
        include_inactive: bool,
    ) -> Result<Vec<Stage>, StoreError>;

    async fn get_transition(&self, id: &TransitionId) -> Result<StageTransition, StoreError>;

    async fn open_transition_of(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<StageTransition>, StoreError>;

    /// Ordered by `entered_at`.
    async fn list_transitions_for_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<StageTransition>, StoreError>;

    /// Open transitions with `sla_deadline < now` and `is_escalated = false`.
    async fn list_open_overdue(&self, now: EpochMs) -> Result<Vec<StageTransition>, StoreError>;

    /// Atomically: close `expected_open` (if `Some`), insert
    /// `new_transition`, set the application's denormalized `status`,
    /// and append `history` — one write, or none.
    ///
    /// Returns `StoreError::Conflict` if the application's current open
    /// transition id no longer matches `expected_open`; the engine maps
    /// this to `WorkflowError::ConcurrentAdvance`.
    async fn advance_transition(
        &self,
        application_id: &ApplicationId,
        expected_open: Option<TransitionId>,
        new_transition: StageTransition,
        new_status: String,
        history: StatusHistoryEntry,
    ) -> Result<(), StoreError>;

    /// Append a history entry without moving a stage (used by bulk
    /// status-only actions).
    async fn put_history(&self, entry: StatusHistoryEntry) -> Result<(), StoreError>;

    /// Atomically set the application's denormalized `status` and
    /// append `history`, without opening or closing any transition.
    /// Used by bulk `set_status`/`reject`/`approve` actions, which move
    /// the status label without moving the stage pipeline position.
    async fn set_status(
        &self,
        application_id: &ApplicationId,
        new_status: String,
        history: StatusHistoryEntry,
    ) -> Result<(), StoreError>;

    async fn list_history_for_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Vec<StatusHistoryEntry>, StoreError>;

    /// Atomically insert `escalation` and mark the referenced transition
    /// escalated. Returns `StoreError::Conflict` if the transition was
    /// already escalated at the time of the write.
    async fn escalate(&self, escalation: Escalation) -> Result<(), StoreError>;

    async fn get_escalation(&self, id: &EscalationId) -> Result<Escalation, StoreError>;

    /// The unresolved escalation already on a transition, if any —
    /// used by `EscalationService::escalate` to return the existing row
    /// on the idempotent-skip path instead of erroring.
    async fn get_escalation_for_transition(
        &self,
        transition_id: &TransitionId,
    ) -> Result<Option<Escalation>, StoreError>;

    /// Requires the escalation to currently be unresolved; returns
    /// `StoreError::Conflict` otherwise.
    async fn resolve_escalation(
        &self,
        id: &EscalationId,
        resolver: UserId,
        resolved_at: EpochMs,
    ) -> Result<Escalation, StoreError>;

    async fn list_escalations_for_user(
        &self,
        user: &UserId,
        unresolved_only: bool,
    ) -> Result<Vec<Escalation>, StoreError>;
}
