// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BulkCoordinator`: tracks multi-application operations with
//! observable progress, partial failure, and cooperative cancellation
//! (§4.5).
//!
//! Replaces the source's implicit-event-loop style with an explicit
//! task model (SPEC_FULL.md §9's "coroutine-style async" note): each
//! submission spawns one `tokio::task`; cancellation is a shared
//! `CancellationToken` rather than a global mutable flag.

use std::collections::HashMap;
use std::sync::Arc;

use ats_adapters::{AuditEvent, AuditLogger};
use ats_core::{
    ApplicationId, BulkError, BulkItemError, BulkOpId, BulkOpStatus, BulkProgress, Clock, EpochMs,
    StageId, UserId,
};
use ats_storage::Store;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::BulkRetentionConfig;
use crate::workflow::WorkflowEngine;

/// The per-application action a bulk operation applies (§4.5). `Reject`
/// and `Approve` are status-only shorthands over `set_status` with a
/// fixed target label; `MoveToStage` goes through `WorkflowEngine` like
/// a single `advance` call.
#[derive(Debug, Clone)]
pub enum BulkOperation {
    SetStatus { status: String },
    Reject { reason: Option<String> },
    Approve { reason: Option<String> },
    MoveToStage { stage_id: StageId },
}

impl BulkOperation {
    fn kind(&self) -> &'static str {
        match self {
            Self::SetStatus { .. } => "set_status",
            Self::Reject { .. } => "reject",
            Self::Approve { .. } => "approve",
            Self::MoveToStage { .. } => "move_to_stage",
        }
    }
}

struct Record {
    progress: BulkProgress,
    cancel: CancellationToken,
}

pub struct BulkCoordinator<C: Clock> {
    store: Arc<dyn Store>,
    clock: C,
    workflow: WorkflowEngine<C>,
    audit: Arc<dyn AuditLogger>,
    retention: BulkRetentionConfig,
    records: Arc<Mutex<HashMap<BulkOpId, Record>>>,
}

impl<C: Clock + 'static> Clone for BulkCoordinator<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
            workflow: self.workflow.clone(),
            audit: self.audit.clone(),
            retention: self.retention.clone(),
            records: self.records.clone(),
        }
    }
}

impl<C: Clock + 'static> BulkCoordinator<C> {
    pub fn new(
        store: Arc<dyn Store>,
        clock: C,
        workflow: WorkflowEngine<C>,
        audit: Arc<dyn AuditLogger>,
        retention: BulkRetentionConfig,
    ) -> Self {
        Self { store, clock, workflow, audit, retention, records: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Validate every application id exists; on any miss, fail
    /// atomically with no record created (§4.5's pre-submission
    /// validation). Otherwise spawn the worker and return immediately
    /// with `status = pending`.
    pub async fn submit(
        &self,
        application_ids: Vec<ApplicationId>,
        operation: BulkOperation,
        actor: UserId,
    ) -> Result<BulkOpId, BulkError> {
        let mut missing = Vec::new();
        for id in &application_ids {
            if self.store.get_application(id).await.is_err() {
                missing.push(id.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(BulkError::UnknownApplications(missing));
        }

        self.evict_expired();

        let op_id = BulkOpId::new();
        let now = self.clock.epoch_ms();
        let progress = BulkProgress::new(op_id, application_ids.len(), now);
        let cancel = CancellationToken::new();
        self.records.lock().insert(op_id, Record { progress, cancel: cancel.clone() });

        tracing::info!(%op_id, kind = operation.kind(), total = application_ids.len(), "bulk operation submitted");

        let worker = self.clone();
        tokio::spawn(async move {
            worker.run(op_id, application_ids, operation, actor, cancel).await;
        });

        Ok(op_id)
    }

    async fn run(
        &self,
        op_id: BulkOpId,
        application_ids: Vec<ApplicationId>,
        operation: BulkOperation,
        actor: UserId,
        cancel: CancellationToken,
    ) {
        self.set_status(op_id, BulkOpStatus::Running);
        let total = application_ids.len();
        let mut cancelled = false;

        for application_id in application_ids {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let outcome = self.apply_one(application_id, &operation, actor).await;
            self.record_item_result(op_id, application_id, outcome);

            // cooperative suspension point: lets a concurrent cancel()
            // or get_progress() observe a consistent snapshot between
            // items (§5).
            tokio::task::yield_now().await;
        }

        let now = self.clock.epoch_ms();
        let final_status = {
            let mut records = self.records.lock();
            let Some(record) = records.get_mut(&op_id) else { return };
            record.progress.status = if cancelled {
                BulkOpStatus::Cancelled
            } else if record.progress.successful > 0 || total == 0 {
                BulkOpStatus::Completed
            } else {
                BulkOpStatus::Failed
            };
            record.progress.completed_at = Some(now);
            record.progress.status
        };

        tracing::info!(%op_id, status = %final_status, "bulk operation finished");

        self.audit
            .log(AuditEvent::new(
                "bulk_operation_finished",
                actor.to_string(),
                now,
                serde_json::json!({"op_id": op_id.to_string(), "status": final_status.to_string()}),
            ))
            .await;
    }

    async fn apply_one(
        &self,
        application_id: ApplicationId,
        operation: &BulkOperation,
        actor: UserId,
    ) -> Result<(), String> {
        match operation {
            BulkOperation::SetStatus { status } => self
                .workflow
                .set_status(application_id, status.clone(), actor, None)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            BulkOperation::Reject { reason } => self
                .workflow
                .set_status(application_id, "rejected", actor, reason.clone())
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            BulkOperation::Approve { reason } => self
                .workflow
                .set_status(application_id, "approved", actor, reason.clone())
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            BulkOperation::MoveToStage { stage_id } => self
                .workflow
                .advance(application_id, *stage_id, actor, None)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
        }
    }

    fn record_item_result(&self, op_id: BulkOpId, application_id: ApplicationId, outcome: Result<(), String>) {
        let mut records = self.records.lock();
        let Some(record) = records.get_mut(&op_id) else { return };
        match outcome {
            Ok(()) => record.progress.successful += 1,
            Err(message) => {
                record.progress.failed += 1;
                record.progress.errors.push(BulkItemError::new(application_id, message));
            }
        }
        // processed = successful + failed always (§8 invariant).
        record.progress.processed += 1;
    }

    fn set_status(&self, op_id: BulkOpId, status: BulkOpStatus) {
        if let Some(record) = self.records.lock().get_mut(&op_id) {
            record.progress.status = status;
        }
    }

    pub fn get_progress(&self, op_id: BulkOpId) -> Result<BulkProgress, BulkError> {
        self.records.lock().get(&op_id).map(|r| r.progress.clone()).ok_or(BulkError::OperationNotFound)
    }

    /// Cooperative cancel: the worker stops dispatching new items at
    /// its next per-item boundary; already-applied items remain applied
    /// (§4.5).
    pub fn cancel(&self, op_id: BulkOpId) -> Result<(), BulkError> {
        let records = self.records.lock();
        let record = records.get(&op_id).ok_or(BulkError::OperationNotFound)?;
        if record.progress.status.is_terminal() {
            return Err(BulkError::OperationTerminal);
        }
        record.cancel.cancel();
        Ok(())
    }

    /// Only valid once the operation has reached a terminal state.
    pub fn cleanup(&self, op_id: BulkOpId) -> Result<(), BulkError> {
        let mut records = self.records.lock();
        match records.get(&op_id) {
            None => Err(BulkError::OperationNotFound),
            Some(record) if !record.progress.status.is_terminal() => Err(BulkError::OperationInProgress),
            Some(_) => {
                records.remove(&op_id);
                Ok(())
            }
        }
    }

    /// Resolves Open Question (b): evict terminal records past their
    /// TTL, then oldest-terminal-first past the retention bound.
    /// Checked passively on `submit` rather than on a timer, since
    /// retention is a cosmetic concern that doesn't warrant a second
    /// background task.
    fn evict_expired(&self) {
        let now = self.clock.epoch_ms();
        let ttl_ms = self.retention.terminal_ttl_secs.saturating_mul(1_000);
        let mut records = self.records.lock();

        records.retain(|_, record| match record.progress.completed_at {
            Some(completed_at) => now.saturating_sub(completed_at) < ttl_ms,
            None => true,
        });

        if records.len() > self.retention.max_retained_operations {
            let mut terminal: Vec<(BulkOpId, EpochMs)> = records
                .iter()
                .filter(|(_, r)| r.progress.status.is_terminal())
                .map(|(id, r)| (*id, r.progress.completed_at.unwrap_or(0)))
                .collect();
            terminal.sort_by_key(|(_, at)| *at);

            let overflow = records.len() - self.retention.max_retained_operations;
            for (id, _) in terminal.into_iter().take(overflow) {
                records.remove(&id);
            }
        }
    }
}

#[cfg(test)]
#[path = "bulk_coordinator_tests.rs"]
mod tests;
