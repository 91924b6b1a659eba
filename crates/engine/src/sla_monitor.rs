// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SLAMonitor`: single long-lived background task that periodically
//! classifies and escalates SLA breaches (§4.3).
//!
//! One task per process — the daemon spawns it once and coordinates its
//! lifetime with the process (Ctrl-C / SIGTERM), never per request.

use std::sync::Arc;

use ats_core::{hours_between, Clock, EpochMs, Severity, StageTransition, StoreError};
use ats_storage::Store;
use tokio_util::sync::CancellationToken;

use crate::config::SlaConfig;
use crate::escalation_service::EscalationService;

pub struct SLAMonitor<C: Clock> {
    store: Arc<dyn Store>,
    clock: C,
    escalation_service: EscalationService<C>,
    config: SlaConfig,
    cancel: CancellationToken,
}

impl<C: Clock> SLAMonitor<C> {
    pub fn new(
        store: Arc<dyn Store>,
        clock: C,
        escalation_service: EscalationService<C>,
        config: SlaConfig,
    ) -> Self {
        Self { store, clock, escalation_service, config, cancel: CancellationToken::new() }
    }

    /// A token the owner can hold to request a cooperative stop —
    /// `cancel()` on it causes `run` to exit before its next sleep
    /// (§4.3's cancellation contract: an in-progress scan finishes its
    /// current item first; no new escalations are written after stop).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The exposed `check_overdue` operation (§6): open transitions
    /// past their SLA deadline, with no classification or escalation
    /// side effect.
    pub async fn check_overdue(&self) -> Result<Vec<StageTransition>, StoreError> {
        self.store.list_open_overdue(self.clock.epoch_ms()).await
    }

    /// Run the scan loop until `cancel` fires. Sleeps `scan_interval`
    /// between scans; on scan failure, sleeps `scan_backoff_on_error`
    /// once before retrying (§4.3 step 1).
    pub async fn run(self) {
        let mut interval = self.config.scan_interval();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("sla monitor stopping before next scan");
                    return;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            match self.scan_once().await {
                Ok(escalated) => {
                    interval = self.config.scan_interval();
                    tracing::info!(escalated, "sla scan complete");
                }
                Err(error) => {
                    interval = self.config.scan_backoff_on_error();
                    tracing::warn!(%error, "sla scan failed, backing off");
                }
            }
        }
    }

    /// One pass: classify and escalate every currently-overdue open
    /// transition. Returns the number of transitions escalated by this
    /// pass (escalations skipped as already-escalated don't count).
    async fn scan_once(&self) -> Result<usize, StoreError> {
        let now: EpochMs = self.clock.epoch_ms();
        let overdue = self.store.list_open_overdue(now).await?;
        let mut escalated = 0;

        for transition in overdue {
            if self.cancel.is_cancelled() {
                // Cooperative stop: finish nothing new, return what
                // this pass already escalated.
                break;
            }

            let overdue_hours = hours_between(transition.sla_deadline, now);
            let severity = Severity::classify(
                overdue_hours,
                self.config.severity_warning_cap_hours,
                self.config.severity_critical_cap_hours,
            );

            match self.escalation_service.escalate(transition.id, Some(severity)).await {
                Ok(_) => escalated += 1,
                Err(error) => {
                    tracing::warn!(transition_id = %transition.id, %error, "escalation failed during sla scan");
                }
            }
        }

        Ok(escalated)
    }
}

#[cfg(test)]
#[path = "sla_monitor_tests.rs"]
mod tests;
