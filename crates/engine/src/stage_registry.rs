// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `StageRegistry`: per-job ordered stage definitions (§4.7).

use std::sync::Arc;

use ats_core::{JobId, Stage, StageId, StoreError};
use ats_storage::Store;

/// `(name, sla_hours)` the canonical default pipeline is built from.
pub use ats_core::DEFAULT_STAGE_SPECS;

/// Fallback SLA (hours) applied when `create_custom` is called with no
/// explicit `sla_hours` (§6's `default_stage_sla_hours`).
const DEFAULT_FALLBACK_SLA_HOURS: u32 = 72;

#[derive(Clone)]
pub struct StageRegistry {
    store: Arc<dyn Store>,
    default_sla_hours: u32,
}

impl StageRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store, default_sla_hours: DEFAULT_FALLBACK_SLA_HOURS }
    }

    /// As [`Self::new`], but with the configured `default_stage_sla_hours`
    /// (§6) used as the fallback for stages created without an explicit SLA.
    pub fn with_default_sla_hours(store: Arc<dyn Store>, default_sla_hours: u32) -> Self {
        Self { store, default_sla_hours }
    }

    /// Create the canonical six-stage sequence for a job, in order.
    pub async fn create_defaults(&self, job_id: JobId) -> Result<Vec<Stage>, StoreError> {
        let mut stages = Vec::with_capacity(DEFAULT_STAGE_SPECS.len());
        for (index, (name, sla_hours)) in DEFAULT_STAGE_SPECS.iter().enumerate() {
            let stage = Stage::new(StageId::new(), job_id, *name, (index + 1) as u32, *sla_hours);
            self.store.put_stage(stage.clone()).await?;
            stages.push(stage);
        }
        Ok(stages)
    }

    /// Create a custom stage. `order_index` must continue the existing
    /// prefix of positive integers for the job (§3 invariant 4) — the
    /// caller supplies the next index; this is enforced by construction
    /// rather than guessed. `sla_hours` of `None` falls back to the
    /// registry's configured `default_stage_sla_hours` (§6).
    pub async fn create_custom(
        &self,
        job_id: JobId,
        name: impl Into<String>,
        order_index: u32,
        sla_hours: Option<u32>,
        auto_advance_rules: Option<serde_json::Value>,
    ) -> Result<Stage, StoreError> {
        let sla_hours = sla_hours.unwrap_or(self.default_sla_hours);
        let mut stage = Stage::new(StageId::new(), job_id, name, order_index, sla_hours);
        stage.auto_advance_rules = auto_advance_rules;
        self.store.put_stage(stage.clone()).await?;
        Ok(stage)
    }

    pub async fn list_stages(&self, job_id: &JobId, include_inactive: bool) -> Result<Vec<Stage>, StoreError> {
        self.store.list_stages_for_job(job_id, include_inactive).await
    }
}
