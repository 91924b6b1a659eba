// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage identifier and record.
//!
//! Stage `order_index` values per job form a prefix of the positive
//! integers without duplicates (enforced by `StageRegistry`, not by this
//! type). Stages with `active = false` are invisible to advancement but
//! remain referenced by historical transitions — they are never deleted.

use crate::ids::JobId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a stage.
    pub struct StageId("stg-");
}

/// A named position in a job's ordered pipeline, with an SLA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub job_id: JobId,
    pub name: String,
    pub order_index: u32,
    pub sla_hours: u32,
    pub active: bool,
    /// Opaque structured document interpreted by an external rules
    /// evaluator; the core passes it through unmodified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_advance_rules: Option<serde_json::Value>,
}

impl Stage {
    pub fn new(id: StageId, job_id: JobId, name: impl Into<String>, order_index: u32, sla_hours: u32) -> Self {
        Self {
            id,
            job_id,
            name: name.into(),
            order_index,
            sla_hours,
            active: true,
            auto_advance_rules: None,
        }
    }
}

/// `(name, sla_hours)` pairs for the canonical default pipeline, in
/// ascending `order_index` starting at 1.
pub const DEFAULT_STAGE_SPECS: &[(&str, u32)] = &[
    ("Applied", 24),
    ("Initial Screening", 48),
    ("Technical Assessment", 72),
    ("Interview", 96),
    ("Final Review", 48),
    ("Decision", 24),
];

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct StageBuilder => Stage {
        set { id: StageId = StageId::new() }
        set { job_id: JobId = JobId::new() }
        into { name: String = "Applied" }
        set { order_index: u32 = 1 }
        set { sla_hours: u32 = 24 }
        set { active: bool = true }
        option { auto_advance_rules: serde_json::Value = None }
    }
}
