// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bulk-operation identifier and progress record (§4.5).
//!
//! `BulkCoordinator` (in `ats-engine`) owns the state machine that
//! fills these in; this module holds only the data shapes so the
//! progress record can be serialized to API responses and asserted on
//! in tests without reaching into the coordinator's internals.

use crate::application::ApplicationId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a bulk operation.
    pub struct BulkOpId("bop-");
}

/// Lifecycle state of a bulk operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOpStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

crate::simple_display! {
    BulkOpStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl BulkOpStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// One per-item failure, classified by the error kind that produced it
/// (the `Display` of the underlying `WorkflowError`/store failure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemError {
    pub application_id: ApplicationId,
    pub message: String,
}

impl BulkItemError {
    pub fn new(application_id: ApplicationId, message: impl Into<String>) -> Self {
        Self { application_id, message: message.into() }
    }
}

/// Observable progress for one bulk operation (§4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkProgress {
    pub op_id: BulkOpId,
    pub total: usize,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub status: BulkOpStatus,
    pub errors: Vec<BulkItemError>,
    pub started_at: crate::time::EpochMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<crate::time::EpochMs>,
}

impl BulkProgress {
    pub fn new(op_id: BulkOpId, total: usize, started_at: crate::time::EpochMs) -> Self {
        Self {
            op_id,
            total,
            processed: 0,
            successful: 0,
            failed: 0,
            status: BulkOpStatus::Pending,
            errors: Vec::new(),
            started_at,
            completed_at: None,
        }
    }

    /// `100 * processed / max(total, 1)`, rounded to two decimals.
    pub fn progress_percentage(&self) -> f64 {
        let raw = 100.0 * self.processed as f64 / self.total.max(1) as f64;
        (raw * 100.0).round() / 100.0
    }
}
