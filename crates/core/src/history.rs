// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status history identifier and record.
//!
//! An immutable audit record: every state-changing operation produces
//! exactly one of these. Never mutated or deleted once written.

use crate::application::ApplicationId;
use crate::ids::UserId;
use crate::time::EpochMs;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a status history entry.
    pub struct HistoryId("hst-");
}

/// Immutable audit record of a status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: HistoryId,
    pub application_id: ApplicationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_by: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_reason: Option<String>,
    pub created_at: EpochMs,
}

impl StatusHistoryEntry {
    pub fn new(
        id: HistoryId,
        application_id: ApplicationId,
        previous_status: Option<String>,
        new_status: impl Into<String>,
        changed_by: UserId,
        change_reason: Option<String>,
        created_at: EpochMs,
    ) -> Self {
        Self {
            id,
            application_id,
            previous_status,
            new_status: new_status.into(),
            changed_by,
            change_reason,
            created_at,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct StatusHistoryEntryBuilder => StatusHistoryEntry {
        set { id: HistoryId = HistoryId::new() }
        set { application_id: ApplicationId = ApplicationId::new() }
        option { previous_status: String = None }
        into { new_status: String = "applied" }
        set { changed_by: UserId = UserId::new() }
        option { change_reason: String = None }
        set { created_at: EpochMs = 0 }
    }
}
