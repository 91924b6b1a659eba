// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage transition identifier and record.
//!
//! A transition is the interval an application spent (or is spending) in
//! a stage. At most one transition per application has `exited_at =
//! None` — the *open transition*. `sla_deadline` is computed once at
//! creation (`entered_at + stage.sla_hours`) and never mutated.

use crate::application::ApplicationId;
use crate::ids::UserId;
use crate::stage::StageId;
use crate::time::EpochMs;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a stage transition.
    pub struct TransitionId("trn-");
}

/// The interval an application spent (or is spending) in a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTransition {
    pub id: TransitionId,
    pub application_id: ApplicationId,
    pub stage_id: StageId,
    pub entered_at: EpochMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exited_at: Option<EpochMs>,
    pub sla_deadline: EpochMs,
    pub is_escalated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalated_at: Option<EpochMs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalated_to_user: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StageTransition {
    pub fn open(
        id: TransitionId,
        application_id: ApplicationId,
        stage_id: StageId,
        entered_at: EpochMs,
        sla_deadline: EpochMs,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            application_id,
            stage_id,
            entered_at,
            exited_at: None,
            sla_deadline,
            is_escalated: false,
            escalated_at: None,
            escalated_to_user: None,
            notes,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }

    /// Hours spent in this stage, or `None` while the transition is open.
    pub fn duration_hours(&self) -> Option<f64> {
        self.exited_at.map(|exited| crate::time::hours_between(self.entered_at, exited))
    }

    pub fn is_overdue(&self, now: EpochMs) -> bool {
        self.is_open() && !self.is_escalated && self.sla_deadline < now
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct StageTransitionBuilder => StageTransition {
        set { id: TransitionId = TransitionId::new() }
        set { application_id: ApplicationId = ApplicationId::new() }
        set { stage_id: StageId = StageId::new() }
        set { entered_at: EpochMs = 0 }
        option { exited_at: EpochMs = None }
        set { sla_deadline: EpochMs = 24 * 3_600_000 }
        set { is_escalated: bool = false }
        option { escalated_at: EpochMs = None }
        option { escalated_to_user: UserId = None }
        option { notes: String = None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition() -> StageTransition {
        StageTransition::open(
            TransitionId::new(),
            ApplicationId::new(),
            StageId::new(),
            1_000,
            1_000 + 24 * 3_600_000,
            None,
        )
    }

    #[test]
    fn open_transition_has_no_duration() {
        assert_eq!(transition().duration_hours(), None);
    }

    #[test]
    fn closed_transition_computes_duration() {
        let mut t = transition();
        t.exited_at = Some(t.entered_at + 3_600_000 * 3);
        assert_eq!(t.duration_hours(), Some(3.0));
    }

    #[test]
    fn overdue_requires_open_and_unescalated_and_past_deadline() {
        let mut t = transition();
        assert!(!t.is_overdue(t.sla_deadline - 1));
        assert!(t.is_overdue(t.sla_deadline + 1));
        t.is_escalated = true;
        assert!(!t.is_overdue(t.sla_deadline + 1));
    }
}
