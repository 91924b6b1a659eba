// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Escalation identifier and record.
//!
//! An escalation's `severity` reflects overdue duration at creation time
//! and is never mutated after creation; resolution mutates only the
//! resolved fields. The transition holds only a boolean + assignee; this
//! row is the source of truth for severity, reason, and resolution.

use crate::application::ApplicationId;
use crate::ids::UserId;
use crate::time::EpochMs;
use crate::transition::TransitionId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for an escalation.
    pub struct EscalationId("esc-");
}

/// Classification of an escalation by overdue duration at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
    Overdue,
}

crate::simple_display! {
    Severity {
        Warning => "warning",
        Critical => "critical",
        Overdue => "overdue",
    }
}

impl Severity {
    /// Classify overdue hours per the configured caps.
    pub fn classify(overdue_hours: f64, warning_cap: u32, critical_cap: u32) -> Self {
        if overdue_hours < f64::from(warning_cap) {
            Severity::Warning
        } else if overdue_hours < f64::from(critical_cap) {
            Severity::Critical
        } else {
            Severity::Overdue
        }
    }
}

/// A record that a transition breached its SLA, assigned to a
/// responsible user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    pub id: EscalationId,
    pub application_id: ApplicationId,
    pub transition_id: TransitionId,
    pub severity: Severity,
    pub assignee: UserId,
    pub reason: String,
    pub created_at: EpochMs,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<EpochMs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<UserId>,
}

impl Escalation {
    pub fn new(
        id: EscalationId,
        application_id: ApplicationId,
        transition_id: TransitionId,
        severity: Severity,
        assignee: UserId,
        reason: impl Into<String>,
        created_at: EpochMs,
    ) -> Self {
        Self {
            id,
            application_id,
            transition_id,
            severity,
            assignee,
            reason: reason.into(),
            created_at,
            resolved: false,
            resolved_at: None,
            resolved_by: None,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct EscalationBuilder => Escalation {
        set { id: EscalationId = EscalationId::new() }
        set { application_id: ApplicationId = ApplicationId::new() }
        set { transition_id: TransitionId = TransitionId::new() }
        set { severity: Severity = Severity::Warning }
        set { assignee: UserId = UserId::new() }
        into { reason: String = "SLA breach" }
        set { created_at: EpochMs = 0 }
        set { resolved: bool = false }
        option { resolved_at: EpochMs = None }
        option { resolved_by: UserId = None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classifies_by_cap_boundaries() {
        assert_eq!(Severity::classify(0.0, 24, 72), Severity::Warning);
        assert_eq!(Severity::classify(23.9, 24, 72), Severity::Warning);
        assert_eq!(Severity::classify(24.0, 24, 72), Severity::Critical);
        assert_eq!(Severity::classify(71.9, 24, 72), Severity::Critical);
        assert_eq!(Severity::classify(72.0, 24, 72), Severity::Overdue);
        assert_eq!(Severity::classify(1000.0, 24, 72), Severity::Overdue);
    }

    #[test]
    fn display_matches_snake_case_serde() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Overdue.to_string(), "overdue");
    }
}
