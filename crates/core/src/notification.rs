// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification intents.
//!
//! `NotificationPlanner` (in `ats-engine`) turns a status change or
//! escalation into zero or more [`NotificationIntent`]s; dispatch itself
//! lives behind the `NotificationDispatcher` port in `ats-adapters`. The
//! core only models the intent and its template rendering — it never
//! sends anything.

use crate::application::ApplicationId;
use crate::time::EpochMs;
use serde::{Deserialize, Serialize};

/// Who a notification is addressed to, independent of their contact
/// details (resolved separately through the `Directory` port).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientType {
    Candidate,
    JobCreator,
    EscalationAssignee,
}

crate::simple_display! {
    RecipientType {
        Candidate => "candidate",
        JobCreator => "job_creator",
        EscalationAssignee => "escalation_assignee",
    }
}

/// A resolved notification target: its role and the contact details an
/// external dispatcher needs to actually address it (§4.6's
/// `recipients[]` entries: `{type, email, display_name}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub kind: RecipientType,
    pub email: String,
    pub display_name: String,
}

impl Recipient {
    pub fn candidate(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { kind: RecipientType::Candidate, email: email.into(), display_name: display_name.into() }
    }

    pub fn job_creator(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { kind: RecipientType::JobCreator, email: email.into(), display_name: display_name.into() }
    }

    pub fn escalation_assignee(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { kind: RecipientType::EscalationAssignee, email: email.into(), display_name: display_name.into() }
    }
}

/// A notification the planner decided should be sent, independent of
/// whether dispatch ever happens or succeeds.
///
/// One intent per recipient (the spec's `recipients[]` list collapses to
/// a single `recipient` here), but every intent produced for the same
/// transition event shares the same `id` — §4.6 defines
/// `notification_id` as `deterministic("notif", application_id,
/// history_id)` with no recipient component, and §8 Scenario 6 requires
/// the candidate's and hiring manager's intents for one status change
/// to carry the same id. The remaining fields are the flat payload from
/// §4.6: candidate/job facts, the before/after status, who made the
/// change and why, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub id: String,
    pub application_id: ApplicationId,
    pub recipient: Recipient,
    pub event: String,
    pub subject: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_by_display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_reason: Option<String>,
    pub history_timestamp: EpochMs,
    pub planned_at: EpochMs,
    pub created_at: EpochMs,
}

/// Derive a stable id for a transition event's notifications, per §4.6:
/// `deterministic("notif", application_id, history_id)`. Every recipient
/// of the same status change shares this one id — re-planning (e.g.
/// after a crash) never double-sends, and dispatch can dedupe on it.
pub fn notification_id(application_id: &ApplicationId, history_id: &crate::history::HistoryId) -> String {
    format!("notif-{application_id}-{history_id}")
}

/// One `(subject, body)` template, `{}`-style placeholders filled by the
/// planner. Falls back to [`GENERIC_TEMPLATE`] for unrecognized events.
pub struct Template {
    pub subject: &'static str,
    pub body: &'static str,
}

pub const GENERIC_TEMPLATE: Template = Template {
    subject: "Application update",
    body: "Your application status has changed.",
};

/// Templates keyed by event name, mirroring the status-change and
/// escalation notification copy from the original notification service.
pub const TEMPLATES: &[(&str, Template)] = &[
    (
        "status_changed",
        Template {
            subject: "Your application status has been updated",
            body: "Your application for {job_title} has moved to {new_status}.",
        },
    ),
    (
        "application_rejected",
        Template {
            subject: "Update on your application",
            body: "Thank you for applying to {job_title}. We have decided not to move forward at this time.",
        },
    ),
    (
        "application_approved",
        Template {
            subject: "Good news about your application",
            body: "Your application for {job_title} has advanced to the next stage.",
        },
    ),
    (
        "sla_escalation",
        Template {
            subject: "SLA breach: action required",
            body: "Application {application_id} has been in its current stage past the SLA deadline ({severity}).",
        },
    ),
];

/// Look up a template by event name, falling back to the generic one.
pub fn template_for(event: &str) -> &'static Template {
    TEMPLATES
        .iter()
        .find(|(name, _)| *name == event)
        .map(|(_, t)| t)
        .unwrap_or(&GENERIC_TEMPLATE)
}

/// Fill `{key}` placeholders in a template string from a flat key/value
/// list. Unknown placeholders are left as-is.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_display_is_snake_case() {
        assert_eq!(RecipientType::JobCreator.to_string(), "job_creator");
    }

    #[test]
    fn notification_id_is_deterministic() {
        let app = ApplicationId::new();
        let history_id = crate::history::HistoryId::new();
        let a = notification_id(&app, &history_id);
        let b = notification_id(&app, &history_id);
        assert_eq!(a, b);
    }

    #[test]
    fn notification_id_has_no_recipient_component() {
        let app = ApplicationId::new();
        let history_id = crate::history::HistoryId::new();
        // §4.6: the id is derived from (application_id, history_id) alone,
        // so every recipient of the same event shares it.
        assert_eq!(notification_id(&app, &history_id), notification_id(&app, &history_id));
    }

    #[test]
    fn unknown_event_falls_back_to_generic_template() {
        let t = template_for("no_such_event");
        assert_eq!(t.subject, GENERIC_TEMPLATE.subject);
    }

    #[test]
    fn render_fills_known_placeholders_and_ignores_unknown() {
        let out = render("Hello {name}, {missing}", &[("name", "Ada")]);
        assert_eq!(out, "Hello Ada, {missing}");
    }
}
