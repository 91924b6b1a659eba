// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `NotificationPlanner`: a pure function from a transition event to the
//! notification intents it triggers (§4.6). All I/O (resolving contacts
//! through the `Directory` port) happens before this is called —
//! `plan` itself reads nothing and writes nothing.

use ats_core::{
    notification_id, render, template_for, ApplicationId, EpochMs, HistoryId, NotificationIntent,
    Recipient,
};

/// Statuses that trigger any notification at all.
const TRIGGERING_STATUSES: &[&str] = &[
    "screening",
    "interview",
    "technical_test",
    "final_interview",
    "offer",
    "hired",
    "rejected",
    "withdrawn",
];

/// Statuses that additionally notify the hiring manager.
const HIRING_MANAGER_STATUSES: &[&str] = &["interview", "offer", "hired", "rejected"];

/// Already-resolved facts about one status change — everything the
/// planner needs, with no further lookups required.
#[derive(Debug, Clone)]
pub struct TransitionEvent {
    pub application_id: ApplicationId,
    pub history_id: HistoryId,
    pub candidate_email: String,
    pub candidate_name: String,
    pub hiring_manager_email: String,
    pub hiring_manager_name: String,
    pub job_title: String,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_by_display: String,
    pub change_reason: Option<String>,
    pub history_timestamp: EpochMs,
    pub planned_at: EpochMs,
}

fn template_event_for(new_status: &str) -> &'static str {
    match new_status {
        "rejected" => "application_rejected",
        "hired" | "offer" => "application_approved",
        _ => "status_changed",
    }
}

fn build_intent(event: &TransitionEvent, id: &str, recipient: Recipient) -> NotificationIntent {
    let template_event = template_event_for(&event.new_status);
    let template = template_for(template_event);
    let values = [
        ("candidate_name", recipient.display_name.as_str()),
        ("job_title", event.job_title.as_str()),
        ("new_status", event.new_status.as_str()),
        ("application_id", event.application_id.as_str()),
    ];

    NotificationIntent {
        id: id.to_string(),
        application_id: event.application_id,
        recipient,
        event: template_event.to_string(),
        subject: render(template.subject, &values),
        body: render(template.body, &values),
        previous_status: event.previous_status.clone(),
        new_status: event.new_status.clone(),
        changed_by_display: event.changed_by_display.clone(),
        change_reason: event.change_reason.clone(),
        history_timestamp: event.history_timestamp,
        planned_at: event.planned_at,
        created_at: event.planned_at,
    }
}

/// `plan(transition_event) -> list<NotificationIntent>` (§4.6).
pub fn plan(event: &TransitionEvent) -> Vec<NotificationIntent> {
    if !TRIGGERING_STATUSES.contains(&event.new_status.as_str()) {
        return Vec::new();
    }

    let id = notification_id(&event.application_id, &event.history_id);

    let mut intents = vec![build_intent(
        event,
        &id,
        Recipient::candidate(event.candidate_email.clone(), event.candidate_name.clone()),
    )];

    if HIRING_MANAGER_STATUSES.contains(&event.new_status.as_str()) {
        intents.push(build_intent(
            event,
            &id,
            Recipient::job_creator(event.hiring_manager_email.clone(), event.hiring_manager_name.clone()),
        ));
    }

    intents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(new_status: &str) -> TransitionEvent {
        TransitionEvent {
            application_id: ApplicationId::new(),
            history_id: HistoryId::new(),
            candidate_email: "k@example.com".into(),
            candidate_name: "Kay Candidate".into(),
            hiring_manager_email: "m@example.com".into(),
            hiring_manager_name: "Morgan Manager".into(),
            job_title: "Staff Engineer".into(),
            previous_status: Some("applied".into()),
            new_status: new_status.into(),
            changed_by_display: "Ada Recruiter".into(),
            change_reason: None,
            history_timestamp: 10,
            planned_at: 10,
        }
    }

    #[test]
    fn non_triggering_status_produces_no_intents() {
        assert!(plan(&event("applied")).is_empty());
    }

    #[test]
    fn screening_notifies_only_candidate() {
        let intents = plan(&event("screening"));
        assert_eq!(intents.len(), 1);
        assert!(matches!(intents[0].recipient.kind, ats_core::RecipientType::Candidate));
    }

    #[test]
    fn interview_notifies_candidate_and_hiring_manager() {
        let intents = plan(&event("interview"));
        assert_eq!(intents.len(), 2);
        assert!(matches!(intents[0].recipient.kind, ats_core::RecipientType::Candidate));
        assert!(matches!(intents[1].recipient.kind, ats_core::RecipientType::JobCreator));
    }

    #[test]
    fn same_inputs_produce_same_notification_id() {
        let e = event("offer");
        let first = plan(&e);
        let second = plan(&e);
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[1].id, second[1].id);
    }

    #[test]
    fn rejected_renders_rejection_template() {
        let intents = plan(&event("rejected"));
        assert!(intents[0].body.contains("not to move forward") || intents[0].body.contains("Staff Engineer"));
    }
}
