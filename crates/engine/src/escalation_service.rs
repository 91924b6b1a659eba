// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `EscalationService`: escalation lifecycle — create, assign, resolve
//! (§4.4). Severity is computed by the caller (the `SLAMonitor`) or, if
//! omitted, by this service from the transition's overdue duration at
//! the moment of the call — the `escalate` op exposed to the request
//! layer (§6) accepts an optional severity for exactly that reason.

use std::sync::Arc;

use ats_adapters::{AuditEvent, AuditLogger, Directory, NotificationDispatcher};
use ats_core::{
    hours_between, render, template_for, Application, Clock, Escalation, EscalationError,
    EscalationId, NotificationIntent, Recipient, Severity, TransitionId, UserId,
};
use ats_storage::Store;

use crate::config::SlaConfig;

/// One unresolved escalation enriched with the facts `list_for_user`
/// needs to render without the caller re-joining application, stage,
/// and directory data itself (§4.4).
#[derive(Debug, Clone)]
pub struct EscalationView {
    pub escalation: Escalation,
    pub overdue_hours: f64,
    pub candidate_name: String,
    pub job_title: String,
    pub stage_name: String,
}

#[derive(Clone)]
pub struct EscalationService<C: Clock> {
    store: Arc<dyn Store>,
    clock: C,
    directory: Arc<dyn Directory>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    audit: Arc<dyn AuditLogger>,
    config: SlaConfig,
}

impl<C: Clock> EscalationService<C> {
    pub fn new(
        store: Arc<dyn Store>,
        clock: C,
        directory: Arc<dyn Directory>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        audit: Arc<dyn AuditLogger>,
        config: SlaConfig,
    ) -> Self {
        Self { store, clock, directory, dispatcher, audit, config }
    }

    /// Escalate `transition_id`. Idempotent: if the transition is
    /// already escalated, returns the existing unresolved row instead
    /// of creating a second one — a transition acquires at most one
    /// escalation across its lifetime (§4.3's exactly-once property).
    pub async fn escalate(
        &self,
        transition_id: TransitionId,
        severity: Option<Severity>,
    ) -> Result<Escalation, EscalationError> {
        let transition = self
            .store
            .get_transition(&transition_id)
            .await
            .map_err(|_| EscalationError::TransitionNotFound)?;

        if transition.is_escalated {
            return match self.store.get_escalation_for_transition(&transition_id).await? {
                Some(existing) => Ok(existing),
                None => Err(EscalationError::AlreadyEscalated),
            };
        }

        let now = self.clock.epoch_ms();
        let severity = severity.unwrap_or_else(|| {
            let overdue_hours = hours_between(transition.sla_deadline, now);
            Severity::classify(
                overdue_hours,
                self.config.severity_warning_cap_hours,
                self.config.severity_critical_cap_hours,
            )
        });

        let application = self
            .store
            .get_application(&transition.application_id)
            .await
            .map_err(|_| EscalationError::TransitionNotFound)?;
        let assignee = self
            .directory
            .job_creator(&application.job_id)
            .await
            .map_err(|e| EscalationError::StoreUnavailable(e.to_string()))?;

        let escalation = Escalation::new(
            EscalationId::new(),
            application.id,
            transition_id,
            severity,
            assignee,
            format!("SLA breach: {severity} overdue"),
            now,
        );

        if self.store.escalate(escalation.clone()).await.is_err() {
            // Lost a race with a concurrent escalate — the winner's row
            // is the source of truth; fall back to it rather than error
            // on a transition that is in fact already escalated.
            return match self.store.get_escalation_for_transition(&transition_id).await? {
                Some(existing) => Ok(existing),
                None => Err(EscalationError::AlreadyEscalated),
            };
        }

        tracing::warn!(
            transition_id = %transition_id,
            application_id = %application.id,
            severity = %severity,
            assignee = %assignee,
            "sla breach escalated"
        );

        self.audit
            .log(AuditEvent::new(
                "transition_escalated",
                "sla-monitor",
                now,
                serde_json::json!({
                    "transition_id": transition_id.to_string(),
                    "application_id": application.id.to_string(),
                    "severity": severity.to_string(),
                }),
            ))
            .await;

        self.notify_assignee(&escalation, &application, assignee).await;

        Ok(escalation)
    }

    /// Best-effort notification to the escalation's assignee. Never
    /// fails the escalation itself (§7).
    async fn notify_assignee(&self, escalation: &Escalation, application: &Application, assignee: UserId) {
        let Ok(contact) = self.directory.user_contact(&assignee).await else {
            tracing::warn!(escalation_id = %escalation.id, "assignee contact lookup failed, skipping escalation notification");
            return;
        };
        let job_title = self.directory.job_title(&application.job_id).await.unwrap_or_default();
        let severity_str = escalation.severity.to_string();

        let template = template_for("sla_escalation");
        let values = [
            ("application_id", application.id.as_str()),
            ("severity", severity_str.as_str()),
            ("job_title", job_title.as_str()),
        ];

        let recipient = Recipient::escalation_assignee(contact.email, contact.display_name);
        let intent = NotificationIntent {
            id: format!("notif-esc-{}", escalation.id),
            application_id: application.id,
            recipient,
            event: "sla_escalation".into(),
            subject: render(template.subject, &values),
            body: render(template.body, &values),
            previous_status: None,
            new_status: application.status.clone(),
            changed_by_display: "sla-monitor".into(),
            change_reason: Some(escalation.reason.clone()),
            history_timestamp: escalation.created_at,
            planned_at: escalation.created_at,
            created_at: escalation.created_at,
        };

        if let Err(e) = self.dispatcher.dispatch(&intent).await {
            tracing::warn!(notification_id = %intent.id, error = %e, "escalation notification dispatch failed");
        }
    }

    /// Requires `resolved = false`; mutates only the resolved fields
    /// (§3 invariant 6) — severity, reason, and the rest stay as
    /// written at creation.
    pub async fn resolve(
        &self,
        escalation_id: EscalationId,
        resolver: UserId,
    ) -> Result<Escalation, EscalationError> {
        let existing = self
            .store
            .get_escalation(&escalation_id)
            .await
            .map_err(|_| EscalationError::EscalationNotFound)?;
        if existing.resolved {
            return Err(EscalationError::AlreadyResolved);
        }

        let now = self.clock.epoch_ms();
        let resolved = self
            .store
            .resolve_escalation(&escalation_id, resolver, now)
            .await
            .map_err(|_| EscalationError::AlreadyResolved)?;

        tracing::info!(escalation_id = %escalation_id, %resolver, "escalation resolved");

        self.audit
            .log(AuditEvent::new(
                "escalation_resolved",
                resolver.to_string(),
                now,
                serde_json::json!({"escalation_id": escalation_id.to_string()}),
            ))
            .await;

        Ok(resolved)
    }

    /// Unresolved escalations assigned to `user`, enriched with derived
    /// overdue hours and display facts (§4.4).
    pub async fn list_for_user(&self, user: UserId) -> Result<Vec<EscalationView>, EscalationError> {
        let now = self.clock.epoch_ms();
        let escalations = self
            .store
            .list_escalations_for_user(&user, true)
            .await
            .map_err(|e| EscalationError::StoreUnavailable(e.to_string()))?;

        let mut views = Vec::with_capacity(escalations.len());
        for escalation in escalations {
            let transition = self.store.get_transition(&escalation.transition_id).await.ok();
            let application = self.store.get_application(&escalation.application_id).await.ok();

            let overdue_hours =
                transition.as_ref().map(|t| hours_between(t.sla_deadline, now)).unwrap_or(0.0);
            let stage_name = match &transition {
                Some(t) => self.store.get_stage(&t.stage_id).await.map(|s| s.name).unwrap_or_default(),
                None => String::new(),
            };
            let (candidate_name, job_title) = match &application {
                Some(app) => {
                    let candidate_name = self
                        .directory
                        .candidate_contact(&app.candidate_id)
                        .await
                        .map(|c| c.display_name)
                        .unwrap_or_default();
                    let job_title = self.directory.job_title(&app.job_id).await.unwrap_or_default();
                    (candidate_name, job_title)
                }
                None => (String::new(), String::new()),
            };

            views.push(EscalationView { escalation, overdue_hours, candidate_name, job_title, stage_name });
        }

        Ok(views)
    }
}

#[cfg(test)]
#[path = "escalation_service_tests.rs"]
mod tests;
