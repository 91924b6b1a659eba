// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `NotificationDispatcher`: consumes the intents `NotificationPlanner`
//! produces. Best-effort — per §7, dispatch failures are logged and
//! never fail the producing transition.

use async_trait::async_trait;
use ats_core::NotificationIntent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, intent: &NotificationIntent) -> Result<(), DispatchError>;
}

/// Default dispatcher: logs the intent at `info` and returns. Stands in
/// for the real outer-layer dispatcher (email/SMS/webhook), which is
/// explicitly out of scope for the core (§1).
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotificationDispatcher;

#[async_trait]
impl NotificationDispatcher for LoggingNotificationDispatcher {
    async fn dispatch(&self, intent: &NotificationIntent) -> Result<(), DispatchError> {
        tracing::info!(
            notification_id = %intent.id,
            application_id = %intent.application_id,
            recipient = %intent.recipient.email,
            recipient_kind = %intent.recipient.kind,
            subject = %intent.subject,
            "dispatching notification"
        );
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{DispatchError, NotificationDispatcher};
    use async_trait::async_trait;
    use ats_core::NotificationIntent;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records every dispatched intent; can be configured to fail the
    /// next N calls to exercise the "failed notification doesn't fail
    /// the transition" property.
    #[derive(Clone, Default)]
    pub struct FakeNotificationDispatcher {
        sent: Arc<Mutex<Vec<NotificationIntent>>>,
        fail_next: Arc<Mutex<usize>>,
    }

    impl FakeNotificationDispatcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_next(&self, n: usize) {
            *self.fail_next.lock() = n;
        }

        pub fn sent(&self) -> Vec<NotificationIntent> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl NotificationDispatcher for FakeNotificationDispatcher {
        async fn dispatch(&self, intent: &NotificationIntent) -> Result<(), DispatchError> {
            let mut remaining = self.fail_next.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DispatchError::Failed("fake dispatch failure".into()));
            }
            drop(remaining);
            self.sent.lock().push(intent.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotificationDispatcher;

#[cfg(test)]
mod tests {
    use super::*;
    use ats_core::{Recipient, notification_id};

    fn intent() -> NotificationIntent {
        let application_id = ats_core::ApplicationId::new();
        let history_id = ats_core::HistoryId::new();
        let recipient = Recipient::candidate("k@example.com", "Kay Candidate");
        NotificationIntent {
            id: notification_id(&application_id, &history_id),
            application_id,
            recipient,
            event: "status_changed".into(),
            subject: "subject".into(),
            body: "body".into(),
            previous_status: Some("applied".into()),
            new_status: "interview".into(),
            changed_by_display: "Ada Recruiter".into(),
            change_reason: None,
            history_timestamp: 0,
            planned_at: 0,
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn logging_dispatcher_always_succeeds() {
        let dispatcher = LoggingNotificationDispatcher;
        assert!(dispatcher.dispatch(&intent()).await.is_ok());
    }

    #[tokio::test]
    async fn fake_dispatcher_records_and_can_fail_on_demand() {
        let dispatcher = FakeNotificationDispatcher::new();
        dispatcher.fail_next(1);
        assert!(dispatcher.dispatch(&intent()).await.is_err());
        assert!(dispatcher.dispatch(&intent()).await.is_ok());
        assert_eq!(dispatcher.sent().len(), 1);
    }
}
