// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AuditLogger`: fire-and-forget audit trail for state-changing
//! operations, independent of the `StatusHistoryEntry` the engine writes
//! through the `Store` — this is the operational/security audit log,
//! not the domain history.

use async_trait::async_trait;
use ats_core::EpochMs;
use serde::{Deserialize, Serialize};

/// A single audited fact. `data` carries event-specific fields as a
/// flat JSON object (e.g. `{"application_id": "...", "target_stage":
/// "..."}"`) — structurally opaque to the logger itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub kind: String,
    pub actor: String,
    pub at: EpochMs,
    pub data: serde_json::Value,
}

impl AuditEvent {
    pub fn new(kind: impl Into<String>, actor: impl Into<String>, at: EpochMs, data: serde_json::Value) -> Self {
        Self { kind: kind.into(), actor: actor.into(), at, data }
    }
}

#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log(&self, event: AuditEvent);
}

/// Default logger: emits one structured `tracing` line per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLogger;

#[async_trait]
impl AuditLogger for TracingAuditLogger {
    async fn log(&self, event: AuditEvent) {
        tracing::info!(kind = %event.kind, actor = %event.actor, at = event.at, data = %event.data, "audit");
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{AuditEvent, AuditLogger};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub struct FakeAuditLogger {
        events: Arc<Mutex<Vec<AuditEvent>>>,
    }

    impl FakeAuditLogger {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<AuditEvent> {
            self.events.lock().clone()
        }
    }

    #[async_trait]
    impl AuditLogger for FakeAuditLogger {
        async fn log(&self, event: AuditEvent) {
            self.events.lock().push(event);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAuditLogger;
