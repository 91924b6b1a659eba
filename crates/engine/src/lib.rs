// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ats-engine: the stateful engines the spec calls for —
//! `WorkflowEngine` (the state machine), `SLAMonitor` (the breach
//! detector), `EscalationService` (escalation lifecycle),
//! `BulkCoordinator` (observable bulk transitions), `StageRegistry`
//! (per-job pipeline definitions), and `NotificationPlanner` (the pure
//! transition-event-to-intents function). Everything here is generic
//! over `ats_core::Clock` so a `FakeClock` drives every test; all I/O
//! goes through `ats_storage::Store` and the `ats_adapters` ports.

pub mod bulk_coordinator;
pub mod config;
pub mod escalation_service;
pub mod notification_planner;
pub mod sla_monitor;
pub mod stage_registry;
pub mod workflow;

pub use bulk_coordinator::{BulkCoordinator, BulkOperation};
pub use config::{BulkRetentionConfig, EngineConfig, SlaConfig};
pub use escalation_service::{EscalationService, EscalationView};
pub use notification_planner::TransitionEvent;
pub use sla_monitor::SLAMonitor;
pub use stage_registry::StageRegistry;
pub use workflow::{TimelineEntry, WorkflowEngine};
