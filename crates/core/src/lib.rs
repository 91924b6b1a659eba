// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ats-core: domain types for the job application workflow and SLA engine.
//!
//! This crate holds only data and pure functions — no I/O, no storage,
//! no dispatch. Persistence lives behind `ats-storage::Store`; the
//! stateful engines live in `ats-engine`; external collaborators
//! (notifications, audit, directory lookups) live behind ports in
//! `ats-adapters`.

pub mod macros;

pub mod application;
pub mod bulk;
pub mod clock;
pub mod error;
pub mod escalation;
pub mod history;
pub mod id;
pub mod ids;
pub mod notification;
#[cfg(test)]
mod property_tests;
pub mod stage;
pub mod time;
pub mod transition;

pub use application::{canonicalize_status, Application, ApplicationId};
#[cfg(any(test, feature = "test-support"))]
pub use application::ApplicationBuilder;
pub use bulk::{BulkItemError, BulkOpId, BulkOpStatus, BulkProgress};
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{BulkError, DirectoryError, EscalationError, StoreError, WorkflowError};
pub use escalation::{Escalation, EscalationId, Severity};
#[cfg(any(test, feature = "test-support"))]
pub use escalation::EscalationBuilder;
pub use history::{HistoryId, StatusHistoryEntry};
#[cfg(any(test, feature = "test-support"))]
pub use history::StatusHistoryEntryBuilder;
pub use id::short;
pub use ids::{CandidateId, Contact, JobId, UserId};
pub use notification::{
    notification_id, render, template_for, NotificationIntent, Recipient, RecipientType, Template,
    GENERIC_TEMPLATE, TEMPLATES,
};
pub use stage::{Stage, StageId, DEFAULT_STAGE_SPECS};
#[cfg(any(test, feature = "test-support"))]
pub use stage::StageBuilder;
pub use time::{add_hours, hours_between, EpochMs};
pub use transition::{StageTransition, TransitionId};
#[cfg(any(test, feature = "test-support"))]
pub use transition::StageTransitionBuilder;
