// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application identifier and record.
//!
//! The canonical "where is it?" answer comes from the application's open
//! `StageTransition`, not from `status` — `status` is a denormalized
//! read-optimization, refreshed only inside the same atomic write as the
//! transition (see `ats-storage::Store::advance_transition`).

use crate::ids::{CandidateId, JobId};
use crate::time::EpochMs;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for an application.
    pub struct ApplicationId("app-");
}

/// A candidate's submission to a specific job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    /// Denormalized mirror of the open transition's stage name,
    /// canonicalized via [`canonicalize_status`].
    pub status: String,
    pub created_at: EpochMs,
}

impl Application {
    pub fn new(
        id: ApplicationId,
        candidate_id: CandidateId,
        job_id: JobId,
        created_at: EpochMs,
    ) -> Self {
        Self { id, candidate_id, job_id, status: "applied".to_string(), created_at }
    }
}

/// Canonicalize a stage name into a status label: lowercase, spaces to
/// underscores.
pub fn canonicalize_status(stage_name: &str) -> String {
    stage_name.trim().to_lowercase().replace(' ', "_")
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct ApplicationBuilder => Application {
        set { id: ApplicationId = ApplicationId::new() }
        set { candidate_id: CandidateId = CandidateId::new() }
        set { job_id: JobId = JobId::new() }
        into { status: String = "applied" }
        set { created_at: EpochMs = 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_lowercases_and_replaces_spaces() {
        assert_eq!(canonicalize_status("Initial Screening"), "initial_screening");
        assert_eq!(canonicalize_status("Decision"), "decision");
        assert_eq!(canonicalize_status("  Final Review  "), "final_review");
    }

    #[test]
    fn new_application_starts_applied() {
        let app = Application::new(ApplicationId::new(), CandidateId::new(), JobId::new(), 0);
        assert_eq!(app.status, "applied");
    }

    #[test]
    fn builder_produces_application() {
        let app = Application::builder().status("interview").created_at(10).build();
        assert_eq!(app.status, "interview");
        assert_eq!(app.created_at, 10);
    }
}
