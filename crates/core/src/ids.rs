// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers and contact facts for entities owned by the excluded
//! CRUD layers (jobs, candidates, users). The workflow engine only ever
//! holds these ids by reference; the facts behind them are read through
//! the `Directory` port (see `ats-adapters`).

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier for a job posting. Jobs themselves are owned by the
    /// excluded CRUD layer; the engine only scopes stages and
    /// applications by this id.
    pub struct JobId("job-");
}

crate::define_id! {
    /// Identifier for a candidate. Candidate records are owned by the
    /// excluded CRUD layer.
    pub struct CandidateId("cnd-");
}

crate::define_id! {
    /// Identifier for a user (recruiter, hiring manager, admin). User
    /// records are owned by the excluded CRUD layer.
    pub struct UserId("usr-");
}

/// Display name and email for a candidate or user, as read through the
/// `Directory` port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub display_name: String,
}

impl Contact {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { email: email.into(), display_name: display_name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_roundtrips_through_display() {
        let id = JobId::new();
        let parsed = JobId::from_string(id.to_string());
        assert_eq!(id, parsed);
    }

    #[test]
    fn contact_builder() {
        let c = Contact::new("a@example.com", "A Name");
        assert_eq!(c.email, "a@example.com");
        assert_eq!(c.display_name, "A Name");
    }
}
