// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Directory`: read-only access to job/candidate/user facts owned by
//! the excluded CRUD layers (SPEC_FULL.md §3.1). The engine never writes
//! through this port.
//!
//! There is no real external CRUD service inside this workspace to call
//! out to — that layer is out of scope per §1 — so [`InMemoryDirectory`]
//! doubles as both the production-shaped default (wired by the daemon
//! and CLI, seeded the same way applications/stages are) and the thing
//! engine tests construct directly. A deployment with a real
//! candidates/jobs/users service would implement [`Directory`] as an
//! HTTP or database client instead.

use async_trait::async_trait;
use ats_core::{CandidateId, Contact, DirectoryError, JobId, UserId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[async_trait]
pub trait Directory: Send + Sync {
    async fn job_creator(&self, job_id: &JobId) -> Result<UserId, DirectoryError>;
    async fn job_title(&self, job_id: &JobId) -> Result<String, DirectoryError>;
    async fn candidate_contact(&self, candidate_id: &CandidateId) -> Result<Contact, DirectoryError>;
    async fn user_contact(&self, user_id: &UserId) -> Result<Contact, DirectoryError>;
}

#[derive(Default)]
struct Tables {
    job_creators: HashMap<JobId, UserId>,
    job_titles: HashMap<JobId, String>,
    candidate_contacts: HashMap<CandidateId, Contact>,
    user_contacts: HashMap<UserId, Contact>,
}

/// In-memory directory, seeded up front with the job/candidate/user
/// facts the engine needs to read.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_job(&self, job_id: JobId, creator: UserId, title: impl Into<String>) {
        let mut tables = self.tables.lock();
        tables.job_creators.insert(job_id, creator);
        tables.job_titles.insert(job_id, title.into());
    }

    pub fn put_candidate(&self, candidate_id: CandidateId, contact: Contact) {
        self.tables.lock().candidate_contacts.insert(candidate_id, contact);
    }

    pub fn put_user(&self, user_id: UserId, contact: Contact) {
        self.tables.lock().user_contacts.insert(user_id, contact);
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn job_creator(&self, job_id: &JobId) -> Result<UserId, DirectoryError> {
        self.tables
            .lock()
            .job_creators
            .get(job_id)
            .copied()
            .ok_or_else(|| DirectoryError::UnknownJob(job_id.to_string()))
    }

    async fn job_title(&self, job_id: &JobId) -> Result<String, DirectoryError> {
        self.tables
            .lock()
            .job_titles
            .get(job_id)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownJob(job_id.to_string()))
    }

    async fn candidate_contact(&self, candidate_id: &CandidateId) -> Result<Contact, DirectoryError> {
        self.tables
            .lock()
            .candidate_contacts
            .get(candidate_id)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownCandidate(candidate_id.to_string()))
    }

    async fn user_contact(&self, user_id: &UserId) -> Result<Contact, DirectoryError> {
        self.tables
            .lock()
            .user_contacts
            .get(user_id)
            .cloned()
            .ok_or_else(|| DirectoryError::UnknownUser(user_id.to_string()))
    }
}
