// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the workflow engine.
//!
//! One enum per failure domain, matching the operations that can produce
//! it. Infrastructure errors (`StoreError`) are mapped into the
//! domain-specific enums at the boundary rather than leaked to callers.

use thiserror::Error;

/// Errors from the abstract persistence layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from `WorkflowEngine` operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("application not found")]
    ApplicationNotFound,
    #[error("stage not found or not active")]
    StageNotFound,
    #[error("stage does not belong to the application's job")]
    StageNotForApplicationJob,
    #[error("concurrent advance: open transition changed before this advance committed")]
    ConcurrentAdvance,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for WorkflowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => WorkflowError::StoreUnavailable(msg),
            StoreError::Conflict(_) => WorkflowError::ConcurrentAdvance,
            StoreError::Unavailable(msg) => WorkflowError::StoreUnavailable(msg),
        }
    }
}

/// Errors from `EscalationService` operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscalationError {
    #[error("transition not found")]
    TransitionNotFound,
    #[error("transition already escalated")]
    AlreadyEscalated,
    #[error("escalation not found")]
    EscalationNotFound,
    #[error("escalation already resolved")]
    AlreadyResolved,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for EscalationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => EscalationError::StoreUnavailable(msg),
            StoreError::Conflict(_) => EscalationError::AlreadyEscalated,
            StoreError::Unavailable(msg) => EscalationError::StoreUnavailable(msg),
        }
    }
}

/// Errors from `BulkCoordinator` operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BulkError {
    #[error("unknown applications: {0:?}")]
    UnknownApplications(Vec<String>),
    #[error("operation not found")]
    OperationNotFound,
    #[error("operation still in progress")]
    OperationInProgress,
    #[error("operation already terminal")]
    OperationTerminal,
}

/// Errors from the `Directory` external-collaborator port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("unknown job: {0}")]
    UnknownJob(String),
    #[error("unknown candidate: {0}")]
    UnknownCandidate(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
}
