//! Repository-level error type.
//!
//! Most repository methods return plain `sqlx::Error`; the transactional
//! multi-step operations (batch confirm, materialization) additionally
//! surface domain outcomes the API layer must map to 409s.

use thesisflow_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// The guarded capacity increment found the lecturer selection full.
    #[error("Lecturer selection {selection_id} has no remaining capacity")]
    CapacityExhausted { selection_id: DbId },

    /// A guarded status flip found the row no longer in the expected state.
    #[error("Proposed project {project_id} is no longer in status {expected}")]
    StaleStatus {
        project_id: DbId,
        expected: &'static str,
    },

    /// An ACTIVE member row already exists for this (project, person).
    #[error("Person is already an active member of proposed project {project_id}")]
    DuplicateActiveMember { project_id: DbId },
}
