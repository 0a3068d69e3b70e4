//! Project allocation models and the auto-propose preview DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thesisflow_core::types::{DbId, Timestamp};

/// A row from the `project_allocations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectAllocation {
    pub id: DbId,
    pub student_id: DbId,
    pub lecturer_id: Option<DbId>,
    pub topic_title: String,
    pub created_by_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an allocation directly (outside the matching pipeline).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAllocation {
    pub student_id: DbId,
    pub lecturer_id: Option<DbId>,
    pub topic_title: String,
}

/// An allocation stub produced by the matching preview. Nothing is
/// persisted until the stubs are posted back to the confirm endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStub {
    pub student_id: DbId,
    pub lecturer_id: DbId,
    pub lecturer_selection_id: DbId,
    pub topic_title: String,
}

/// A proposed-project stub mirroring what confirm would create.
#[derive(Debug, Clone, Serialize)]
pub struct ProposedProjectStub {
    pub title: String,
    pub status: String,
    pub student_id: DbId,
    pub lecturer_id: DbId,
}

/// Response body of the auto-propose preview.
#[derive(Debug, Clone, Serialize)]
pub struct AutoProposeResult {
    pub proposed_projects: Vec<ProposedProjectStub>,
    pub allocations: Vec<AllocationStub>,
}

/// Request body for the auto-propose preview.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoProposeRequest {
    pub department_id: Option<DbId>,
}

/// One persisted allocation/proposal pair from a confirmed batch.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmedProposal {
    pub allocation: ProjectAllocation,
    pub proposed_project: crate::models::proposed_project::ProposedProject,
}

/// Request body for confirming a previewed batch.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmProposalsRequest {
    pub proposals: Vec<AllocationStub>,
}

/// Request body for the dean's approve-allocation operation.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveAllocationRequest {
    pub project_id: DbId,
    pub status: String,
}
