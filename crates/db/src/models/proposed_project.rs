//! Proposed project entity model and workflow request DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thesisflow_core::types::{DbId, Timestamp};

use crate::models::member::ProposedProjectMember;

/// A row from the `proposed_projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProposedProject {
    pub id: DbId,
    pub project_allocation_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub approved_by_id: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub created_by_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A proposed project together with its ACTIVE member roster.
#[derive(Debug, Clone, Serialize)]
pub struct ProposedProjectDetail {
    #[serde(flatten)]
    pub project: ProposedProject,
    pub members: Vec<ProposedProjectMember>,
}

/// Request body for creating a proposed project from an allocation.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerProposalRequest {
    pub allocation_id: DbId,
}

/// Request body for the student's title/description update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProposalRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub submit_to_advisor: bool,
}

/// Request body shared by the advisor-review and head-review endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub status: String,
    pub comment: Option<String>,
}

/// Request body for the faculty head's final approval.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalApprovalRequest {
    pub status: String,
    pub department_id: Option<DbId>,
    pub comment: Option<String>,
}

/// Request body for the generic status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub comment: Option<String>,
    pub department_id: Option<DbId>,
}

/// Per-item outcome of a bulk approval run.
#[derive(Debug, Clone, Serialize)]
pub struct BulkApproveOutcome {
    pub id: DbId,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
