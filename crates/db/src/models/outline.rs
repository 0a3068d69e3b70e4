//! Proposal outline model and request DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thesisflow_core::types::{DbId, Timestamp};

/// A row from the `proposal_outlines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProposalOutline {
    pub id: DbId,
    pub proposed_project_id: DbId,
    pub introduction: Option<String>,
    pub objectives: Option<String>,
    pub method: Option<String>,
    pub expected_results: Option<String>,
    pub file_ref: Option<String>,
    pub status: String,
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The writable narrative fields of an outline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutlineFields {
    pub introduction: Option<String>,
    pub objectives: Option<String>,
    pub method: Option<String>,
    pub expected_results: Option<String>,
}

/// Request body for the outline submit (upsert) endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitOutlineRequest {
    pub proposed_project_id: DbId,
    #[serde(flatten)]
    pub fields: OutlineFields,
    /// Opaque reference returned by the storage service.
    pub file_ref: Option<String>,
    #[serde(default)]
    pub submit_for_review: bool,
}

/// Request body for the outline review endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewOutlineRequest {
    pub status: String,
    pub comment: Option<String>,
}
