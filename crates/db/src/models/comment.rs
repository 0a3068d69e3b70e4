//! Append-only workflow comment model.

use serde::Serialize;
use sqlx::FromRow;
use thesisflow_core::types::{DbId, Timestamp};

/// Comment target: a proposed project.
pub const COMMENT_ENTITY_PROPOSED_PROJECT: &str = "PROPOSED_PROJECT";

/// Comment target: a proposal outline.
pub const COMMENT_ENTITY_PROPOSAL_OUTLINE: &str = "PROPOSAL_OUTLINE";

/// A row from the `workflow_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowComment {
    pub id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub author_id: DbId,
    pub author_type: String,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for appending a comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub entity_type: &'static str,
    pub entity_id: DbId,
    pub author_id: DbId,
    pub author_type: String,
    pub content: String,
}
