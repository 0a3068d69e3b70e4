//! Official project models, created by materialization.

use serde::Serialize;
use sqlx::FromRow;
use thesisflow_core::types::{DbId, Timestamp};

/// Status of a freshly materialized project.
pub const PROJECT_STATUS_IN_PROGRESS: &str = "IN_PROGRESS";

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub proposed_project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub department_id: Option<DbId>,
    pub approved_by_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `project_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMember {
    pub id: DbId,
    pub project_id: DbId,
    pub student_id: Option<DbId>,
    pub faculty_id: Option<DbId>,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
