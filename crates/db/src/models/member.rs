//! Proposed-project member roster models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thesisflow_core::actor::PersonRef;
use thesisflow_core::error::CoreError;
use thesisflow_core::types::{DbId, Timestamp};

/// A row from the `proposed_project_members` table.
///
/// Exactly one of `student_id` / `faculty_id` is set (CHECK-enforced);
/// use [`ProposedProjectMember::person`] to get the typed reference.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProposedProjectMember {
    pub id: DbId,
    pub proposed_project_id: DbId,
    pub student_id: Option<DbId>,
    pub faculty_id: Option<DbId>,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProposedProjectMember {
    /// The typed person reference behind the nullable column pair.
    pub fn person(&self) -> Result<PersonRef, CoreError> {
        PersonRef::from_columns(self.student_id, self.faculty_id)
    }
}

/// Request body for the member management endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ManageMemberRequest {
    pub student_id: DbId,
    /// `"add"` or `"remove"`.
    pub action: String,
    /// Role for add; defaults to MEMBER.
    pub role: Option<String>,
}
