//! Faculty member and student reference models.
//!
//! Profile CRUD lives in the identity/registry service; these rows exist
//! for FK integrity and the faculty -> department lookup the authorization
//! rules depend on.

use serde::Serialize;
use sqlx::FromRow;
use thesisflow_core::types::{DbId, Timestamp};

/// A row from the `faculty_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FacultyMember {
    pub id: DbId,
    pub department_id: DbId,
    pub full_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub department_id: DbId,
    pub full_name: String,
    pub graduation_year: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
