//! Student and lecturer selection models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thesisflow_core::types::{DbId, Timestamp};

/// Selection status: declared but not yet approved for matching.
pub const SELECTION_STATUS_PENDING: &str = "PENDING";

/// Selection status: approved, participates in matching.
pub const SELECTION_STATUS_APPROVED: &str = "APPROVED";

/// Selection status: rejected, excluded from matching.
pub const SELECTION_STATUS_REJECTED: &str = "REJECTED";

/// A row from the `student_selections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentSelection {
    pub id: DbId,
    pub student_id: DbId,
    pub preferred_lecturer_id: Option<DbId>,
    pub topic_title: Option<String>,
    pub priority: i32,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `lecturer_selections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LecturerSelection {
    pub id: DbId,
    pub lecturer_id: DbId,
    pub topic_title: Option<String>,
    pub priority: i32,
    pub capacity: i32,
    pub current_capacity: i32,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A student selection joined with the student's department and cohort,
/// as fed to the matcher.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudentSelectionRow {
    pub id: DbId,
    pub student_id: DbId,
    pub department_id: DbId,
    pub preferred_lecturer_id: Option<DbId>,
    pub topic_title: Option<String>,
    pub priority: i32,
    pub created_at: Timestamp,
}

/// A lecturer selection joined with the lecturer's department, as fed to
/// the matcher.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LecturerSelectionRow {
    pub id: DbId,
    pub lecturer_id: DbId,
    pub department_id: DbId,
    pub topic_title: Option<String>,
    pub priority: i32,
    pub capacity: i32,
    pub current_capacity: i32,
}

/// DTO for creating a student selection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentSelection {
    pub student_id: DbId,
    pub preferred_lecturer_id: Option<DbId>,
    pub topic_title: Option<String>,
    pub priority: i32,
}

/// DTO for creating a lecturer selection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLecturerSelection {
    pub lecturer_id: DbId,
    pub topic_title: Option<String>,
    pub priority: i32,
    pub capacity: i32,
}
