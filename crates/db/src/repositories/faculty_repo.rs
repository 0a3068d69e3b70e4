//! Lookups against the `faculty_members` and `students` reference tables.

use sqlx::PgPool;
use thesisflow_core::types::DbId;

use crate::models::faculty::{FacultyMember, Student};

/// Column list for faculty_members queries.
const FACULTY_COLUMNS: &str = "id, department_id, full_name, created_at, updated_at";

/// Column list for students queries.
const STUDENT_COLUMNS: &str =
    "id, department_id, full_name, graduation_year, created_at, updated_at";

/// Read operations for faculty members.
pub struct FacultyRepo;

impl FacultyRepo {
    /// Find a faculty member by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FacultyMember>, sqlx::Error> {
        let query = format!("SELECT {FACULTY_COLUMNS} FROM faculty_members WHERE id = $1");
        sqlx::query_as::<_, FacultyMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The department a faculty member belongs to.
    pub async fn department_of(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT department_id FROM faculty_members WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Read operations for students.
pub struct StudentRepo;

impl StudentRepo {
    /// Find a student by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
