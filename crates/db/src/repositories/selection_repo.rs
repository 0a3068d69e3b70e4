//! Repositories for the `student_selections` and `lecturer_selections`
//! tables.

use sqlx::PgPool;
use thesisflow_core::types::DbId;

use crate::models::selection::{
    CreateLecturerSelection, CreateStudentSelection, LecturerSelection, LecturerSelectionRow,
    StudentSelection, StudentSelectionRow,
};

/// Column list for student_selections queries.
const STUDENT_COLUMNS: &str = "id, student_id, preferred_lecturer_id, topic_title, \
    priority, status, created_at, updated_at";

/// Column list for lecturer_selections queries.
const LECTURER_COLUMNS: &str = "id, lecturer_id, topic_title, priority, capacity, \
    current_capacity, status, created_at, updated_at";

/// Operations on student selections.
pub struct StudentSelectionRepo;

impl StudentSelectionRepo {
    /// Insert a new student selection, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateStudentSelection,
    ) -> Result<StudentSelection, sqlx::Error> {
        let query = format!(
            "INSERT INTO student_selections
                (student_id, preferred_lecturer_id, topic_title, priority)
             VALUES ($1, $2, $3, $4)
             RETURNING {STUDENT_COLUMNS}"
        );
        sqlx::query_as::<_, StudentSelection>(&query)
            .bind(input.student_id)
            .bind(input.preferred_lecturer_id)
            .bind(&input.topic_title)
            .bind(input.priority)
            .fetch_one(pool)
            .await
    }

    /// All APPROVED student selections for the given graduation cohort,
    /// optionally scoped to one department, joined with the student's
    /// department for the matcher. Ordered by (priority, created_at).
    pub async fn list_approved_for_matching(
        pool: &PgPool,
        graduation_year: i32,
        department_id: Option<DbId>,
    ) -> Result<Vec<StudentSelectionRow>, sqlx::Error> {
        sqlx::query_as::<_, StudentSelectionRow>(
            "SELECT ss.id, ss.student_id, s.department_id, ss.preferred_lecturer_id,
                    ss.topic_title, ss.priority, ss.created_at
             FROM student_selections ss
             JOIN students s ON s.id = ss.student_id
             WHERE ss.status = 'APPROVED'
               AND s.graduation_year = $1
               AND ($2::bigint IS NULL OR s.department_id = $2)
             ORDER BY ss.priority ASC, ss.created_at ASC, ss.id ASC",
        )
        .bind(graduation_year)
        .bind(department_id)
        .fetch_all(pool)
        .await
    }
}

/// Operations on lecturer selections, including the guarded capacity
/// increment used at confirm time.
pub struct LecturerSelectionRepo;

impl LecturerSelectionRepo {
    /// Insert a new lecturer selection, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLecturerSelection,
    ) -> Result<LecturerSelection, sqlx::Error> {
        let query = format!(
            "INSERT INTO lecturer_selections
                (lecturer_id, topic_title, priority, capacity)
             VALUES ($1, $2, $3, $4)
             RETURNING {LECTURER_COLUMNS}"
        );
        sqlx::query_as::<_, LecturerSelection>(&query)
            .bind(input.lecturer_id)
            .bind(&input.topic_title)
            .bind(input.priority)
            .bind(input.capacity)
            .fetch_one(pool)
            .await
    }

    /// Find a lecturer selection by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<LecturerSelection>, sqlx::Error> {
        let query = format!("SELECT {LECTURER_COLUMNS} FROM lecturer_selections WHERE id = $1");
        sqlx::query_as::<_, LecturerSelection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All APPROVED lecturer selections, optionally scoped to one
    /// department, joined with the lecturer's department for the matcher.
    pub async fn list_approved_for_matching(
        pool: &PgPool,
        department_id: Option<DbId>,
    ) -> Result<Vec<LecturerSelectionRow>, sqlx::Error> {
        sqlx::query_as::<_, LecturerSelectionRow>(
            "SELECT ls.id, ls.lecturer_id, f.department_id, ls.topic_title,
                    ls.priority, ls.capacity, ls.current_capacity
             FROM lecturer_selections ls
             JOIN faculty_members f ON f.id = ls.lecturer_id
             WHERE ls.status = 'APPROVED'
               AND ($1::bigint IS NULL OR f.department_id = $1)
             ORDER BY ls.priority ASC, ls.id ASC",
        )
        .bind(department_id)
        .fetch_all(pool)
        .await
    }

    /// Atomically increment `current_capacity` if it is still below
    /// `capacity`. Returns whether a row was updated; `false` means the
    /// selection was already full.
    pub async fn increment_capacity(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE lecturer_selections
             SET current_capacity = current_capacity + 1, updated_at = now()
             WHERE id = $1 AND current_capacity < capacity",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
