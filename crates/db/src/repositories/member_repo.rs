//! Repository for the `proposed_project_members` roster.
//!
//! Roster semantics: only ACTIVE rows are visible to permission checks,
//! REMOVED rows are permanent history, and re-adding a previously removed
//! person reactivates the existing row instead of inserting a duplicate.
//! The partial unique indexes back these semantics at the schema level.

use sqlx::PgPool;
use thesisflow_core::actor::PersonRef;
use thesisflow_core::member::MEMBER_STATUS_ACTIVE;
use thesisflow_core::types::DbId;

use crate::error::DbError;
use crate::models::member::ProposedProjectMember;

/// Column list for proposed_project_members queries.
const COLUMNS: &str = "id, proposed_project_id, student_id, faculty_id, role, \
    status, created_at, updated_at";

/// Operations on the proposed-project member roster.
pub struct MemberRepo;

impl MemberRepo {
    /// All ACTIVE members of a project, insertion order.
    pub async fn list_active(
        pool: &PgPool,
        proposed_project_id: DbId,
    ) -> Result<Vec<ProposedProjectMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposed_project_members
             WHERE proposed_project_id = $1 AND status = 'ACTIVE'
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ProposedProjectMember>(&query)
            .bind(proposed_project_id)
            .fetch_all(pool)
            .await
    }

    /// The ACTIVE member row for a person on a project, if any.
    pub async fn find_active_by_person(
        pool: &PgPool,
        proposed_project_id: DbId,
        person: PersonRef,
    ) -> Result<Option<ProposedProjectMember>, sqlx::Error> {
        let (student_id, faculty_id) = person.into_columns();
        let query = format!(
            "SELECT {COLUMNS} FROM proposed_project_members
             WHERE proposed_project_id = $1 AND status = 'ACTIVE'
               AND student_id IS NOT DISTINCT FROM $2
               AND faculty_id IS NOT DISTINCT FROM $3"
        );
        sqlx::query_as::<_, ProposedProjectMember>(&query)
            .bind(proposed_project_id)
            .bind(student_id)
            .bind(faculty_id)
            .fetch_optional(pool)
            .await
    }

    /// The ACTIVE member row for a person holding a specific role, if any.
    pub async fn find_active_by_person_and_role(
        pool: &PgPool,
        proposed_project_id: DbId,
        person: PersonRef,
        role: &str,
    ) -> Result<Option<ProposedProjectMember>, sqlx::Error> {
        let (student_id, faculty_id) = person.into_columns();
        let query = format!(
            "SELECT {COLUMNS} FROM proposed_project_members
             WHERE proposed_project_id = $1 AND status = 'ACTIVE' AND role = $2
               AND student_id IS NOT DISTINCT FROM $3
               AND faculty_id IS NOT DISTINCT FROM $4"
        );
        sqlx::query_as::<_, ProposedProjectMember>(&query)
            .bind(proposed_project_id)
            .bind(role)
            .bind(student_id)
            .bind(faculty_id)
            .fetch_optional(pool)
            .await
    }

    /// Add a person to the roster, reactivating their REMOVED row when one
    /// exists. Fails with [`DbError::DuplicateActiveMember`] when the
    /// person is already ACTIVE. Runs in a transaction so the pre-check
    /// and the write cannot interleave with another add.
    pub async fn add_or_reactivate(
        pool: &PgPool,
        proposed_project_id: DbId,
        person: PersonRef,
        role: &str,
    ) -> Result<ProposedProjectMember, DbError> {
        let (student_id, faculty_id) = person.into_columns();
        let mut tx = pool.begin().await?;

        let existing_query = format!(
            "SELECT {COLUMNS} FROM proposed_project_members
             WHERE proposed_project_id = $1
               AND student_id IS NOT DISTINCT FROM $2
               AND faculty_id IS NOT DISTINCT FROM $3
             ORDER BY id DESC
             LIMIT 1
             FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, ProposedProjectMember>(&existing_query)
            .bind(proposed_project_id)
            .bind(student_id)
            .bind(faculty_id)
            .fetch_optional(&mut *tx)
            .await?;

        let member = match existing {
            Some(row) if row.status == MEMBER_STATUS_ACTIVE => {
                return Err(DbError::DuplicateActiveMember {
                    project_id: proposed_project_id,
                });
            }
            Some(row) => {
                let reactivate_query = format!(
                    "UPDATE proposed_project_members
                     SET status = 'ACTIVE', role = $2, updated_at = now()
                     WHERE id = $1
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, ProposedProjectMember>(&reactivate_query)
                    .bind(row.id)
                    .bind(role)
                    .fetch_one(&mut *tx)
                    .await?
            }
            None => {
                let insert_query = format!(
                    "INSERT INTO proposed_project_members
                        (proposed_project_id, student_id, faculty_id, role)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, ProposedProjectMember>(&insert_query)
                    .bind(proposed_project_id)
                    .bind(student_id)
                    .bind(faculty_id)
                    .bind(role)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(member)
    }

    /// Soft-remove a person from the roster. Returns the updated row, or
    /// `None` when the person has no ACTIVE row on this project.
    pub async fn remove(
        pool: &PgPool,
        proposed_project_id: DbId,
        person: PersonRef,
    ) -> Result<Option<ProposedProjectMember>, sqlx::Error> {
        let (student_id, faculty_id) = person.into_columns();
        let query = format!(
            "UPDATE proposed_project_members
             SET status = 'REMOVED', updated_at = now()
             WHERE proposed_project_id = $1 AND status = 'ACTIVE'
               AND student_id IS NOT DISTINCT FROM $2
               AND faculty_id IS NOT DISTINCT FROM $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProposedProjectMember>(&query)
            .bind(proposed_project_id)
            .bind(student_id)
            .bind(faculty_id)
            .fetch_optional(pool)
            .await
    }
}
