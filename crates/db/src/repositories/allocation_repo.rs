//! Repository for the `project_allocations` table and the confirm step of
//! the matching pipeline.

use sqlx::PgPool;
use thesisflow_core::member::{MEMBER_ROLE_ADVISOR, MEMBER_ROLE_STUDENT};
use thesisflow_core::types::DbId;

use crate::error::DbError;
use crate::models::allocation::{AllocationStub, CreateAllocation, ProjectAllocation};
use crate::models::proposed_project::ProposedProject;
use crate::repositories::proposed_project_repo::PROPOSED_PROJECT_COLUMNS;

/// Column list for project_allocations queries.
const COLUMNS: &str =
    "id, student_id, lecturer_id, topic_title, created_by_id, created_at, updated_at";

/// Operations on confirmed allocations.
pub struct AllocationRepo;

impl AllocationRepo {
    /// Insert a single allocation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAllocation,
        created_by_id: Option<DbId>,
    ) -> Result<ProjectAllocation, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_allocations
                (student_id, lecturer_id, topic_title, created_by_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectAllocation>(&query)
            .bind(input.student_id)
            .bind(input.lecturer_id)
            .bind(&input.topic_title)
            .bind(created_by_id)
            .fetch_one(pool)
            .await
    }

    /// Find an allocation by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectAllocation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_allocations WHERE id = $1");
        sqlx::query_as::<_, ProjectAllocation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Persist a previewed batch: one transaction for the whole batch.
    ///
    /// For every stub the lecturer's `current_capacity` is bumped through a
    /// guarded `UPDATE … WHERE current_capacity < capacity`; a full
    /// selection fails the entire batch with [`DbError::CapacityExhausted`]
    /// and rolls everything back. Each stub becomes a `ProjectAllocation`
    /// plus a `ProposedProject` in the initial workflow state with ACTIVE
    /// STUDENT and ADVISOR members.
    pub async fn confirm_batch(
        pool: &PgPool,
        stubs: &[AllocationStub],
        created_by_id: DbId,
    ) -> Result<Vec<(ProjectAllocation, ProposedProject)>, DbError> {
        let mut tx = pool.begin().await?;
        let mut confirmed = Vec::with_capacity(stubs.len());

        for stub in stubs {
            let bumped = sqlx::query(
                "UPDATE lecturer_selections
                 SET current_capacity = current_capacity + 1, updated_at = now()
                 WHERE id = $1 AND current_capacity < capacity",
            )
            .bind(stub.lecturer_selection_id)
            .execute(&mut *tx)
            .await?;
            if bumped.rows_affected() == 0 {
                // Dropping the transaction rolls back the whole batch.
                return Err(DbError::CapacityExhausted {
                    selection_id: stub.lecturer_selection_id,
                });
            }

            let allocation_query = format!(
                "INSERT INTO project_allocations
                    (student_id, lecturer_id, topic_title, created_by_id)
                 VALUES ($1, $2, $3, $4)
                 RETURNING {COLUMNS}"
            );
            let allocation = sqlx::query_as::<_, ProjectAllocation>(&allocation_query)
                .bind(stub.student_id)
                .bind(stub.lecturer_id)
                .bind(&stub.topic_title)
                .bind(created_by_id)
                .fetch_one(&mut *tx)
                .await?;

            let project_query = format!(
                "INSERT INTO proposed_projects (project_allocation_id, title, created_by_id)
                 VALUES ($1, $2, $3)
                 RETURNING {PROPOSED_PROJECT_COLUMNS}"
            );
            let project = sqlx::query_as::<_, ProposedProject>(&project_query)
                .bind(allocation.id)
                .bind(&stub.topic_title)
                .bind(created_by_id)
                .fetch_one(&mut *tx)
                .await?;

            sqlx::query(
                "INSERT INTO proposed_project_members
                    (proposed_project_id, student_id, role)
                 VALUES ($1, $2, $3)",
            )
            .bind(project.id)
            .bind(stub.student_id)
            .bind(MEMBER_ROLE_STUDENT)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO proposed_project_members
                    (proposed_project_id, faculty_id, role)
                 VALUES ($1, $2, $3)",
            )
            .bind(project.id)
            .bind(stub.lecturer_id)
            .bind(MEMBER_ROLE_ADVISOR)
            .execute(&mut *tx)
            .await?;

            confirmed.push((allocation, project));
        }

        tx.commit().await?;
        Ok(confirmed)
    }
}
