//! Repository for the `proposed_projects` table, including creation from
//! an allocation and the final-approval materialization transaction.

use sqlx::PgPool;
use thesisflow_core::member::{MEMBER_ROLE_ADVISOR, MEMBER_ROLE_STUDENT};
use thesisflow_core::types::DbId;
use thesisflow_core::workflow::{APPROVED_BY_HEAD, PENDING_HEAD};

use crate::error::DbError;
use crate::models::allocation::ProjectAllocation;
use crate::models::project::Project;
use crate::models::proposed_project::ProposedProject;
use crate::repositories::project_repo::PROJECT_COLUMNS;

/// Column list for proposed_projects queries. Shared with the allocation
/// repository's confirm step.
pub(crate) const PROPOSED_PROJECT_COLUMNS: &str = "id, project_allocation_id, title, \
    description, status, approved_by_id, approved_at, created_by_id, created_at, updated_at";

/// Operations on proposed projects.
pub struct ProposedProjectRepo;

impl ProposedProjectRepo {
    /// Create a proposed project from an existing allocation, with ACTIVE
    /// members for the allocation's student and (when present) lecturer.
    /// Runs in a transaction so the project never exists without its
    /// roster.
    pub async fn create_from_allocation(
        pool: &PgPool,
        allocation: &ProjectAllocation,
        created_by_id: DbId,
    ) -> Result<ProposedProject, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO proposed_projects (project_allocation_id, title, created_by_id)
             VALUES ($1, $2, $3)
             RETURNING {PROPOSED_PROJECT_COLUMNS}"
        );
        let project = sqlx::query_as::<_, ProposedProject>(&query)
            .bind(allocation.id)
            .bind(&allocation.topic_title)
            .bind(created_by_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO proposed_project_members (proposed_project_id, student_id, role)
             VALUES ($1, $2, $3)",
        )
        .bind(project.id)
        .bind(allocation.student_id)
        .bind(MEMBER_ROLE_STUDENT)
        .execute(&mut *tx)
        .await?;

        if let Some(lecturer_id) = allocation.lecturer_id {
            sqlx::query(
                "INSERT INTO proposed_project_members (proposed_project_id, faculty_id, role)
                 VALUES ($1, $2, $3)",
            )
            .bind(project.id)
            .bind(lecturer_id)
            .bind(MEMBER_ROLE_ADVISOR)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Find a proposed project by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProposedProject>, sqlx::Error> {
        let query = format!("SELECT {PROPOSED_PROJECT_COLUMNS} FROM proposed_projects WHERE id = $1");
        sqlx::query_as::<_, ProposedProject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the proposed project referencing an allocation, if any.
    pub async fn find_by_allocation(
        pool: &PgPool,
        allocation_id: DbId,
    ) -> Result<Option<ProposedProject>, sqlx::Error> {
        let query = format!(
            "SELECT {PROPOSED_PROJECT_COLUMNS} FROM proposed_projects
             WHERE project_allocation_id = $1"
        );
        sqlx::query_as::<_, ProposedProject>(&query)
            .bind(allocation_id)
            .fetch_optional(pool)
            .await
    }

    /// Update title and description, returning the updated row.
    pub async fn update_title_description(
        pool: &PgPool,
        id: DbId,
        title: &str,
        description: Option<&str>,
    ) -> Result<ProposedProject, sqlx::Error> {
        let query = format!(
            "UPDATE proposed_projects
             SET title = $2, description = $3, updated_at = now()
             WHERE id = $1
             RETURNING {PROPOSED_PROJECT_COLUMNS}"
        );
        sqlx::query_as::<_, ProposedProject>(&query)
            .bind(id)
            .bind(title)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Flip the status only if the row is still in `from`. Returns `None`
    /// when another writer got there first.
    pub async fn set_status_guarded(
        pool: &PgPool,
        id: DbId,
        from: &str,
        to: &str,
    ) -> Result<Option<ProposedProject>, sqlx::Error> {
        let query = format!(
            "UPDATE proposed_projects
             SET status = $3, updated_at = now()
             WHERE id = $1 AND status = $2
             RETURNING {PROPOSED_PROJECT_COLUMNS}"
        );
        sqlx::query_as::<_, ProposedProject>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// All projects in the given status whose ACTIVE ADVISOR belongs to the
    /// given department. Drives the bulk-approve sweep.
    pub async fn list_by_status_and_department(
        pool: &PgPool,
        status: &str,
        department_id: DbId,
    ) -> Result<Vec<ProposedProject>, sqlx::Error> {
        let query = format!(
            "SELECT p.{cols} FROM proposed_projects p
             JOIN proposed_project_members m
               ON m.proposed_project_id = p.id
              AND m.role = 'ADVISOR' AND m.status = 'ACTIVE'
             JOIN faculty_members f ON f.id = m.faculty_id
             WHERE p.status = $1 AND f.department_id = $2
             ORDER BY p.id ASC",
            cols = PROPOSED_PROJECT_COLUMNS.replace(", ", ", p.")
        );
        sqlx::query_as::<_, ProposedProject>(&query)
            .bind(status)
            .bind(department_id)
            .fetch_all(pool)
            .await
    }

    /// Department of the project's ACTIVE ADVISOR member, if there is one.
    pub async fn advisor_department(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT f.department_id
             FROM proposed_project_members m
             JOIN faculty_members f ON f.id = m.faculty_id
             WHERE m.proposed_project_id = $1
               AND m.role = 'ADVISOR' AND m.status = 'ACTIVE'
             LIMIT 1",
        )
        .bind(project_id)
        .fetch_optional(pool)
        .await
    }

    /// Final approval: one transaction that flips the proposal into its
    /// terminal approved state, stamps approver and time, creates the
    /// official project, copies every ACTIVE member, and relinks an
    /// existing outline to the new project.
    ///
    /// The guarded status flip makes this exactly-once: a proposal that
    /// already left `PENDING_HEAD` fails with [`DbError::StaleStatus`] and
    /// nothing is applied.
    pub async fn materialize(
        pool: &PgPool,
        project_id: DbId,
        approved_by_id: DbId,
    ) -> Result<Project, DbError> {
        let mut tx = pool.begin().await?;

        let flip_query = format!(
            "UPDATE proposed_projects
             SET status = $3, approved_by_id = $2, approved_at = now(), updated_at = now()
             WHERE id = $1 AND status = $4
             RETURNING {PROPOSED_PROJECT_COLUMNS}"
        );
        let proposal = sqlx::query_as::<_, ProposedProject>(&flip_query)
            .bind(project_id)
            .bind(approved_by_id)
            .bind(APPROVED_BY_HEAD)
            .bind(PENDING_HEAD)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::StaleStatus {
                project_id,
                expected: PENDING_HEAD,
            })?;

        let department_id = sqlx::query_scalar::<_, DbId>(
            "SELECT f.department_id
             FROM proposed_project_members m
             JOIN faculty_members f ON f.id = m.faculty_id
             WHERE m.proposed_project_id = $1
               AND m.role = 'ADVISOR' AND m.status = 'ACTIVE'
             LIMIT 1",
        )
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?;

        let project_query = format!(
            "INSERT INTO projects
                (proposed_project_id, title, description, department_id, approved_by_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PROJECT_COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&project_query)
            .bind(proposal.id)
            .bind(&proposal.title)
            .bind(&proposal.description)
            .bind(department_id)
            .bind(approved_by_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO project_members (project_id, student_id, faculty_id, role)
             SELECT $1, m.student_id, m.faculty_id, m.role
             FROM proposed_project_members m
             WHERE m.proposed_project_id = $2 AND m.status = 'ACTIVE'
             ORDER BY m.id ASC",
        )
        .bind(project.id)
        .bind(proposal.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE proposal_outlines
             SET project_id = $1, updated_at = now()
             WHERE proposed_project_id = $2",
        )
        .bind(project.id)
        .bind(proposal.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            proposed_project_id = proposal.id,
            project_id = project.id,
            approved_by_id,
            "Proposed project materialized into official project"
        );
        Ok(project)
    }
}
