//! Read operations for official projects and their members.
//!
//! Writes happen only inside the materialization transaction in
//! [`crate::repositories::ProposedProjectRepo::materialize`].

use sqlx::PgPool;
use thesisflow_core::types::DbId;

use crate::models::project::{Project, ProjectMember};

/// Column list for projects queries. Shared with the materialization
/// transaction.
pub(crate) const PROJECT_COLUMNS: &str = "id, proposed_project_id, title, description, \
    status, department_id, approved_by_id, created_at, updated_at";

/// Column list for project_members queries.
const MEMBER_COLUMNS: &str =
    "id, project_id, student_id, faculty_id, role, status, created_at, updated_at";

/// Read operations for materialized projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Find a project by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the project materialized from a proposed project, if any.
    pub async fn find_by_proposed_project(
        pool: &PgPool,
        proposed_project_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE proposed_project_id = $1"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(proposed_project_id)
            .fetch_optional(pool)
            .await
    }

    /// All members of a project, insertion order.
    pub async fn list_members(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM project_members
             WHERE project_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ProjectMember>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
