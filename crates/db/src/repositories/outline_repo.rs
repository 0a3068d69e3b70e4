//! Repository for the `proposal_outlines` table.

use sqlx::PgPool;
use thesisflow_core::types::DbId;

use crate::models::outline::{OutlineFields, ProposalOutline};

/// Column list for proposal_outlines queries.
const COLUMNS: &str = "id, proposed_project_id, introduction, objectives, method, \
    expected_results, file_ref, status, project_id, created_at, updated_at";

/// Operations on proposal outlines.
pub struct OutlineRepo;

impl OutlineRepo {
    /// Find an outline by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProposalOutline>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposal_outlines WHERE id = $1");
        sqlx::query_as::<_, ProposalOutline>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the outline attached to a proposed project, if any.
    pub async fn find_by_project(
        pool: &PgPool,
        proposed_project_id: DbId,
    ) -> Result<Option<ProposalOutline>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposal_outlines WHERE proposed_project_id = $1"
        );
        sqlx::query_as::<_, ProposalOutline>(&query)
            .bind(proposed_project_id)
            .fetch_optional(pool)
            .await
    }

    /// Upsert the 1:1 outline: insert when absent, otherwise overwrite the
    /// narrative fields, file reference, and status in place. The unique
    /// constraint on `proposed_project_id` guarantees a single row.
    pub async fn upsert(
        pool: &PgPool,
        proposed_project_id: DbId,
        fields: &OutlineFields,
        file_ref: Option<&str>,
        status: &str,
    ) -> Result<ProposalOutline, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposal_outlines
                (proposed_project_id, introduction, objectives, method,
                 expected_results, file_ref, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (proposed_project_id) DO UPDATE
             SET introduction = EXCLUDED.introduction,
                 objectives = EXCLUDED.objectives,
                 method = EXCLUDED.method,
                 expected_results = EXCLUDED.expected_results,
                 file_ref = EXCLUDED.file_ref,
                 status = EXCLUDED.status,
                 updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProposalOutline>(&query)
            .bind(proposed_project_id)
            .bind(&fields.introduction)
            .bind(&fields.objectives)
            .bind(&fields.method)
            .bind(&fields.expected_results)
            .bind(file_ref)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// Set the outline status, returning the updated row.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<ProposalOutline, sqlx::Error> {
        let query = format!(
            "UPDATE proposal_outlines
             SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProposalOutline>(&query)
            .bind(id)
            .bind(status)
            .fetch_one(pool)
            .await
    }
}
