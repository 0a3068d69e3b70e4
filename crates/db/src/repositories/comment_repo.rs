//! Repository for the append-only `workflow_comments` sink.
//!
//! The workflow only ever writes here; nothing in the core reads comments
//! back to make decisions.

use sqlx::PgPool;

use crate::models::comment::{CreateComment, WorkflowComment};

/// Column list for workflow_comments queries.
const COLUMNS: &str = "id, entity_type, entity_id, author_id, author_type, content, created_at";

/// Append operations for workflow comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateComment,
    ) -> Result<WorkflowComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_comments
                (entity_type, entity_id, author_id, author_type, content)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowComment>(&query)
            .bind(input.entity_type)
            .bind(input.entity_id)
            .bind(input.author_id)
            .bind(&input.author_type)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }
}
