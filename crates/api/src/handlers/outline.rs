//! Handlers for the proposal outline lifecycle: submit (upsert), review,
//! and lock.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use thesisflow_core::error::CoreError;
use thesisflow_core::outline::{
    self, OUTLINE_DRAFT, OUTLINE_LOCKED, OUTLINE_PENDING_REVIEW, OUTLINE_REVIEW_STATUSES,
};
use thesisflow_core::roles::{ROLE_DEPARTMENT_HEAD, ROLE_FACULTY_HEAD};
use thesisflow_core::types::DbId;
use thesisflow_core::workflow::{
    self, ADVISOR_APPROVED, OUTLINE_EDITABLE_PARENT_STATUSES, OUTLINE_PENDING_ADVISOR,
    OUTLINE_REJECTED, OUTLINE_REQUESTED_CHANGES, TOPIC_APPROVED,
};
use thesisflow_db::models::comment::{CreateComment, COMMENT_ENTITY_PROPOSAL_OUTLINE};
use thesisflow_db::models::outline::{ProposalOutline, ReviewOutlineRequest, SubmitOutlineRequest};
use thesisflow_db::repositories::{CommentRepo, OutlineRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::proposed_project::{
    apply_transition, ensure_project_exists, membership_flags,
};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireFaculty;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch an outline or fail with 404.
async fn ensure_outline_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<ProposalOutline> {
    OutlineRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "ProposalOutline",
            id,
        })
    })
}

/// POST /api/v1/proposed-projects/outline
///
/// Upsert the 1:1 outline of a proposed project. The actor must be the
/// project's active student member and the project must be in an
/// outline-editable phase. Submitting for review moves the outline to
/// PENDING_REVIEW and, when the parent sits exactly at TOPIC_APPROVED,
/// advances the parent to OUTLINE_PENDING_ADVISOR.
pub async fn submit_outline(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitOutlineRequest>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, input.proposed_project_id).await?;

    let flags = membership_flags(&state.pool, project.id, &auth.actor).await?;
    if !flags.is_active_student {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the project's active student member may submit the outline".into(),
        )));
    }

    if !OUTLINE_EDITABLE_PARENT_STATUSES.contains(&project.status.as_str()) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Outline cannot be submitted while the project is {}",
            project.status
        ))));
    }

    for (name, value) in [
        ("introduction", &input.fields.introduction),
        ("objectives", &input.fields.objectives),
        ("method", &input.fields.method),
        ("expected_results", &input.fields.expected_results),
    ] {
        if let Some(value) = value {
            outline::validate_narrative_field(name, value).map_err(AppError::Core)?;
        }
    }

    // A terminal outline is immutable, locked ones in particular.
    if let Some(existing) = OutlineRepo::find_by_project(&state.pool, project.id).await? {
        outline::ensure_mutable(&existing.status).map_err(AppError::Core)?;
    }

    let status = if input.submit_for_review {
        OUTLINE_PENDING_REVIEW
    } else {
        OUTLINE_DRAFT
    };
    let saved = OutlineRepo::upsert(
        &state.pool,
        project.id,
        &input.fields,
        input.file_ref.as_deref(),
        status,
    )
    .await?;

    if input.submit_for_review && project.status == TOPIC_APPROVED {
        apply_transition(
            &state,
            &project,
            OUTLINE_PENDING_ADVISOR,
            &auth.actor,
            None,
            None,
        )
        .await?;
    }

    tracing::info!(
        project_id = project.id,
        outline_id = saved.id,
        status = %saved.status,
        actor_id = auth.actor.id,
        "Proposal outline saved"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: saved })))
}

/// PUT /api/v1/proposed-projects/outline/{id}/review
///
/// A faculty reviewer's verdict on a submitted outline. When the reviewer
/// is the project's active advisor, the parent project moves with the
/// verdict; reviews by other faculty leave the parent untouched.
pub async fn review_outline(
    RequireFaculty(actor): RequireFaculty,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewOutlineRequest>,
) -> AppResult<impl IntoResponse> {
    if !OUTLINE_REVIEW_STATUSES.contains(&input.status.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid outline review status '{}'. Must be one of: {}",
            input.status,
            OUTLINE_REVIEW_STATUSES.join(", ")
        ))));
    }

    let existing = ensure_outline_exists(&state.pool, id).await?;
    outline::validate_transition(&existing.status, &input.status).map_err(AppError::Core)?;

    let reviewed = OutlineRepo::set_status(&state.pool, id, &input.status).await?;

    if let Some(content) = input.comment {
        CommentRepo::create(
            &state.pool,
            &CreateComment {
                entity_type: COMMENT_ENTITY_PROPOSAL_OUTLINE,
                entity_id: reviewed.id,
                author_id: actor.id,
                author_type: actor.user_type.clone(),
                content,
            },
        )
        .await?;
    }

    let project = ensure_project_exists(&state.pool, reviewed.proposed_project_id).await?;
    let flags = membership_flags(&state.pool, project.id, &actor).await?;
    if flags.is_active_advisor {
        let parent_target = match input.status.as_str() {
            s if s == outline::OUTLINE_APPROVED => ADVISOR_APPROVED,
            s if s == outline::OUTLINE_REQUESTED_CHANGES => OUTLINE_REQUESTED_CHANGES,
            _ => OUTLINE_REJECTED,
        };
        if workflow::can_transition(&project.status, parent_target) {
            apply_transition(&state, &project, parent_target, &actor, None, None).await?;
        }
    }

    tracing::info!(
        outline_id = reviewed.id,
        status = %reviewed.status,
        actor_id = actor.id,
        "Proposal outline reviewed"
    );

    Ok(Json(DataResponse { data: reviewed }))
}

/// PUT /api/v1/proposed-projects/outline/{id}/lock
///
/// Lock an approved outline for execution. Requires department-head (or
/// faculty-head) authority over the project's department. LOCKED is
/// terminal: any further submit or review fails with 409.
pub async fn lock_outline(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_outline_exists(&state.pool, id).await?;
    outline::validate_transition(&existing.status, OUTLINE_LOCKED).map_err(AppError::Core)?;

    let actor = &auth.actor;
    if !actor.has_role(ROLE_DEPARTMENT_HEAD) && !actor.has_role(ROLE_FACULTY_HEAD) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Department head or faculty head role required".into(),
        )));
    }

    let flags =
        membership_flags(&state.pool, existing.proposed_project_id, actor).await?;
    let advisor_dept = flags.advisor_department_id.ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(
            "Project has no active advisor with a resolvable department".into(),
        ))
    })?;
    if actor.department_id != Some(advisor_dept) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Outline belongs to department {advisor_dept}, outside the actor's scope"
        ))));
    }

    let locked = OutlineRepo::set_status(&state.pool, id, OUTLINE_LOCKED).await?;

    tracing::info!(
        outline_id = locked.id,
        actor_id = actor.id,
        "Proposal outline locked"
    );

    Ok(Json(DataResponse { data: locked }))
}
