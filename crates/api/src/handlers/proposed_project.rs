//! Handlers for the proposed-project approval workflow.
//!
//! Every status change funnels through [`apply_transition`], which resolves
//! the `(current, requested)` pair against the core transition table and
//! runs the single authorizer. The phase-specific endpoints only restrict
//! which target statuses they accept; the generic status endpoint accepts
//! any target the table knows.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use thesisflow_core::actor::{Actor, PersonRef};
use thesisflow_core::error::CoreError;
use thesisflow_core::member::{
    validate_member_action, validate_member_role, MEMBER_ACTION_ADD, MEMBER_ACTION_REMOVE,
    MEMBER_ROLE_ADVISOR, MEMBER_ROLE_MEMBER, MEMBER_ROLE_STUDENT,
};
use thesisflow_core::types::DbId;
use thesisflow_core::workflow::{
    self, authorize_transition, validate_transition, TransitionContext, ADVISOR_REVIEW_STATUSES,
    APPROVED_BY_HEAD, HEAD_REVIEW_STATUSES, PENDING_HEAD, TOPIC_PENDING_ADVISOR,
};
use thesisflow_db::models::comment::{CreateComment, COMMENT_ENTITY_PROPOSED_PROJECT};
use thesisflow_db::models::member::ManageMemberRequest;
use thesisflow_db::models::proposed_project::{
    BulkApproveOutcome, FinalApprovalRequest, ProposedProject, ProposedProjectDetail,
    ReviewRequest, TriggerProposalRequest, UpdateProposalRequest, UpdateStatusRequest,
};
use thesisflow_db::repositories::{
    AllocationRepo, CommentRepo, MemberRepo, ProposedProjectRepo, StudentRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireFaculty, RequireFacultyHead};
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a proposed project or fail with 404.
pub(crate) async fn ensure_project_exists(
    pool: &sqlx::PgPool,
    id: DbId,
) -> AppResult<ProposedProject> {
    ProposedProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ProposedProject",
                id,
            })
        })
}

/// The actor's relationship to a project, computed over ACTIVE rows only.
pub(crate) struct MembershipFlags {
    pub is_active_student: bool,
    pub is_active_advisor: bool,
    pub advisor_department_id: Option<DbId>,
}

pub(crate) async fn membership_flags(
    pool: &sqlx::PgPool,
    project_id: DbId,
    actor: &Actor,
) -> AppResult<MembershipFlags> {
    let is_active_student = actor.is_student()
        && MemberRepo::find_active_by_person_and_role(
            pool,
            project_id,
            PersonRef::Student(actor.id),
            MEMBER_ROLE_STUDENT,
        )
        .await?
        .is_some();

    let is_active_advisor = actor.is_faculty()
        && MemberRepo::find_active_by_person_and_role(
            pool,
            project_id,
            PersonRef::Faculty(actor.id),
            MEMBER_ROLE_ADVISOR,
        )
        .await?
        .is_some();

    let advisor_department_id = ProposedProjectRepo::advisor_department(pool, project_id).await?;

    Ok(MembershipFlags {
        is_active_student,
        is_active_advisor,
        advisor_department_id,
    })
}

/// Append a review comment to the write-only sink.
async fn append_comment(
    pool: &sqlx::PgPool,
    entity_type: &'static str,
    entity_id: DbId,
    actor: &Actor,
    content: String,
) -> AppResult<()> {
    CommentRepo::create(
        pool,
        &CreateComment {
            entity_type,
            entity_id,
            author_id: actor.id,
            author_type: actor.user_type.clone(),
            content,
        },
    )
    .await?;
    Ok(())
}

/// Validate, authorize, and apply one status transition.
///
/// Used by every phase-specific endpoint, the generic status endpoint, the
/// outline side effects, and the allocation approval. Reaching the terminal
/// approved state runs materialization instead of a plain status flip.
pub(crate) async fn apply_transition(
    state: &AppState,
    project: &ProposedProject,
    requested: &str,
    actor: &Actor,
    department_param: Option<DbId>,
    comment: Option<String>,
) -> AppResult<ProposedProject> {
    let authority = validate_transition(&project.status, requested).map_err(AppError::Core)?;

    let flags = membership_flags(&state.pool, project.id, actor).await?;
    let ctx = TransitionContext {
        actor,
        is_active_student: flags.is_active_student,
        is_active_advisor: flags.is_active_advisor,
        advisor_department_id: flags.advisor_department_id,
        effective_department_id: department_param.or(actor.department_id),
    };
    authorize_transition(authority, &ctx).map_err(AppError::Core)?;

    let updated = if requested == APPROVED_BY_HEAD {
        ProposedProjectRepo::materialize(&state.pool, project.id, actor.id).await?;
        ensure_project_exists(&state.pool, project.id).await?
    } else {
        ProposedProjectRepo::set_status_guarded(&state.pool, project.id, &project.status, requested)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(format!(
                    "Proposed project {} changed status concurrently",
                    project.id
                )))
            })?
    };

    if let Some(content) = comment {
        append_comment(
            &state.pool,
            COMMENT_ENTITY_PROPOSED_PROJECT,
            project.id,
            actor,
            content,
        )
        .await?;
    }

    tracing::info!(
        project_id = project.id,
        from = %project.status,
        to = %requested,
        actor_id = actor.id,
        "Proposed project status changed"
    );
    Ok(updated)
}

/// POST /api/v1/proposed-projects/trigger
///
/// Create a proposed project from a confirmed allocation. Faculty only.
pub async fn trigger_proposal(
    RequireFaculty(actor): RequireFaculty,
    State(state): State<AppState>,
    Json(input): Json<TriggerProposalRequest>,
) -> AppResult<impl IntoResponse> {
    let allocation = AllocationRepo::find_by_id(&state.pool, input.allocation_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ProjectAllocation",
                id: input.allocation_id,
            })
        })?;

    if ProposedProjectRepo::find_by_allocation(&state.pool, allocation.id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Allocation {} already has a proposed project",
            allocation.id
        ))));
    }

    let project =
        ProposedProjectRepo::create_from_allocation(&state.pool, &allocation, actor.id).await?;
    let members = MemberRepo::list_active(&state.pool, project.id).await?;

    tracing::info!(
        allocation_id = allocation.id,
        project_id = project.id,
        actor_id = actor.id,
        "Proposed project created from allocation"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ProposedProjectDetail { project, members },
        }),
    ))
}

/// GET /api/v1/proposed-projects/{id}
///
/// The proposed project with its ACTIVE member roster.
pub async fn get_proposed_project(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, id).await?;
    let members = MemberRepo::list_active(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: ProposedProjectDetail { project, members },
    }))
}

/// PUT /api/v1/proposed-projects/{id}
///
/// The student updates title/description and optionally submits the topic
/// to the advisor.
pub async fn update_proposal(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProposalRequest>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, id).await?;

    if workflow::is_terminal(&project.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Proposed project is already {} and cannot be edited",
            project.status
        ))));
    }

    let flags = membership_flags(&state.pool, id, &auth.actor).await?;
    if !flags.is_active_student {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the project's active student member may edit the topic".into(),
        )));
    }

    workflow::validate_title(&input.title).map_err(AppError::Core)?;
    if let Some(description) = &input.description {
        workflow::validate_description(description).map_err(AppError::Core)?;
    }

    let updated = ProposedProjectRepo::update_title_description(
        &state.pool,
        id,
        &input.title,
        input.description.as_deref(),
    )
    .await?;

    let updated = if input.submit_to_advisor {
        apply_transition(&state, &updated, TOPIC_PENDING_ADVISOR, &auth.actor, None, None).await?
    } else {
        updated
    };

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/proposed-projects/{id}/advisor-review
///
/// The advisor's verdict on the submitted topic (or outline rejection).
pub async fn advisor_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    if !ADVISOR_REVIEW_STATUSES.contains(&input.status.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid advisor review status '{}'. Must be one of: {}",
            input.status,
            ADVISOR_REVIEW_STATUSES.join(", ")
        ))));
    }

    let project = ensure_project_exists(&state.pool, id).await?;
    let updated = apply_transition(
        &state,
        &project,
        &input.status,
        &auth.actor,
        None,
        input.comment,
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/proposed-projects/{id}/head-review
///
/// The department head's verdict. The head must belong to the advisor's
/// department.
pub async fn head_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    if !HEAD_REVIEW_STATUSES.contains(&input.status.as_str()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid head review status '{}'. Must be one of: {}",
            input.status,
            HEAD_REVIEW_STATUSES.join(", ")
        ))));
    }

    let project = ensure_project_exists(&state.pool, id).await?;
    let updated = apply_transition(
        &state,
        &project,
        &input.status,
        &auth.actor,
        None,
        input.comment,
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/proposed-projects/{id}/final-approval
///
/// The faculty head's final approval. Materializes the official project.
pub async fn final_approval(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<FinalApprovalRequest>,
) -> AppResult<impl IntoResponse> {
    if input.status != APPROVED_BY_HEAD {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Final approval only accepts status {APPROVED_BY_HEAD}"
        ))));
    }

    let project = ensure_project_exists(&state.pool, id).await?;
    let updated = apply_transition(
        &state,
        &project,
        APPROVED_BY_HEAD,
        &auth.actor,
        input.department_id,
        input.comment,
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/proposed-projects/bulk-approve
///
/// Apply final approval to every PENDING_HEAD project whose advisor sits in
/// the faculty head's department. Per-item failures are collected, not
/// propagated; each item is its own atomic unit.
pub async fn bulk_approve(
    RequireFacultyHead(actor): RequireFacultyHead,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let department_id = actor.department_id.ok_or_else(|| {
        AppError::Core(CoreError::Forbidden(
            "Faculty head has no department scope".into(),
        ))
    })?;

    let pending = ProposedProjectRepo::list_by_status_and_department(
        &state.pool,
        PENDING_HEAD,
        department_id,
    )
    .await?;

    let mut outcomes = Vec::with_capacity(pending.len());
    for project in pending {
        match apply_transition(&state, &project, APPROVED_BY_HEAD, &actor, None, None).await {
            Ok(updated) => outcomes.push(BulkApproveOutcome {
                id: updated.id,
                status: updated.status,
                error: None,
            }),
            Err(err) => {
                tracing::warn!(
                    project_id = project.id,
                    error = %err,
                    "Bulk approval item failed"
                );
                outcomes.push(BulkApproveOutcome {
                    id: project.id,
                    status: project.status,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    Ok(Json(DataResponse { data: outcomes }))
}

/// PUT /api/v1/proposed-projects/{id}/status
///
/// Generic status entry point. Enforces exactly the same rules as the
/// phase-specific endpoints via the shared transition table.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, id).await?;
    let updated = apply_transition(
        &state,
        &project,
        &input.status,
        &auth.actor,
        input.department_id,
        input.comment,
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/proposed-projects/{id}/members
///
/// The advisor adds (or reactivates) and soft-removes student members.
pub async fn manage_members(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ManageMemberRequest>,
) -> AppResult<impl IntoResponse> {
    validate_member_action(&input.action).map_err(AppError::Core)?;
    let role = input.role.as_deref().unwrap_or(MEMBER_ROLE_MEMBER);
    validate_member_role(role).map_err(AppError::Core)?;

    let project = ensure_project_exists(&state.pool, id).await?;
    let flags = membership_flags(&state.pool, id, &auth.actor).await?;
    if !flags.is_active_advisor {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the project's active advisor may manage members".into(),
        )));
    }

    StudentRepo::find_by_id(&state.pool, input.student_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Student",
                id: input.student_id,
            })
        })?;

    let person = PersonRef::Student(input.student_id);
    let member = match input.action.as_str() {
        MEMBER_ACTION_ADD => {
            MemberRepo::add_or_reactivate(&state.pool, project.id, person, role).await?
        }
        MEMBER_ACTION_REMOVE => MemberRepo::remove(&state.pool, project.id, person)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "ProposedProjectMember",
                    id: input.student_id,
                })
            })?,
        _ => unreachable!("action validated above"),
    };

    tracing::info!(
        project_id = project.id,
        student_id = input.student_id,
        action = %input.action,
        actor_id = auth.actor.id,
        "Proposed project roster changed"
    );

    Ok(Json(DataResponse { data: member }))
}
