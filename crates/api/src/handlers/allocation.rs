//! Handlers for the allocation matching pipeline: read-only preview,
//! dean-confirmed persistence, and the dean's allocation approval.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use thesisflow_core::error::CoreError;
use thesisflow_core::matching::{match_candidates, LecturerCandidate, StudentCandidate};
use thesisflow_core::workflow::{ALLOCATION_APPROVABLE_STATUSES, TOPIC_SUBMISSION_PENDING};
use thesisflow_db::models::allocation::{
    AllocationStub, ApproveAllocationRequest, AutoProposeRequest, AutoProposeResult,
    ConfirmProposalsRequest, ConfirmedProposal, ProposedProjectStub,
};
use thesisflow_db::repositories::{AllocationRepo, LecturerSelectionRepo, StudentSelectionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::proposed_project::{apply_transition, ensure_project_exists};
use crate::middleware::rbac::{RequireDean, RequireFaculty};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/allocations/auto-propose
///
/// Compute a preview matching of approved student selections against
/// approved lecturer selections, optionally scoped to one department.
/// Pure read: nothing is persisted and repeated calls over unchanged
/// selections return identical results.
pub async fn auto_propose(
    RequireFaculty(actor): RequireFaculty,
    State(state): State<AppState>,
    Json(input): Json<AutoProposeRequest>,
) -> AppResult<impl IntoResponse> {
    let graduation_year = state.config.effective_graduation_year();

    let students = StudentSelectionRepo::list_approved_for_matching(
        &state.pool,
        graduation_year,
        input.department_id,
    )
    .await?;
    let lecturers =
        LecturerSelectionRepo::list_approved_for_matching(&state.pool, input.department_id)
            .await?;

    let student_candidates: Vec<StudentCandidate> = students
        .into_iter()
        .map(|row| StudentCandidate {
            student_id: row.student_id,
            department_id: row.department_id,
            preferred_lecturer_id: row.preferred_lecturer_id,
            topic_title: row.topic_title,
            priority: row.priority,
            created_at: row.created_at,
        })
        .collect();
    let lecturer_candidates: Vec<LecturerCandidate> = lecturers
        .into_iter()
        .map(|row| LecturerCandidate {
            lecturer_id: row.lecturer_id,
            selection_id: row.id,
            department_id: row.department_id,
            topic_title: row.topic_title,
            priority: row.priority,
            capacity: row.capacity,
            current_capacity: row.current_capacity,
        })
        .collect();

    let pairs = match_candidates(&student_candidates, &lecturer_candidates);

    let proposed_projects = pairs
        .iter()
        .map(|pair| ProposedProjectStub {
            title: pair.topic_title.clone(),
            status: TOPIC_SUBMISSION_PENDING.to_string(),
            student_id: pair.student_id,
            lecturer_id: pair.lecturer_id,
        })
        .collect();
    let allocations = pairs
        .into_iter()
        .map(|pair| AllocationStub {
            student_id: pair.student_id,
            lecturer_id: pair.lecturer_id,
            lecturer_selection_id: pair.lecturer_selection_id,
            topic_title: pair.topic_title,
        })
        .collect();

    let result = AutoProposeResult {
        proposed_projects,
        allocations,
    };

    tracing::debug!(
        actor_id = actor.id,
        department_id = ?input.department_id,
        matched = result.allocations.len(),
        "Auto-propose preview computed"
    );

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/allocations/confirm
///
/// Persist a previewed batch as real allocations and proposed projects.
/// Dean only; all-or-nothing.
pub async fn confirm_proposals(
    RequireDean(actor): RequireDean,
    State(state): State<AppState>,
    Json(input): Json<ConfirmProposalsRequest>,
) -> AppResult<impl IntoResponse> {
    let confirmed = AllocationRepo::confirm_batch(&state.pool, &input.proposals, actor.id).await?;

    let data: Vec<ConfirmedProposal> = confirmed
        .into_iter()
        .map(|(allocation, proposed_project)| ConfirmedProposal {
            allocation,
            proposed_project,
        })
        .collect();

    tracing::info!(
        actor_id = actor.id,
        confirmed = data.len(),
        "Allocation batch confirmed"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// POST /api/v1/allocations/approve
///
/// The dean forwards a proposal to the head-review queue. The proposal must
/// currently be advisor-approved or sent back by the head for changes.
pub async fn approve_allocation(
    RequireDean(actor): RequireDean,
    State(state): State<AppState>,
    Json(input): Json<ApproveAllocationRequest>,
) -> AppResult<impl IntoResponse> {
    let project = ensure_project_exists(&state.pool, input.project_id).await?;
    if !ALLOCATION_APPROVABLE_STATUSES.contains(&project.status.as_str()) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Allocation approval requires status {} or {}, project is {}",
            ALLOCATION_APPROVABLE_STATUSES[0], ALLOCATION_APPROVABLE_STATUSES[1], project.status
        ))));
    }
    let updated = apply_transition(&state, &project, &input.status, &actor, None, None).await?;
    Ok(Json(DataResponse { data: updated }))
}
