//! Route definitions for the proposed-project workflow, nested under
//! `/proposed-projects`.
//!
//! ```text
//! POST   /trigger                     trigger_proposal
//! GET    /{id}                        get_proposed_project
//! PUT    /{id}                        update_proposal
//! PUT    /{id}/advisor-review         advisor_review
//! PUT    /{id}/head-review            head_review
//! PUT    /{id}/final-approval         final_approval
//! POST   /bulk-approve                bulk_approve
//! PUT    /{id}/status                 update_status
//! PUT    /{id}/members                manage_members
//! POST   /outline                     submit_outline
//! PUT    /outline/{id}/review         review_outline
//! PUT    /outline/{id}/lock           lock_outline
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{outline, proposed_project};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trigger", post(proposed_project::trigger_proposal))
        .route("/bulk-approve", post(proposed_project::bulk_approve))
        .route("/outline", post(outline::submit_outline))
        .route("/outline/{id}/review", put(outline::review_outline))
        .route("/outline/{id}/lock", put(outline::lock_outline))
        .route(
            "/{id}",
            get(proposed_project::get_proposed_project).put(proposed_project::update_proposal),
        )
        .route(
            "/{id}/advisor-review",
            put(proposed_project::advisor_review),
        )
        .route("/{id}/head-review", put(proposed_project::head_review))
        .route("/{id}/final-approval", put(proposed_project::final_approval))
        .route("/{id}/status", put(proposed_project::update_status))
        .route("/{id}/members", put(proposed_project::manage_members))
}
