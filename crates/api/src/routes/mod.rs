pub mod allocation;
pub mod health;
pub mod proposed_project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /proposed-projects/trigger                  create from allocation (POST)
/// /proposed-projects/{id}                     get (GET), update topic (PUT)
/// /proposed-projects/{id}/advisor-review      advisor verdict (PUT)
/// /proposed-projects/{id}/head-review         department head verdict (PUT)
/// /proposed-projects/{id}/final-approval      faculty head approval (PUT)
/// /proposed-projects/bulk-approve             batch approval (POST)
/// /proposed-projects/{id}/status              generic transition (PUT)
/// /proposed-projects/{id}/members             roster management (PUT)
/// /proposed-projects/outline                  outline upsert (POST)
/// /proposed-projects/outline/{id}/review      outline verdict (PUT)
/// /proposed-projects/outline/{id}/lock        outline lock (PUT)
///
/// /allocations/auto-propose                   matching preview (POST)
/// /allocations/confirm                        persist batch (POST)
/// /allocations/approve                        forward to head queue (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/proposed-projects", proposed_project::router())
        .nest("/allocations", allocation::router())
}
