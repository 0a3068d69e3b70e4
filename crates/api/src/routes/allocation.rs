//! Route definitions for the allocation matching pipeline, nested under
//! `/allocations`.
//!
//! ```text
//! POST   /auto-propose    auto_propose (read-only preview)
//! POST   /confirm         confirm_proposals (dean)
//! POST   /approve         approve_allocation (dean)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::allocation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auto-propose", post(allocation::auto_propose))
        .route("/confirm", post(allocation::confirm_proposals))
        .route("/approve", post(allocation::approve_allocation))
}
