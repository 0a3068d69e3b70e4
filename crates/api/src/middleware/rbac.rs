//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose actor does
//! not meet the minimum requirement. Fine-grained checks (membership,
//! department scope) are resolved per transition by the core authorizer;
//! these extractors gate the coarse role requirements of whole endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use thesisflow_core::actor::Actor;
use thesisflow_core::error::CoreError;
use thesisflow_core::roles::{ROLE_DEAN, ROLE_FACULTY_HEAD};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a FACULTY actor. Rejects with 403 Forbidden otherwise.
pub struct RequireFaculty(pub Actor);

impl FromRequestParts<AppState> for RequireFaculty {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.actor.is_faculty() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Faculty account required".into(),
            )));
        }
        Ok(RequireFaculty(auth.actor))
    }
}

/// Requires the `faculty_head` role. Rejects with 403 Forbidden otherwise.
pub struct RequireFacultyHead(pub Actor);

impl FromRequestParts<AppState> for RequireFacultyHead {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.actor.has_role(ROLE_FACULTY_HEAD) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Faculty head role required".into(),
            )));
        }
        Ok(RequireFacultyHead(auth.actor))
    }
}

/// Requires the `dean` role. Rejects with 403 Forbidden otherwise.
pub struct RequireDean(pub Actor);

impl FromRequestParts<AppState> for RequireDean {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.actor.has_role(ROLE_DEAN) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Dean role required".into(),
            )));
        }
        Ok(RequireDean(auth.actor))
    }
}
