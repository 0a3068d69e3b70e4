//! The authenticated actor and the person reference union.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::{USER_TYPE_FACULTY, USER_TYPE_STUDENT};
use crate::types::DbId;

/// The authenticated identity performing an operation, as supplied by the
/// external identity service. The core authorizes against this but never
/// authenticates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Student id or faculty id, depending on `user_type`.
    pub id: DbId,
    /// `"STUDENT"` or `"FACULTY"`.
    pub user_type: String,
    /// Role names held by this actor (see [`crate::roles`]).
    pub roles: Vec<String>,
    /// Department scope, present for faculty actors that hold a scoped role.
    pub department_id: Option<DbId>,
}

impl Actor {
    pub fn is_student(&self) -> bool {
        self.user_type == USER_TYPE_STUDENT
    }

    pub fn is_faculty(&self) -> bool {
        self.user_type == USER_TYPE_FACULTY
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Reference to exactly one person: a student or a faculty member.
///
/// Member rows store this as a nullable column pair (`student_id`,
/// `faculty_id`). Constructing a `PersonRef` from that pair fails unless
/// exactly one side is set, so the "both or neither" shape cannot travel
/// past the repository boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonRef {
    Student(DbId),
    Faculty(DbId),
}

impl PersonRef {
    /// Build a `PersonRef` from the nullable column pair.
    pub fn from_columns(
        student_id: Option<DbId>,
        faculty_id: Option<DbId>,
    ) -> Result<Self, CoreError> {
        match (student_id, faculty_id) {
            (Some(id), None) => Ok(PersonRef::Student(id)),
            (None, Some(id)) => Ok(PersonRef::Faculty(id)),
            (Some(_), Some(_)) => Err(CoreError::Validation(
                "Member row references both a student and a faculty member".to_string(),
            )),
            (None, None) => Err(CoreError::Validation(
                "Member row references neither a student nor a faculty member".to_string(),
            )),
        }
    }

    /// Split back into the nullable column pair for persistence.
    pub fn into_columns(self) -> (Option<DbId>, Option<DbId>) {
        match self {
            PersonRef::Student(id) => (Some(id), None),
            PersonRef::Faculty(id) => (None, Some(id)),
        }
    }
}
