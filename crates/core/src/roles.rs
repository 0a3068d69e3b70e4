//! Well-known role and user-type constants.
//!
//! These must match the values issued by the identity service in the
//! `roles` and `user_type` token claims.

/// Head of an academic department. Reviews proposals from advisors in
/// their own department.
pub const ROLE_DEPARTMENT_HEAD: &str = "department_head";

/// Head of the faculty. Grants final approval on proposals.
pub const ROLE_FACULTY_HEAD: &str = "faculty_head";

/// Dean of studies. Confirms allocation batches and may forward proposals
/// to the head-review queue regardless of department.
pub const ROLE_DEAN: &str = "dean";

/// User type for students.
pub const USER_TYPE_STUDENT: &str = "STUDENT";

/// User type for faculty members (lecturers, heads, deans).
pub const USER_TYPE_FACULTY: &str = "FACULTY";
