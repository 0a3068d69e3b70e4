//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-step operations that must
//! be atomic (batch confirm, materialization) open their own transaction.

pub mod allocation_repo;
pub mod comment_repo;
pub mod faculty_repo;
pub mod member_repo;
pub mod outline_repo;
pub mod project_repo;
pub mod proposed_project_repo;
pub mod selection_repo;

pub use allocation_repo::AllocationRepo;
pub use comment_repo::CommentRepo;
pub use faculty_repo::{FacultyRepo, StudentRepo};
pub use member_repo::MemberRepo;
pub use outline_repo::OutlineRepo;
pub use project_repo::ProjectRepo;
pub use proposed_project_repo::ProposedProjectRepo;
pub use selection_repo::{LecturerSelectionRepo, StudentSelectionRepo};
