//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs for the operations that touch the entity

pub mod allocation;
pub mod comment;
pub mod faculty;
pub mod member;
pub mod outline;
pub mod project;
pub mod proposed_project;
pub mod selection;
