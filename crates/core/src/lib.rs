//! Domain logic for the thesis proposal workflow and allocation matching.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the API layer, and any future CLI tooling alike.

pub mod actor;
pub mod error;
pub mod matching;
pub mod member;
pub mod outline;
pub mod roles;
pub mod types;
pub mod workflow;
