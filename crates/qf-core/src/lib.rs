//! qf-core - Core data model for qforum
//!
//! This crate provides the storage-independent pieces of the Q&A forum backend:
//! entity records and their inputs, the error taxonomy, configuration, and the
//! declarative relational schema with its constraint naming convention.

pub mod config;
pub mod error;
pub mod model;
pub mod schema;
pub mod types;

pub use error::{ConstraintKind, ForumError, Result};
pub use types::*;
