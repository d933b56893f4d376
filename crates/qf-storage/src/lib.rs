//! qf-storage - Relational storage for qforum
//!
//! This crate maps the forum model onto a SQLite database through SeaORM:
//! schema installation, error classification, and one repository per entity.

pub mod entity;
mod error;
pub mod repo;
pub mod schema;
mod store;

pub use repo::{AnswerRepo, CommentRepo, QuestionRepo, UserRepo, VoteRepo};
pub use store::{ForumStore, DEFAULT_DATABASE_FILE};
