//! Relational schema
//!
//! The four entity tables and two vote association tables are declared here as
//! static data. The storage crate executes the rendered DDL; migration tooling
//! can read the same declarations and naming convention.
//!
//! # Tables
//!
//! - `user`: unique username and email
//! - `question`, `answer`, `comment`: authored rows, each owned by a user
//! - `question_voter`, `answer_voter`: one row per (user, target) vote
//!
//! Every foreign key is `ON DELETE CASCADE`. Deleting a question removes its
//! answers, their comments and votes; deleting a user removes everything the
//! user wrote or voted on.

mod ddl;
pub mod naming;
pub mod tables;

pub use ddl::{create_indexes, create_table, render_ddl};
pub use naming::{ConstraintType, NAMING_CONVENTION};
pub use tables::{table, ColumnDef, ForeignKeyDef, SqlType, TableDef, TABLES};
