//! SeaORM entities, one per table
//!
//! Each entity mirrors a table in `qf_core::schema::tables`. Relations are
//! declared from the child side only; reads that walk the other way join
//! explicitly.

pub mod answer;
pub mod answer_voter;
pub mod comment;
pub mod question;
pub mod question_voter;
pub mod user;
