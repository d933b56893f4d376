//! Per-entity repositories borrowing the store's connection

mod answers;
mod comments;
mod questions;
mod users;
mod votes;

pub use answers::AnswerRepo;
pub use comments::CommentRepo;
pub use questions::QuestionRepo;
pub use users::UserRepo;
pub use votes::VoteRepo;
