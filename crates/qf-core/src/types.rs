//! Core type definitions for qforum

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Entity name used in error messages
            pub const ENTITY: &'static str = $entity;

            pub fn get(self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                $name(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Primary key of a `user` row
    UserId,
    "user"
);
row_id!(
    /// Primary key of a `question` row
    QuestionId,
    "question"
);
row_id!(
    /// Primary key of an `answer` row
    AnswerId,
    "answer"
);
row_id!(
    /// Primary key of a `comment` row
    CommentId,
    "comment"
);

/// Something a user can vote on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VoteTarget {
    Question(QuestionId),
    Answer(AnswerId),
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteTarget::Question(id) => write!(f, "question {}", id),
            VoteTarget::Answer(id) => write!(f, "answer {}", id),
        }
    }
}

/// Where a comment hangs, derived from its two nullable foreign keys.
///
/// The schema does not require exactly one of them, so `Detached` and `Both`
/// are representable states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentAttachment {
    Question(QuestionId),
    Answer(AnswerId),
    Both {
        question: QuestionId,
        answer: AnswerId,
    },
    Detached,
}

impl CommentAttachment {
    pub fn from_keys(question: Option<QuestionId>, answer: Option<AnswerId>) -> Self {
        match (question, answer) {
            (Some(question), Some(answer)) => CommentAttachment::Both { question, answer },
            (Some(q), None) => CommentAttachment::Question(q),
            (None, Some(a)) => CommentAttachment::Answer(a),
            (None, None) => CommentAttachment::Detached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_conversion() {
        let id = QuestionId::from(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(id.get(), 7);
        assert_eq!(QuestionId::ENTITY, "question");
        assert_eq!(UserId::ENTITY, "user");
    }

    #[test]
    fn test_id_serializes_as_integer() {
        let json = serde_json::to_string(&AnswerId(3)).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn test_vote_target_display() {
        assert_eq!(VoteTarget::Question(QuestionId(1)).to_string(), "question 1");
        assert_eq!(VoteTarget::Answer(AnswerId(9)).to_string(), "answer 9");
    }

    #[test]
    fn test_comment_attachment_from_keys() {
        assert_eq!(
            CommentAttachment::from_keys(None, None),
            CommentAttachment::Detached
        );
        assert_eq!(
            CommentAttachment::from_keys(Some(QuestionId(1)), None),
            CommentAttachment::Question(QuestionId(1))
        );
        assert_eq!(
            CommentAttachment::from_keys(None, Some(AnswerId(2))),
            CommentAttachment::Answer(AnswerId(2))
        );
        assert_eq!(
            CommentAttachment::from_keys(Some(QuestionId(1)), Some(AnswerId(2))),
            CommentAttachment::Both {
                question: QuestionId(1),
                answer: AnswerId(2)
            }
        );
    }
}
