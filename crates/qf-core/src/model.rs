//! Forum records and the inputs used to create and change them

use crate::types::{AnswerId, CommentAttachment, CommentId, QuestionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Password hash, opaque to the store
    #[serde(skip_serializing, default)]
    pub password: String,
    pub email: String,
}

/// A question posted by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub subject: String,
    pub content: String,
    pub create_date: DateTime<Utc>,
    pub modify_date: Option<DateTime<Utc>>,
    pub user_id: UserId,
}

/// An answer to a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    /// Nullable in the schema; always set for answers created through the store
    pub question_id: Option<QuestionId>,
    pub content: String,
    pub create_date: DateTime<Utc>,
    pub modify_date: Option<DateTime<Utc>>,
    pub user_id: UserId,
}

/// A comment on a question, an answer, both, or neither
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub content: String,
    pub create_date: DateTime<Utc>,
    pub modify_date: Option<DateTime<Utc>>,
    pub question_id: Option<QuestionId>,
    pub answer_id: Option<AnswerId>,
}

impl Comment {
    pub fn attachment(&self) -> CommentAttachment {
        CommentAttachment::from_keys(self.question_id, self.answer_id)
    }
}

/// Fields for registering a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
        }
    }
}

/// Fields for posting a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub subject: String,
    pub content: String,
    pub user_id: UserId,
}

impl NewQuestion {
    pub fn new(user_id: UserId, subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            content: content.into(),
            user_id,
        }
    }
}

/// Fields for answering a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub question_id: QuestionId,
    pub content: String,
    pub user_id: UserId,
}

impl NewAnswer {
    pub fn new(question_id: QuestionId, user_id: UserId, content: impl Into<String>) -> Self {
        Self {
            question_id,
            content: content.into(),
            user_id,
        }
    }
}

/// Fields for writing a comment.
///
/// Both targets are optional and independent; the store accepts any
/// combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub user_id: UserId,
    pub content: String,
    pub question_id: Option<QuestionId>,
    pub answer_id: Option<AnswerId>,
}

impl NewComment {
    pub fn on_question(user_id: UserId, question_id: QuestionId, content: impl Into<String>) -> Self {
        Self {
            user_id,
            content: content.into(),
            question_id: Some(question_id),
            answer_id: None,
        }
    }

    pub fn on_answer(user_id: UserId, answer_id: AnswerId, content: impl Into<String>) -> Self {
        Self {
            user_id,
            content: content.into(),
            question_id: None,
            answer_id: Some(answer_id),
        }
    }

    pub fn detached(user_id: UserId, content: impl Into<String>) -> Self {
        Self {
            user_id,
            content: content.into(),
            question_id: None,
            answer_id: None,
        }
    }
}

/// Changes to a user row; `None` leaves a column as is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.email.is_none()
    }
}

/// Changes to a question row.
///
/// The store never stamps `modify_date` on its own; set it with
/// [`QuestionUpdate::touch`] or [`QuestionUpdate::modified_at`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionUpdate {
    pub subject: Option<String>,
    pub content: Option<String>,
    pub modify_date: Option<DateTime<Utc>>,
}

impl QuestionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn modified_at(mut self, at: DateTime<Utc>) -> Self {
        self.modify_date = Some(at);
        self
    }

    pub fn touch(self) -> Self {
        self.modified_at(Utc::now())
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.content.is_none() && self.modify_date.is_none()
    }
}

/// Changes to an answer or comment body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentUpdate {
    pub content: Option<String>,
    pub modify_date: Option<DateTime<Utc>>,
}

impl ContentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn modified_at(mut self, at: DateTime<Utc>) -> Self {
        self.modify_date = Some(at);
        self
    }

    pub fn touch(self) -> Self {
        self.modified_at(Utc::now())
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.modify_date.is_none()
    }
}

/// Rows a user has written, all of which go with the user under the cascade policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuthoredCounts {
    pub questions: u64,
    pub answers: u64,
    pub comments: u64,
}

impl AuthoredCounts {
    pub fn total(&self) -> u64 {
        self.questions + self.answers + self.comments
    }
}

/// Default page size for question listings
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Filter and window for the question listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    /// 0-based page index
    pub page: u64,
    pub per_page: u64,
    /// Substring matched against subject, content, author, and answers
    pub keyword: Option<String>,
}

impl Default for QuestionQuery {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: DEFAULT_PER_PAGE,
            keyword: None,
        }
    }
}

impl QuestionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Blank keywords are treated as no keyword
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        self.keyword = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }
}

/// One page of an ordered listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Rows matching the filter across all pages
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(self.per_page)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.page_count()
    }
}
