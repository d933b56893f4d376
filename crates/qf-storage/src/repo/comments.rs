//! Comment rows

use crate::entity::comment;
use crate::error::db_err;
use chrono::Utc;
use qf_core::error::{ForumError, Result};
use qf_core::model::{Comment, ContentUpdate, NewComment};
use qf_core::{AnswerId, CommentId, QuestionId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

pub struct CommentRepo<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CommentRepo<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write a comment. Each target that is given must exist.
    pub async fn create(&self, new: NewComment) -> Result<Comment> {
        let model = comment::ActiveModel {
            user_id: Set(new.user_id.0),
            content: Set(new.content),
            create_date: Set(Utc::now()),
            modify_date: Set(None),
            question_id: Set(new.question_id.map(|id| id.0)),
            answer_id: Set(new.answer_id.map(|id| id.0)),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(db_err)?;

        let created: Comment = model.into();
        debug!("Created comment {} ({:?})", created.id, created.attachment());
        Ok(created)
    }

    pub async fn find(&self, id: CommentId) -> Result<Option<Comment>> {
        let model = comment::Entity::find_by_id(id.0)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    pub async fn get(&self, id: CommentId) -> Result<Comment> {
        self.find(id)
            .await?
            .ok_or_else(|| ForumError::not_found(CommentId::ENTITY, id.0))
    }

    pub async fn for_question(&self, question_id: QuestionId) -> Result<Vec<Comment>> {
        self.in_posting_order(comment::Column::QuestionId.eq(question_id.0))
            .await
    }

    pub async fn for_answer(&self, answer_id: AnswerId) -> Result<Vec<Comment>> {
        self.in_posting_order(comment::Column::AnswerId.eq(answer_id.0))
            .await
    }

    pub async fn by_user(&self, user_id: UserId) -> Result<Vec<Comment>> {
        self.in_posting_order(comment::Column::UserId.eq(user_id.0))
            .await
    }

    async fn in_posting_order(&self, filter: sea_orm::sea_query::SimpleExpr) -> Result<Vec<Comment>> {
        let models = comment::Entity::find()
            .filter(filter)
            .order_by_asc(comment::Column::CreateDate)
            .order_by_asc(comment::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: CommentId, changes: ContentUpdate) -> Result<Comment> {
        let model = comment::Entity::find_by_id(id.0)
            .one(self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ForumError::not_found(CommentId::ENTITY, id.0))?;

        if changes.is_empty() {
            return Ok(model.into());
        }

        let mut active: comment::ActiveModel = model.into();
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(at) = changes.modify_date {
            active.modify_date = Set(Some(at));
        }

        let model = active.update(self.db).await.map_err(db_err)?;
        debug!("Updated comment {}", model.id);
        Ok(model.into())
    }

    pub async fn delete(&self, id: CommentId) -> Result<()> {
        let result = comment::Entity::delete_by_id(id.0)
            .exec(self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(ForumError::not_found(CommentId::ENTITY, id.0));
        }
        debug!("Deleted comment {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use pretty_assertions::assert_eq;
    use qf_core::model::{NewAnswer, NewQuestion};
    use qf_core::{CommentAttachment, ConstraintKind};

    #[tokio::test]
    async fn test_comment_on_question() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let q = t
            .questions()
            .create(NewQuestion::new(alice.id, "Q1", "body"))
            .await
            .unwrap();

        let c = t
            .comments()
            .create(NewComment::on_question(alice.id, q.id, "first"))
            .await
            .unwrap();
        assert_eq!(c.attachment(), CommentAttachment::Question(q.id));
        assert_eq!(t.comments().for_question(q.id).await.unwrap(), vec![c.clone()]);
        assert_eq!(t.comments().get(c.id).await.unwrap(), c);
    }

    #[tokio::test]
    async fn test_detached_comment_allowed() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;

        let c = t
            .comments()
            .create(NewComment::detached(alice.id, "floating"))
            .await
            .unwrap();
        assert_eq!(c.attachment(), CommentAttachment::Detached);
        assert_eq!(t.comments().by_user(alice.id).await.unwrap(), vec![c]);
    }

    #[tokio::test]
    async fn test_comment_on_both_targets() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let q = t
            .questions()
            .create(NewQuestion::new(alice.id, "Q1", "body"))
            .await
            .unwrap();
        let a = t
            .answers()
            .create(NewAnswer::new(q.id, alice.id, "answer"))
            .await
            .unwrap();

        let mut new = NewComment::on_question(alice.id, q.id, "both");
        new.answer_id = Some(a.id);
        let c = t.comments().create(new).await.unwrap();

        assert_eq!(
            c.attachment(),
            CommentAttachment::Both {
                question: q.id,
                answer: a.id
            }
        );
        assert_eq!(t.comments().for_answer(a.id).await.unwrap().len(), 1);
        assert_eq!(t.comments().for_question(q.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_target_rejected() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;

        let err = t
            .comments()
            .create(NewComment::on_answer(alice.id, AnswerId(77), "lost"))
            .await
            .unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));

        let err = t
            .comments()
            .create(NewComment::detached(UserId(77), "nobody"))
            .await
            .unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let c = t
            .comments()
            .create(NewComment::detached(alice.id, "typo"))
            .await
            .unwrap();

        let fixed = t
            .comments()
            .update(c.id, ContentUpdate::new().content("fixed").touch())
            .await
            .unwrap();
        assert_eq!(fixed.content, "fixed");
        assert!(fixed.modify_date.is_some());
        assert_eq!(fixed.create_date, c.create_date);

        t.comments().delete(c.id).await.unwrap();
        assert!(t.comments().delete(c.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_question_delete_reaches_comments_through_answers() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let q = t
            .questions()
            .create(NewQuestion::new(alice.id, "Q1", "body"))
            .await
            .unwrap();
        let a = t
            .answers()
            .create(NewAnswer::new(q.id, alice.id, "answer"))
            .await
            .unwrap();
        let on_answer = t
            .comments()
            .create(NewComment::on_answer(alice.id, a.id, "on answer"))
            .await
            .unwrap();
        let loose = t
            .comments()
            .create(NewComment::detached(alice.id, "loose"))
            .await
            .unwrap();

        t.questions().delete(q.id).await.unwrap();

        assert!(t.comments().find(on_answer.id).await.unwrap().is_none());
        assert!(t.comments().find(loose.id).await.unwrap().is_some());
    }
}
