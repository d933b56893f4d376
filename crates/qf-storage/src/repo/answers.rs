//! Answer rows

use crate::entity::{answer, answer_voter};
use crate::error::db_err;
use crate::repo::VoteRepo;
use chrono::Utc;
use qf_core::error::{ForumError, Result};
use qf_core::model::{Answer, ContentUpdate, NewAnswer, User};
use qf_core::{AnswerId, QuestionId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

pub struct AnswerRepo<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AnswerRepo<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Answer a question; the question must exist
    pub async fn create(&self, new: NewAnswer) -> Result<Answer> {
        let model = answer::ActiveModel {
            question_id: Set(Some(new.question_id.0)),
            content: Set(new.content),
            create_date: Set(Utc::now()),
            user_id: Set(new.user_id.0),
            modify_date: Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(db_err)?;

        debug!("Created answer {} on question {:?}", model.id, model.question_id);
        Ok(model.into())
    }

    pub async fn find(&self, id: AnswerId) -> Result<Option<Answer>> {
        let model = answer::Entity::find_by_id(id.0)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    pub async fn get(&self, id: AnswerId) -> Result<Answer> {
        self.find(id)
            .await?
            .ok_or_else(|| ForumError::not_found(AnswerId::ENTITY, id.0))
    }

    /// Answers under a question in posting order
    pub async fn for_question(&self, question_id: QuestionId) -> Result<Vec<Answer>> {
        let models = answer::Entity::find()
            .filter(answer::Column::QuestionId.eq(question_id.0))
            .order_by_asc(answer::Column::CreateDate)
            .order_by_asc(answer::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Answers a user wrote, newest first
    pub async fn by_user(&self, user_id: UserId) -> Result<Vec<Answer>> {
        let models = answer::Entity::find()
            .filter(answer::Column::UserId.eq(user_id.0))
            .order_by_desc(answer::Column::CreateDate)
            .order_by_desc(answer::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: AnswerId, changes: ContentUpdate) -> Result<Answer> {
        let model = answer::Entity::find_by_id(id.0)
            .one(self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ForumError::not_found(AnswerId::ENTITY, id.0))?;

        if changes.is_empty() {
            return Ok(model.into());
        }

        let mut active: answer::ActiveModel = model.into();
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(at) = changes.modify_date {
            active.modify_date = Set(Some(at));
        }

        let model = active.update(self.db).await.map_err(db_err)?;
        debug!("Updated answer {}", model.id);
        Ok(model.into())
    }

    /// Move an answer to another question, or detach it.
    ///
    /// An answer cannot live without a question: detaching deletes it, and
    /// the result is `None`.
    pub async fn reassign(
        &self,
        id: AnswerId,
        question_id: Option<QuestionId>,
    ) -> Result<Option<Answer>> {
        let model = answer::Entity::find_by_id(id.0)
            .one(self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ForumError::not_found(AnswerId::ENTITY, id.0))?;

        let Some(question_id) = question_id else {
            self.delete(id).await?;
            debug!("Deleted orphaned answer {}", id);
            return Ok(None);
        };

        let mut active: answer::ActiveModel = model.into();
        active.question_id = Set(Some(question_id.0));
        let model = active.update(self.db).await.map_err(db_err)?;
        debug!("Moved answer {} to question {}", id, question_id);
        Ok(Some(model.into()))
    }

    /// Delete an answer with its comments and votes
    pub async fn delete(&self, id: AnswerId) -> Result<()> {
        let result = answer::Entity::delete_by_id(id.0)
            .exec(self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(ForumError::not_found(AnswerId::ENTITY, id.0));
        }
        debug!("Deleted answer {}", id);
        Ok(())
    }

    pub async fn voters(&self, id: AnswerId) -> Result<Vec<User>> {
        VoteRepo::new(self.db).answer_voters(id).await
    }

    pub async fn voter_count(&self, id: AnswerId) -> Result<u64> {
        answer_voter::Entity::find()
            .filter(answer_voter::Column::AnswerId.eq(id.0))
            .count(self.db)
            .await
            .map_err(db_err)
    }
}
