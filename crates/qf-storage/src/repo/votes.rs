//! Vote association rows
//!
//! A vote is one row in `question_voter` or `answer_voter`. The composite
//! primary key allows a user a single vote per target, and both foreign keys
//! cascade, so votes disappear with their voter or their target.

use crate::entity::{answer_voter, question_voter, user};
use crate::error::db_err;
use qf_core::error::Result;
use qf_core::model::User;
use qf_core::{AnswerId, QuestionId, UserId, VoteTarget};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::debug;

pub struct VoteRepo<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> VoteRepo<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record a vote. Voting twice on the same target is a unique violation.
    pub async fn vote(&self, user_id: UserId, target: VoteTarget) -> Result<()> {
        match target {
            VoteTarget::Question(id) => {
                question_voter::Entity::insert(question_voter::ActiveModel {
                    user_id: Set(user_id.0),
                    question_id: Set(id.0),
                })
                .exec_without_returning(self.db)
                .await
                .map_err(db_err)?;
            }
            VoteTarget::Answer(id) => {
                answer_voter::Entity::insert(answer_voter::ActiveModel {
                    user_id: Set(user_id.0),
                    answer_id: Set(id.0),
                })
                .exec_without_returning(self.db)
                .await
                .map_err(db_err)?;
            }
        }
        debug!("User {} voted on {}", user_id, target);
        Ok(())
    }

    pub async fn vote_question(&self, user_id: UserId, question_id: QuestionId) -> Result<()> {
        self.vote(user_id, VoteTarget::Question(question_id)).await
    }

    pub async fn vote_answer(&self, user_id: UserId, answer_id: AnswerId) -> Result<()> {
        self.vote(user_id, VoteTarget::Answer(answer_id)).await
    }

    /// Users who voted on a question, by id
    pub async fn question_voters(&self, question_id: QuestionId) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .join(JoinType::InnerJoin, question_voter::Relation::User.def().rev())
            .filter(question_voter::Column::QuestionId.eq(question_id.0))
            .order_by_asc(user::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Users who voted on an answer, by id
    pub async fn answer_voters(&self, answer_id: AnswerId) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .join(JoinType::InnerJoin, answer_voter::Relation::User.def().rev())
            .filter(answer_voter::Column::AnswerId.eq(answer_id.0))
            .order_by_asc(user::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn has_voted_question(&self, user_id: UserId, question_id: QuestionId) -> Result<bool> {
        let row = question_voter::Entity::find_by_id((user_id.0, question_id.0))
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(row.is_some())
    }

    pub async fn has_voted_answer(&self, user_id: UserId, answer_id: AnswerId) -> Result<bool> {
        let row = answer_voter::Entity::find_by_id((user_id.0, answer_id.0))
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(row.is_some())
    }

    /// Number of votes on a target
    pub async fn count(&self, target: VoteTarget) -> Result<u64> {
        match target {
            VoteTarget::Question(id) => question_voter::Entity::find()
                .filter(question_voter::Column::QuestionId.eq(id.0))
                .count(self.db)
                .await
                .map_err(db_err),
            VoteTarget::Answer(id) => answer_voter::Entity::find()
                .filter(answer_voter::Column::AnswerId.eq(id.0))
                .count(self.db)
                .await
                .map_err(db_err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use pretty_assertions::assert_eq;
    use qf_core::model::{NewAnswer, NewQuestion};
    use qf_core::ConstraintKind;

    #[tokio::test]
    async fn test_vote_once_per_question() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
        let q = t
            .questions()
            .create(NewQuestion::new(alice.id, "Q1", "body"))
            .await
            .unwrap();

        t.votes().vote_question(bob.id, q.id).await.unwrap();
        let err = t.votes().vote_question(bob.id, q.id).await.unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::Unique));

        t.votes().vote_question(alice.id, q.id).await.unwrap();
        assert_eq!(t.votes().count(VoteTarget::Question(q.id)).await.unwrap(), 2);
        assert_eq!(
            t.votes().question_voters(q.id).await.unwrap(),
            vec![alice.clone(), bob.clone()]
        );
        assert!(t.votes().has_voted_question(bob.id, q.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_answer_votes() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
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

        assert!(!t.votes().has_voted_answer(bob.id, a.id).await.unwrap());
        t.votes().vote(bob.id, VoteTarget::Answer(a.id)).await.unwrap();
        assert!(t.votes().has_voted_answer(bob.id, a.id).await.unwrap());
        assert_eq!(t.votes().answer_voters(a.id).await.unwrap(), vec![bob]);
        assert_eq!(t.votes().count(VoteTarget::Question(q.id)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_vote_on_missing_target_rejected() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;

        let err = t
            .votes()
            .vote_question(alice.id, QuestionId(5))
            .await
            .unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));

        let err = t
            .votes()
            .vote_answer(alice.id, AnswerId(5))
            .await
            .unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
    }

    #[tokio::test]
    async fn test_vote_by_missing_user_rejected() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let q = t
            .questions()
            .create(NewQuestion::new(alice.id, "Q1", "body"))
            .await
            .unwrap();

        let err = t.votes().vote_question(UserId(42), q.id).await.unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
    }

    #[tokio::test]
    async fn test_votes_removed_with_target() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
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
        t.votes().vote_question(bob.id, q.id).await.unwrap();
        t.votes().vote_answer(bob.id, a.id).await.unwrap();

        t.questions().delete(q.id).await.unwrap();

        assert_eq!(t.votes().count(VoteTarget::Question(q.id)).await.unwrap(), 0);
        assert_eq!(t.votes().count(VoteTarget::Answer(a.id)).await.unwrap(), 0);
        assert!(t.users().find(bob.id).await.unwrap().is_some());
    }
}
