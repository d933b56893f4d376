//! Question rows and the question listing

use crate::entity::{answer, question, question_voter, user};
use crate::error::db_err;
use crate::repo::VoteRepo;
use chrono::Utc;
use qf_core::error::{ForumError, Result};
use qf_core::model::{NewQuestion, Page, Question, QuestionQuery, QuestionUpdate, User};
use qf_core::{QuestionId, UserId};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait, Set,
};
use tracing::{debug, info};

pub struct QuestionRepo<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> QuestionRepo<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Post a question; `create_date` is stamped here
    pub async fn create(&self, new: NewQuestion) -> Result<Question> {
        let model = question::ActiveModel {
            subject: Set(new.subject),
            content: Set(new.content),
            create_date: Set(Utc::now()),
            user_id: Set(new.user_id.0),
            modify_date: Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(db_err)?;

        debug!("Created question {} by user {}", model.id, model.user_id);
        Ok(model.into())
    }

    pub async fn find(&self, id: QuestionId) -> Result<Option<Question>> {
        let model = question::Entity::find_by_id(id.0)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    pub async fn get(&self, id: QuestionId) -> Result<Question> {
        self.find(id)
            .await?
            .ok_or_else(|| ForumError::not_found(QuestionId::ENTITY, id.0))
    }

    /// Questions a user posted, newest first
    pub async fn by_user(&self, user_id: UserId) -> Result<Vec<Question>> {
        let models = question::Entity::find()
            .filter(question::Column::UserId.eq(user_id.0))
            .order_by_desc(question::Column::CreateDate)
            .order_by_desc(question::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// One page of questions, newest first, optionally filtered by keyword.
    ///
    /// The keyword matches subject, content and author name, and also any
    /// answer content or answer author name under the question.
    pub async fn list(&self, query: &QuestionQuery) -> Result<Page<Question>> {
        let mut select = question::Entity::find()
            .join(JoinType::InnerJoin, question::Relation::User.def())
            .order_by_desc(question::Column::CreateDate)
            .order_by_desc(question::Column::Id);

        if let Some(keyword) = &query.keyword {
            let pattern = escape_like(keyword);
            let contains = || LikeExpr::new(format!("%{}%", pattern)).escape('\\');
            let answered = answer::Entity::find()
                .select_only()
                .column(answer::Column::QuestionId)
                .join(JoinType::InnerJoin, answer::Relation::User.def())
                .filter(
                    Condition::any()
                        .add(answer::Column::Content.like(contains()))
                        .add(user::Column::Username.like(contains())),
                )
                .into_query();

            select = select.filter(
                Condition::any()
                    .add(question::Column::Subject.like(contains()))
                    .add(question::Column::Content.like(contains()))
                    .add(user::Column::Username.like(contains()))
                    .add(question::Column::Id.in_subquery(answered)),
            );
        }

        let per_page = query.per_page.max(1);
        let paginator = select.paginate(self.db, per_page);
        let total = paginator.num_items().await.map_err(db_err)?;

        let in_range = query
            .page
            .checked_mul(per_page)
            .is_some_and(|offset| offset < total);
        let items = if in_range {
            paginator.fetch_page(query.page).await.map_err(db_err)?
        } else {
            debug!("Page {} is past the last of {} questions", query.page, total);
            Vec::new()
        };

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            total,
            page: query.page,
            per_page,
        })
    }

    /// Apply changes; the caller decides whether `modify_date` moves
    pub async fn update(&self, id: QuestionId, changes: QuestionUpdate) -> Result<Question> {
        let model = question::Entity::find_by_id(id.0)
            .one(self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ForumError::not_found(QuestionId::ENTITY, id.0))?;

        if changes.is_empty() {
            return Ok(model.into());
        }

        let mut active: question::ActiveModel = model.into();
        if let Some(subject) = changes.subject {
            active.subject = Set(subject);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(at) = changes.modify_date {
            active.modify_date = Set(Some(at));
        }

        let model = active.update(self.db).await.map_err(db_err)?;
        debug!("Updated question {}", model.id);
        Ok(model.into())
    }

    /// Delete a question with its answers, comments and votes
    pub async fn delete(&self, id: QuestionId) -> Result<()> {
        let answers = self.answer_count(id).await?;
        let result = question::Entity::delete_by_id(id.0)
            .exec(self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(ForumError::not_found(QuestionId::ENTITY, id.0));
        }

        info!("Deleted question {} and {} answers", id, answers);
        Ok(())
    }

    pub async fn answer_count(&self, id: QuestionId) -> Result<u64> {
        answer::Entity::find()
            .filter(answer::Column::QuestionId.eq(id.0))
            .count(self.db)
            .await
            .map_err(db_err)
    }

    pub async fn voters(&self, id: QuestionId) -> Result<Vec<User>> {
        VoteRepo::new(self.db).question_voters(id).await
    }

    pub async fn voter_count(&self, id: QuestionId) -> Result<u64> {
        question_voter::Entity::find()
            .filter(question_voter::Column::QuestionId.eq(id.0))
            .count(self.db)
            .await
            .map_err(db_err)
    }
}

/// Escape `LIKE` wildcards so the keyword matches literally under `ESCAPE '\\'`
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use pretty_assertions::assert_eq;
    use qf_core::model::NewAnswer;
    use qf_core::schema::tables::SUBJECT_MAX;
    use qf_core::ConstraintKind;

    #[tokio::test]
    async fn test_create_and_get() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let q = t
            .questions()
            .create(NewQuestion::new(alice.id, "Q1", "How do lifetimes work?"))
            .await
            .unwrap();

        assert_eq!(q.subject, "Q1");
        assert_eq!(q.user_id, alice.id);
        assert!(q.modify_date.is_none());
        assert_eq!(t.questions().get(q.id).await.unwrap(), q);
    }

    #[tokio::test]
    async fn test_missing_author_rejected() {
        let t = TestStore::new().await;
        let err = t
            .questions()
            .create(NewQuestion::new(UserId(42), "Q1", "body"))
            .await
            .unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
    }

    #[tokio::test]
    async fn test_subject_length_checked() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let err = t
            .questions()
            .create(NewQuestion::new(
                alice.id,
                "s".repeat(SUBJECT_MAX as usize + 1),
                "body",
            ))
            .await
            .unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
    }

    #[tokio::test]
    async fn test_update_leaves_modify_date_to_caller() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let q = t
            .questions()
            .create(NewQuestion::new(alice.id, "Q1", "body"))
            .await
            .unwrap();

        let edited = t
            .questions()
            .update(q.id, QuestionUpdate::new().content("better body"))
            .await
            .unwrap();
        assert_eq!(edited.content, "better body");
        assert!(edited.modify_date.is_none());

        let touched = t
            .questions()
            .update(q.id, QuestionUpdate::new().subject("Q1!").touch())
            .await
            .unwrap();
        assert_eq!(touched.subject, "Q1!");
        assert!(touched.modify_date.is_some());
        assert_eq!(touched.create_date, q.create_date);
    }

    #[tokio::test]
    async fn test_delete_missing_question() {
        let t = TestStore::new().await;
        let err = t.questions().delete(QuestionId(7)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_removes_answers() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
        let q = t
            .questions()
            .create(NewQuestion::new(alice.id, "Q1", "body"))
            .await
            .unwrap();
        let mut answer_ids = Vec::new();
        for i in 0..3 {
            let a = t
                .answers()
                .create(NewAnswer::new(q.id, bob.id, format!("answer {}", i)))
                .await
                .unwrap();
            answer_ids.push(a.id);
        }
        assert_eq!(t.questions().answer_count(q.id).await.unwrap(), 3);

        t.questions().delete(q.id).await.unwrap();

        for id in answer_ids {
            assert!(t.answers().find(id).await.unwrap().is_none());
        }
        assert_eq!(t.questions().answer_count(q.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_by_user() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
        for subject in ["A1", "A2"] {
            t.questions()
                .create(NewQuestion::new(alice.id, subject, "body"))
                .await
                .unwrap();
        }
        t.questions()
            .create(NewQuestion::new(bob.id, "B1", "body"))
            .await
            .unwrap();

        let subjects: Vec<_> = t
            .questions()
            .by_user(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.subject)
            .collect();
        assert_eq!(subjects, vec!["A2", "A1"]);
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        for i in 1..=5 {
            t.questions()
                .create(NewQuestion::new(alice.id, format!("Q{}", i), "body"))
                .await
                .unwrap();
        }

        let first = t
            .questions()
            .list(&QuestionQuery::new().per_page(2))
            .await
            .unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.page_count(), 3);
        let subjects: Vec<_> = first.items.iter().map(|q| q.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Q5", "Q4"]);

        let last = t
            .questions()
            .list(&QuestionQuery::new().per_page(2).page(2))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].subject, "Q1");
        assert!(!last.has_next());
    }

    #[tokio::test]
    async fn test_list_keyword_search() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let bob = t.user("bob").await;
        let borrow = t
            .questions()
            .create(NewQuestion::new(alice.id, "Borrow checker", "why?"))
            .await
            .unwrap();
        let traits = t
            .questions()
            .create(NewQuestion::new(alice.id, "Traits", "dyn or impl?"))
            .await
            .unwrap();
        let by_bob = t
            .questions()
            .create(NewQuestion::new(bob.id, "Macros", "hygiene"))
            .await
            .unwrap();
        t.answers()
            .create(NewAnswer::new(traits.id, alice.id, "use a borrow instead"))
            .await
            .unwrap();

        let ids = |page: Page<Question>| -> Vec<QuestionId> {
            page.items.into_iter().map(|q| q.id).collect()
        };

        let hits = t
            .questions()
            .list(&QuestionQuery::new().keyword("borrow"))
            .await
            .unwrap();
        assert_eq!(hits.total, 2);
        assert_eq!(ids(hits), vec![traits.id, borrow.id]);

        let hits = t
            .questions()
            .list(&QuestionQuery::new().keyword("bob"))
            .await
            .unwrap();
        assert_eq!(ids(hits), vec![by_bob.id]);

        let hits = t
            .questions()
            .list(&QuestionQuery::new().keyword("nothing matches"))
            .await
            .unwrap();
        assert_eq!(hits.total, 0);
        assert!(hits.items.is_empty());
    }

    #[tokio::test]
    async fn test_keyword_matches_answer_author() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let carol = t.user("carol").await;
        let q = t
            .questions()
            .create(NewQuestion::new(alice.id, "Async", "tokio or smol?"))
            .await
            .unwrap();
        t.questions()
            .create(NewQuestion::new(alice.id, "Unrelated", "body"))
            .await
            .unwrap();
        t.answers()
            .create(NewAnswer::new(q.id, carol.id, "tokio"))
            .await
            .unwrap();

        let hits = t
            .questions()
            .list(&QuestionQuery::new().keyword("carol"))
            .await
            .unwrap();
        assert_eq!(hits.items.len(), 1);
        assert_eq!(hits.items[0].id, q.id);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[tokio::test]
    async fn test_keyword_wildcards_match_literally() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        let percent = t
            .questions()
            .create(NewQuestion::new(alice.id, "100% CPU", "busy loop"))
            .await
            .unwrap();
        let snake = t
            .questions()
            .create(NewQuestion::new(alice.id, "snake_case names", "style"))
            .await
            .unwrap();
        t.questions()
            .create(NewQuestion::new(alice.id, "Lifetimes", "plain text"))
            .await
            .unwrap();

        let hits = t
            .questions()
            .list(&QuestionQuery::new().keyword("%"))
            .await
            .unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].id, percent.id);

        let hits = t
            .questions()
            .list(&QuestionQuery::new().keyword("_"))
            .await
            .unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.items[0].id, snake.id);
    }

    #[tokio::test]
    async fn test_list_far_past_last_page_is_empty() {
        let t = TestStore::new().await;
        let alice = t.user("alice").await;
        for i in 1..=3 {
            t.questions()
                .create(NewQuestion::new(alice.id, format!("Q{}", i), "body"))
                .await
                .unwrap();
        }

        let page = t
            .questions()
            .list(&QuestionQuery::new().page(u64::MAX / 2))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_next());

        let page = t
            .questions()
            .list(&QuestionQuery::new().page(1))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert!(page.has_prev());
    }
}
