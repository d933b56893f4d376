//! User rows

use crate::entity::{answer, comment, question, user};
use crate::error::db_err;
use qf_core::config::UserDeletePolicy;
use qf_core::error::{ConstraintKind, ForumError, Result};
use qf_core::model::{AuthoredCounts, NewUser, User, UserUpdate};
use qf_core::UserId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, warn};

pub struct UserRepo<'a> {
    db: &'a DatabaseConnection,
    policy: UserDeletePolicy,
}

impl<'a> UserRepo<'a> {
    pub fn new(db: &'a DatabaseConnection, policy: UserDeletePolicy) -> Self {
        Self { db, policy }
    }

    /// Register a user; username and email must be unused
    pub async fn create(&self, new: NewUser) -> Result<User> {
        let model = user::ActiveModel {
            username: Set(new.username),
            password: Set(new.password),
            email: Set(new.email),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(db_err)?;

        debug!("Created user {} ({})", model.id, model.username);
        Ok(model.into())
    }

    pub async fn find(&self, id: UserId) -> Result<Option<User>> {
        let model = user::Entity::find_by_id(id.0)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        self.find(id)
            .await?
            .ok_or_else(|| ForumError::not_found(UserId::ENTITY, id.0))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    /// All users by id
    pub async fn list(&self) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: UserId, changes: UserUpdate) -> Result<User> {
        let model = user::Entity::find_by_id(id.0)
            .one(self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ForumError::not_found(UserId::ENTITY, id.0))?;

        if changes.is_empty() {
            return Ok(model.into());
        }

        let mut active: user::ActiveModel = model.into();
        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(password) = changes.password {
            active.password = Set(password);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }

        let model = active.update(self.db).await.map_err(db_err)?;
        debug!("Updated user {}", model.id);
        Ok(model.into())
    }

    /// Questions, answers and comments written by a user
    pub async fn authored_counts(&self, id: UserId) -> Result<AuthoredCounts> {
        authored_counts(self.db, id).await
    }

    /// Delete a user and, through the foreign keys, their votes.
    ///
    /// Authored content follows the configured policy: under `Cascade` it is
    /// deleted too, under `Restrict` the call fails while any remains.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let counts = authored_counts(&txn, id).await?;

        if self.policy == UserDeletePolicy::Restrict && counts.total() > 0 {
            warn!("Refusing to delete user {} with {} authored rows", id, counts.total());
            return Err(ForumError::constraint(
                ConstraintKind::ForeignKey,
                format!(
                    "user {} still authors {} questions, {} answers, {} comments",
                    id, counts.questions, counts.answers, counts.comments
                ),
            ));
        }

        let result = user::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(ForumError::not_found(UserId::ENTITY, id.0));
        }
        txn.commit().await.map_err(db_err)?;

        info!(
            "Deleted user {} with {} questions, {} answers, {} comments",
            id, counts.questions, counts.answers, counts.comments
        );
        Ok(())
    }
}

async fn authored_counts<C: ConnectionTrait>(conn: &C, id: UserId) -> Result<AuthoredCounts> {
    let questions = question::Entity::find()
        .filter(question::Column::UserId.eq(id.0))
        .count(conn)
        .await
        .map_err(db_err)?;
    let answers = answer::Entity::find()
        .filter(answer::Column::UserId.eq(id.0))
        .count(conn)
        .await
        .map_err(db_err)?;
    let comments = comment::Entity::find()
        .filter(comment::Column::UserId.eq(id.0))
        .count(conn)
        .await
        .map_err(db_err)?;

    Ok(AuthoredCounts {
        questions,
        answers,
        comments,
    })
}
