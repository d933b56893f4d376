//! `answer` table

use qf_core::model::Answer;
use qf_core::{AnswerId, QuestionId, UserId};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "answer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub question_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub create_date: DateTimeUtc,
    pub user_id: i32,
    pub modify_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Answer {
    fn from(m: Model) -> Self {
        Answer {
            id: AnswerId(m.id),
            question_id: m.question_id.map(QuestionId),
            content: m.content,
            create_date: m.create_date,
            modify_date: m.modify_date,
            user_id: UserId(m.user_id),
        }
    }
}
