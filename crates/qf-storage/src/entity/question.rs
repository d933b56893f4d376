//! `question` table

use qf_core::model::Question;
use qf_core::{QuestionId, UserId};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub create_date: DateTimeUtc,
    pub user_id: i32,
    pub modify_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Question {
    fn from(m: Model) -> Self {
        Question {
            id: QuestionId(m.id),
            subject: m.subject,
            content: m.content,
            create_date: m.create_date,
            modify_date: m.modify_date,
            user_id: UserId(m.user_id),
        }
    }
}
