use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "characters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub character_id: i32,
    pub name: String,
    pub biography: Option<String>,
    pub disabled: bool,
    pub user_owner_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserOwnerId",
        to = "super::user::Column::UserId"
    )]
    Owner,
    #[sea_orm(has_many = "super::game_character::Entity")]
    GameCharacters,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_character::Relation::Game.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::game_character::Relation::Character.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
