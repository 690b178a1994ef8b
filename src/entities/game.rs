use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub game_id: i32,
    pub game_master_id: i32,
    pub game_state: bool,
    pub disabled: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::GameMasterId",
        to = "super::user::Column::UserId"
    )]
    GameMaster,
    #[sea_orm(has_many = "super::game_character::Entity")]
    GameCharacters,
    #[sea_orm(has_many = "super::join_request::Entity")]
    JoinRequests,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameMaster.def()
    }
}

impl Related<super::join_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JoinRequests.def()
    }
}

impl Related<super::character::Entity> for Entity {
    fn to() -> RelationDef {
        super::game_character::Relation::Character.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::game_character::Relation::Game.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
