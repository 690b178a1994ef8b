use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub item_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub type_code: ItemType,
    pub reusable: bool,
    pub weight: f64,
    pub cost: i32,
    pub disabled: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Item category, stored as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[sea_orm(num_value = 1)]
    Gear,
    #[sea_orm(num_value = 2)]
    Weapon,
    #[sea_orm(num_value = 3)]
    Armor,
    #[sea_orm(num_value = 4)]
    Food,
    #[sea_orm(num_value = 5)]
    Goods,
    #[sea_orm(num_value = 6)]
    Clothing,
    #[sea_orm(num_value = 7)]
    Money,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
