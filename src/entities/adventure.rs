use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One physical version row of a logical adventure.
///
/// `aid` is the auto-incremented physical id; `adventure_id` is the logical id
/// shared by every version of the same adventure. The current version for a
/// logical id is the row with the maximum `aid`. Prior rows are kept as
/// history and never deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "adventures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub aid: i32,
    pub adventure_id: i32,
    pub name: String,
    pub plot: Option<String>,
    pub is_active: bool,
    /// Reserved: set once a live session references this exact version, at
    /// which point updates fork a new row instead of mutating this one.
    pub is_locked: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
