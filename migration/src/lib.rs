pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_character_table;
mod m20260301_000003_create_game_table;
mod m20260301_000004_create_game_character_table;
mod m20260301_000005_create_join_request_table;
mod m20260302_000001_create_adventure_table;
mod m20260302_000002_create_item_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_character_table::Migration),
            Box::new(m20260301_000003_create_game_table::Migration),
            Box::new(m20260301_000004_create_game_character_table::Migration),
            Box::new(m20260301_000005_create_join_request_table::Migration),
            Box::new(m20260302_000001_create_adventure_table::Migration),
            Box::new(m20260302_000002_create_item_table::Migration),
        ]
    }
}
