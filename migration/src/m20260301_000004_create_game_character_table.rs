use sea_orm_migration::prelude::*;

/// Creates the `games_characters` join table: the active roster of each game.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GamesCharacters {
    Table,
    Id,
    GameId,
    CharacterId,
}

#[derive(DeriveIden)]
enum Games {
    Table,
    GameId,
}

#[derive(DeriveIden)]
enum Characters {
    Table,
    CharacterId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GamesCharacters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GamesCharacters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GamesCharacters::GameId).integer().not_null())
                    .col(
                        ColumnDef::new(GamesCharacters::CharacterId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_characters_game_id")
                            .from(GamesCharacters::Table, GamesCharacters::GameId)
                            .to(Games::Table, Games::GameId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_characters_character_id")
                            .from(GamesCharacters::Table, GamesCharacters::CharacterId)
                            .to(Characters::Table, Characters::CharacterId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A character holds at most one seat across all games. Unique so a
        // concurrent double-accept fails at insert even if both transactions
        // read an empty seat count.
        manager
            .create_index(
                Index::create()
                    .name("idx_games_characters_character_id")
                    .table(GamesCharacters::Table)
                    .col(GamesCharacters::CharacterId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GamesCharacters::Table).to_owned())
            .await
    }
}
