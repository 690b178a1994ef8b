use sea_orm_migration::prelude::*;

/// Creates the `games_join_requests` table.
///
/// Status codes: 1 = pending, 2 = accepted, 3 = declined. Requests are never
/// deleted; terminal rows remain as an audit trail.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum GamesJoinRequests {
    Table,
    RequestId,
    GameId,
    UserId,
    CharacterId,
    Message,
    StatusCode,
}

#[derive(DeriveIden)]
enum Games {
    Table,
    GameId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
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
                    .table(GamesJoinRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GamesJoinRequests::RequestId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GamesJoinRequests::GameId).integer().not_null())
                    .col(ColumnDef::new(GamesJoinRequests::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(GamesJoinRequests::CharacterId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GamesJoinRequests::Message).string_len(255).null())
                    .col(
                        ColumnDef::new(GamesJoinRequests::StatusCode)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_join_request_game_id")
                            .from(GamesJoinRequests::Table, GamesJoinRequests::GameId)
                            .to(Games::Table, Games::GameId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_join_request_user_id")
                            .from(GamesJoinRequests::Table, GamesJoinRequests::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_join_request_character_id")
                            .from(GamesJoinRequests::Table, GamesJoinRequests::CharacterId)
                            .to(Characters::Table, Characters::CharacterId),
                    )
                    .to_owned(),
            )
            .await?;

        // The GM inbox is listed per game, filtered by status
        manager
            .create_index(
                Index::create()
                    .name("idx_join_request_game_id_status")
                    .table(GamesJoinRequests::Table)
                    .col(GamesJoinRequests::GameId)
                    .col(GamesJoinRequests::StatusCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GamesJoinRequests::Table).to_owned())
            .await
    }
}
