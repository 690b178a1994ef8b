use sea_orm_migration::prelude::*;

/// Creates the `adventures` table.
///
/// `aid` is the physical per-row id; `adventure_id` is the logical id shared by
/// all versions of one adventure. The row with the maximum `aid` for a logical
/// id is the current version. `adventure_id` defaults to 0 until the creation
/// bootstrap assigns it equal to the row's own `aid`.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Adventures {
    Table,
    Aid,
    AdventureId,
    Name,
    Plot,
    IsActive,
    IsLocked,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Adventures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Adventures::Aid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Adventures::AdventureId)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Adventures::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Adventures::Plot).text().null())
                    .col(
                        ColumnDef::new(Adventures::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Adventures::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Adventures::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Adventures::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // All reads resolve the latest version for a logical id
        manager
            .create_index(
                Index::create()
                    .name("idx_adventure_adventure_id")
                    .table(Adventures::Table)
                    .col(Adventures::AdventureId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Adventures::Table).to_owned())
            .await
    }
}
