//! Create `work_post` table with FK to `provider` (portfolio entries).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkPost::Table)
                    .if_not_exists()
                    .col(uuid(WorkPost::Id).primary_key())
                    .col(uuid(WorkPost::ProviderId).not_null())
                    .col(string_len(WorkPost::Title, 128).not_null())
                    .col(text(WorkPost::Description).not_null())
                    .col(string_len(WorkPost::ImageUrl, 512).not_null())
                    .col(
                        ColumnDef::new(WorkPost::JobReference)
                            .string_len(64)
                            .null(),
                    )
                    .col(timestamp_with_time_zone(WorkPost::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(WorkPost::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_post_provider")
                            .from(WorkPost::Table, WorkPost::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(WorkPost::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum WorkPost {
    Table,
    Id,
    ProviderId,
    Title,
    Description,
    ImageUrl,
    JobReference,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Provider { Table, Id }
