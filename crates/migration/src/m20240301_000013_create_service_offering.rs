//! Create `service_offering` table: the public catalog of home services.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOffering::Table)
                    .if_not_exists()
                    .col(uuid(ServiceOffering::Id).primary_key())
                    .col(string_len(ServiceOffering::ServiceName, 128).not_null())
                    .col(text(ServiceOffering::Description).not_null())
                    .col(string_len(ServiceOffering::Category, 64).not_null())
                    .col(string_len(ServiceOffering::PriceRange, 64).not_null())
                    .col(string_len(ServiceOffering::ImageUrl, 512).not_null())
                    .col(timestamp_with_time_zone(ServiceOffering::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceOffering::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceOffering::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceOffering {
    Table,
    Id,
    ServiceName,
    Description,
    Category,
    PriceRange,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}
