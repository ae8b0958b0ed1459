//! Create `revoked_token` table.
//!
//! One row per invalidated credential, keyed by its `jti`. Rows past
//! `expires_at` are dead weight only; a periodic delete stands in for a
//! document-store TTL index.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RevokedToken::Table)
                    .if_not_exists()
                    .col(uuid(RevokedToken::Id).primary_key())
                    .col(string_len(RevokedToken::Jti, 64).unique_key().not_null())
                    .col(timestamp_with_time_zone(RevokedToken::ExpiresAt).not_null())
                    .col(timestamp_with_time_zone(RevokedToken::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RevokedToken::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RevokedToken {
    Table,
    Id,
    Jti,
    ExpiresAt,
    CreatedAt,
}
