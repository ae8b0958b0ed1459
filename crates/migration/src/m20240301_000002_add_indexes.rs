//! Secondary indexes for frequent lookups; applied after all tables exist.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Subscription gate scans a provider's subscriptions
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscription_provider_id")
                    .table(Subscription::Table)
                    .col(Subscription::ProviderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_work_post_provider_id")
                    .table(WorkPost::Table)
                    .col(WorkPost::ProviderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_review_provider_id")
                    .table(Review::Table)
                    .col(Review::ProviderId)
                    .to_owned(),
            )
            .await?;

        // Maintenance delete of expired revocation records scans by expiry
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_revoked_token_expires_at")
                    .table(RevokedToken::Table)
                    .col(RevokedToken::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_subscription_provider_id").table(Subscription::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_work_post_provider_id").table(WorkPost::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_provider_id").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_revoked_token_expires_at").table(RevokedToken::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subscription { Table, ProviderId }

#[derive(DeriveIden)]
enum WorkPost { Table, ProviderId }

#[derive(DeriveIden)]
enum Review { Table, ProviderId }

#[derive(DeriveIden)]
enum RevokedToken { Table, ExpiresAt }
