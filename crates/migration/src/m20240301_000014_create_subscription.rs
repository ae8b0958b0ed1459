//! Create `subscription` table with FK to `provider`.
//!
//! The subscription gate reads status/payment_status/end_date; payment
//! columns are filled by the webhook flow.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(uuid(Subscription::Id).primary_key())
                    .col(uuid(Subscription::ProviderId).not_null())
                    .col(string_len(Subscription::PlanName, 32).not_null())
                    .col(timestamp_with_time_zone(Subscription::StartDate).not_null())
                    .col(timestamp_with_time_zone(Subscription::EndDate).not_null())
                    .col(
                        ColumnDef::new(Subscription::RenewalDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(string_len(Subscription::Status, 32).not_null())
                    .col(double(Subscription::Amount).not_null())
                    .col(string_len(Subscription::PaymentStatus, 32).not_null())
                    .col(
                        ColumnDef::new(Subscription::StripePaymentIntentId)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Subscription::StripeCheckoutSessionId)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Subscription::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Subscription::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Subscription::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_provider")
                            .from(Subscription::Table, Subscription::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscription::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscription {
    Table,
    Id,
    ProviderId,
    PlanName,
    StartDate,
    EndDate,
    RenewalDate,
    Status,
    Amount,
    PaymentStatus,
    StripePaymentIntentId,
    StripeCheckoutSessionId,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Provider { Table, Id }
