//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000011_create_user;
mod m20240301_000012_create_provider;
mod m20240301_000013_create_service_offering;
mod m20240301_000014_create_subscription;
mod m20240301_000015_create_revoked_token;
mod m20240301_000016_create_work_post;
mod m20240301_000017_create_review;
mod m20240301_000002_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000011_create_user::Migration),
            Box::new(m20240301_000012_create_provider::Migration),
            Box::new(m20240301_000013_create_service_offering::Migration),
            Box::new(m20240301_000014_create_subscription::Migration),
            Box::new(m20240301_000015_create_revoked_token::Migration),
            Box::new(m20240301_000016_create_work_post::Migration),
            Box::new(m20240301_000017_create_review::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000002_add_indexes::Migration),
        ]
    }
}
