//! Migrator registering schema steps in the order they must run.
//! Every applied step is recorded in the `seaql_migrations` ledger, so re-running is a no-op.
pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::seaql_migrations;

mod m20240601_000001_create_customer;
mod m20240601_000002_add_customer_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_customer::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000002_add_customer_indexes::Migration),
        ]
    }
}
