//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. Tables are derived from
//! the entity definitions so the same migration runs on every backend.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_ledger_tables;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_ledger_tables::Migration)]
    }
}
