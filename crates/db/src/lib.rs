//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ledger tables
//! - The generic optimistic-concurrency store
//! - Repositories, including the transaction posting engine
//! - Database migrations

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use repositories::{
    AccountFields, AccountRepository, AccountTypeRepository, AccountView, OrganizationFields,
    OrganizationRepository, PartyRepository, TransactionFields, TransactionRepository,
    TransactionTypeRepository, TransactionView, TransactionWrapper,
};

use std::time::Duration;

use gledger_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}
