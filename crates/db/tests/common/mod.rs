//! Shared fixtures for the database integration tests.
//!
//! Each test gets its own SQLite database with the ledger schema migrated
//! in. [`setup`] uses an in-memory database behind a single connection, so
//! calls made at the same time queue on that connection. [`setup_file`]
//! uses a database file and a pool of several connections, so calls really
//! race each other.

#![allow(dead_code)]

use chrono::NaiveDate;
use gledger_db::{
    AccountFields, AccountRepository, AccountTypeRepository, OrganizationFields,
    OrganizationRepository, PartyRepository, TransactionFields, TransactionRepository,
    TransactionTypeRepository,
    migration::{Migrator, MigratorTrait},
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;
use uuid::Uuid;

pub const TENANT: i64 = 1001;
pub const OTHER_TENANT: i64 = 2002;

pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

/// Opens a file-backed database with `connections` pooled connections.
///
/// The returned directory holds the database file; keep it alive for the
/// length of the test.
pub async fn setup_file(connections: u32) -> (DatabaseConnection, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("ledger.db").display());

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(connections)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open database file");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    (db, dir)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn organization(name: &str) -> OrganizationFields {
    OrganizationFields {
        organization_name: name.to_string(),
        from_date: date(2020, 1, 1),
        to_date: None,
    }
}

pub fn transaction(organization_id: Uuid, transaction_type_id: i32, on: NaiveDate) -> TransactionFields {
    TransactionFields {
        organization_id,
        transaction_type_id,
        transaction_date: on,
        transaction_description: "test".to_string(),
        from_party_id: None,
        to_party_id: None,
        posted_via_key: None,
        posted_via_date: None,
    }
}

/// Ids of a minimal chart for one tenant.
pub struct Ledger {
    pub organization_id: Uuid,
    pub cash: Uuid,
    pub revenue: Uuid,
}

/// Creates an organization, account type 1, transaction type 1 and two
/// accounts for `tenant`.
pub async fn seed_ledger(db: &DatabaseConnection, tenant: i64) -> Ledger {
    let org = OrganizationRepository::new(db.clone())
        .create(tenant, organization("acme"))
        .await
        .expect("create organization");

    AccountTypeRepository::new(db.clone())
        .create(tenant, 1, "asset".to_string())
        .await
        .expect("create account type");

    TransactionTypeRepository::new(db.clone())
        .create(tenant, 1, "journal".to_string())
        .await
        .expect("create transaction type");

    let accounts = AccountRepository::new(db.clone());
    let account = |name: &str| AccountFields {
        organization_id: org.organization_id,
        account_type_id: 1,
        account_name: name.to_string(),
        account_description: format!("{name} account"),
    };
    let cash = accounts
        .create(tenant, account("cash"))
        .await
        .expect("create cash account");
    let revenue = accounts
        .create(tenant, account("revenue"))
        .await
        .expect("create revenue account");

    Ledger {
        organization_id: org.organization_id,
        cash: cash.gl_account_id,
        revenue: revenue.gl_account_id,
    }
}

/// Creates a transaction dated `on` and returns its id.
pub async fn seed_transaction(db: &DatabaseConnection, tenant: i64, ledger: &Ledger, on: NaiveDate) -> i64 {
    TransactionRepository::new(db.clone())
        .create(tenant, transaction(ledger.organization_id, 1, on))
        .await
        .expect("create transaction")
        .gl_transaction_id
}

pub async fn seed_party(db: &DatabaseConnection, tenant: i64, id: i64, name: &str) {
    PartyRepository::new(db.clone())
        .create(tenant, id, name.to_string())
        .await
        .expect("create party");
}
