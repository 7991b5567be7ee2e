//! Database migration runner for the ledger schema.
//!
//! Reads `DATABASE_URL` (or `-u <url>`) and accepts the standard
//! sea-orm-migration subcommands:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - List applied and pending migrations
//!   migrator fresh   - Drop every table and migrate from scratch

use sea_orm_migration::prelude::*;
use gledger_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
