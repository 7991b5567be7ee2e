//! Ledger RPC server.
//!
//! Main entry point: loads configuration, connects the store, wraps the
//! ledger service in the authorization gate and serves it over HTTP.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gledger_api::{AppState, create_router, gate::AuthGate, service::LedgerService};
use gledger_db::migration::{Migrator, MigratorTrait};
use gledger_shared::{AppConfig, JwtVerifier};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gledger=info,tower_http=info".into());

    // LOG_FORMAT=json for log shippers, human readable otherwise.
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = gledger_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    if config.database.migrate_on_start {
        Migrator::up(&db, None).await.context("failed to run migrations")?;
        info!("Migrations applied");
    }

    let public_key = std::fs::read(&config.auth.public_key_file).with_context(|| {
        format!("failed to read public key {}", config.auth.public_key_file)
    })?;
    let verifier = JwtVerifier::from_rsa_pem(
        &public_key,
        &config.auth.algorithm,
        config.auth.leeway_secs,
    )
    .context("failed to load token verification key")?;
    info!(algorithm = %config.auth.algorithm, "Token verification configured");

    let service = LedgerService::new(db);
    let gate = AuthGate::new(Arc::new(service), verifier);

    let app = create_router(AppState {
        api: Arc::new(gate),
        token_header: config.auth.token_header.clone(),
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
