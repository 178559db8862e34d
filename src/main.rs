//! Bank Backend server
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │ Gateway  │───▶│ Transfer │───▶│ Account  │───▶│  Store   │
//! │  (axum)  │    │  Engine  │    │ Service  │    │ (PG/mem) │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```
//!
//! Components are built once here and shared through `AppState`.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use bank_backend::config::AppConfig;
use bank_backend::gateway::{self, state::AppState};
use bank_backend::logging::init_logging;
use bank_backend::store::{MemoryStore, PgStore, Store};
use bank_backend::{AccountLocks, AccountService, TransferEngine};

#[derive(Parser)]
#[command(
    name = "bank_backend",
    version,
    about = "Accounts and atomic money transfers over HTTP"
)]
struct Args {
    /// Config environment, loads config/<env>.yaml
    #[arg(long, env = "BANK_ENV", default_value = "dev")]
    env: String,

    /// Override gateway.port from the config file
    #[arg(long, env = "BANK_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let app_config = AppConfig::load(&args.env)?;
    let _log_guard = init_logging(&app_config);

    tracing::info!("Starting bank backend in {} mode", args.env);

    let lock_timeout = app_config.transfer.lock_timeout();
    let store: Arc<dyn Store> = match app_config.postgres_url.as_deref() {
        Some(url) => {
            let store = PgStore::connect(url, lock_timeout)
                .await
                .context("failed to connect to PostgreSQL")?;
            tracing::info!("PostgreSQL connected, schema ready");
            Arc::new(store)
        }
        None => {
            tracing::warn!("postgres_url not set, using in-memory store (data is not persisted)");
            Arc::new(MemoryStore::new())
        }
    };

    let locks = Arc::new(AccountLocks::new(lock_timeout));
    let accounts = Arc::new(AccountService::new(store, locks));
    let transfers = Arc::new(TransferEngine::new(accounts));
    let state = Arc::new(AppState::new(transfers));

    let port = args.port.unwrap_or(app_config.gateway.port);
    gateway::run_server(&app_config.gateway.host, port, state).await
}
