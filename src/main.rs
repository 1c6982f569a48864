//! CerveLingua progress ledger
//!
//! Records XP, levels, streaks and per-item progress for learners.
//!
//! Architecture:
//! - SeaORM for database access (SQLite)
//! - Axum for the HTTP API with rate limiting
//! - Tokio for async runtime, supervised plugins for long-running services

mod clock;
mod entity;
mod error;
mod plugins;
mod policy;
mod prelude;
mod report;
mod state;
mod sv;
mod utils;

use std::env;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "cervelingua_ledger=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_url = env::var("DATABASE_URL")
    .unwrap_or_else(|_| "sqlite:cervelingua.db?mode=rwc".into());
  let config = Config::from_env()?;

  info!("Starting CerveLingua ledger v{}", env!("CARGO_PKG_VERSION"));
  info!(
    "Ledger timeout {}, lock gc every {}, restart delay {}",
    humantime::format_duration(config.ledger_timeout),
    humantime::format_duration(config.lock_gc_interval),
    humantime::format_duration(config.restart_delay)
  );

  let app = Arc::new(AppState::new(&db_url, config).await?);

  let services = plugins::Runner::default()
    .register(plugins::server::Plugin)
    .register(plugins::locks::Plugin)
    .run(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
  info!("Shutting down");

  for service in services {
    service.abort();
    let _ = service.await;
  }

  Ok(())
}
