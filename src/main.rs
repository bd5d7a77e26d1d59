//! cookrank - recipe learning backend
//!
//! Architecture:
//! - SeaORM for database access (SQLite or Postgres)
//! - Axum for the HTTP API with rate limiting
//! - An external identity provider issues the bearer tokens
//! - Skill progress and ranks are derived from evaluator verdicts

mod auth;
mod entity;
mod error;
mod gate;
mod plugins;
mod prelude;
mod progress;
mod state;
mod sv;
#[cfg(test)]
mod testing;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  plugins::{App, server, sweeper::Sweeper},
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "cookrank=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;
  info!("Starting cookrank v{}", env!("CARGO_PKG_VERSION"));

  let app = Arc::new(AppState::new(config).await?);

  let services =
    App::new().register(server::Plugin).register(Sweeper).run(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
  info!("Shutting down...");
  for service in services {
    service.abort();
  }

  Ok(())
}
