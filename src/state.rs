use std::env;

use migration::Migrator;
use reqwest::Client;

use crate::{gate::Gate, prelude::*, sv};

#[derive(Debug, Clone)]
pub struct IdpConfig {
  /// Base url of the identity provider, e.g. `https://xyz.supabase.co`
  pub url: String,
  /// Public (anon) api key sent with every auth call
  pub anon_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  /// HS256 secret the identity provider signs access tokens with
  pub jwt_secret: String,
  pub idp: IdpConfig,
  pub recommendations: u64,
  pub gate_sweep: Duration,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:cookrank.db?mode=rwc"),
      port: 3000,
      jwt_secret: String::new(),
      idp: IdpConfig { url: String::new(), anon_key: String::new() },
      recommendations: 3,
      gate_sweep: Duration::from_secs(60),
    }
  }
}

fn required(key: &str) -> anyhow::Result<String> {
  let value = env::var(key).with_context(|| format!("{key} not set"))?;
  anyhow::ensure!(!value.trim().is_empty(), "{key} is empty");
  Ok(value)
}

fn optional<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
  T::Err: std::error::Error + Send + Sync + 'static,
{
  match env::var(key) {
    Ok(raw) => raw.trim().parse().with_context(|| format!("Invalid {key}")),
    Err(_) => Ok(default),
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let default = Self::default();

    let gate_sweep = match env::var("GATE_SWEEP_INTERVAL") {
      Ok(raw) => humantime::parse_duration(raw.trim())
        .context("Invalid GATE_SWEEP_INTERVAL")?,
      Err(_) => default.gate_sweep,
    };
    anyhow::ensure!(!gate_sweep.is_zero(), "GATE_SWEEP_INTERVAL must be positive");

    Ok(Self {
      database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),
      port: optional("PORT", default.port)?,
      jwt_secret: required("JWT_SECRET")?,
      idp: IdpConfig {
        url: required("IDP_URL")?.trim_end_matches('/').to_string(),
        anon_key: required("IDP_ANON_KEY")?,
      },
      recommendations: optional("RECOMMENDATION_COUNT", default.recommendations)?,
      gate_sweep,
    })
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub skill: sv::Skill<'a>,
  pub recipe: sv::Recipe<'a>,
  pub submission: sv::Submission<'a>,
  pub evaluation: sv::Evaluation<'a>,
  pub identity: sv::Identity<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
  pub gate: Gate,
  pub http: Client,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Self::with_db(db, config)
  }

  pub fn with_db(db: DatabaseConnection, config: Config) -> anyhow::Result<Self> {
    let http = Client::builder()
      .user_agent(concat!("cookrank/", env!("CARGO_PKG_VERSION")))
      .timeout(Duration::from_secs(15))
      .build()
      .context("Failed to build http client")?;

    Ok(Self { db, config, gate: Gate::new(), http })
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      user: sv::User::new(&self.db),
      skill: sv::Skill::new(&self.db),
      recipe: sv::Recipe::new(&self.db),
      submission: sv::Submission::new(&self.db),
      evaluation: sv::Evaluation::new(&self.db, &self.gate),
      identity: sv::Identity::new(&self.db, &self.http, &self.config.idp),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::user;

  #[tokio::test]
  async fn test_new_runs_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookrank.db");
    let config = Config {
      database_url: format!("sqlite:{}?mode=rwc", path.display()),
      ..Config::default()
    };

    let app = tokio_test::assert_ok!(AppState::new(config.clone()).await);
    let id = Uuid::new_v4();
    app.sv().user.register(id, Default::default()).await.unwrap();
    drop(app);

    // applied migrations are skipped on the next start
    let app = tokio_test::assert_ok!(AppState::new(config).await);
    assert!(user::Entity::find_by_id(id).one(&app.db).await.unwrap().is_some());
  }
}
