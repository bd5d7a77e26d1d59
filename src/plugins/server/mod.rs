mod evaluation;
mod handlers;
mod recipe;
mod submission;

use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
  Router,
  extract::FromRequest,
  routing::{get, patch, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

/// JSON request body. Rejections answer in the same shape as [`Error`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Payload<T>(pub T);

pub fn router(app: Arc<AppState>) -> Router {
  let auth = Router::new()
    .route("/signup", post(handlers::sign_up))
    .route("/signin", post(handlers::sign_in))
    .route("/register-profile", post(handlers::register_profile))
    .route("/update-profile", patch(handlers::update_profile))
    .route("/update-auth", patch(handlers::update_auth));

  let recipes = Router::new()
    .route("/", get(recipe::all).post(recipe::create))
    .route("/recommended", get(recipe::recommended))
    .route("/challenge/{skill_id}", get(recipe::challenges))
    .route("/challenge/detail/{recipe_id}", get(recipe::challenge_detail))
    .route("/challenge/photo", post(recipe::save_step_photo))
    .route("/{recipe_id}", get(recipe::by_id))
    .route("/{recipe_id}/steps", get(recipe::steps));

  let submissions = Router::new()
    .route("/start", post(submission::start))
    .route("/photo", post(submission::save_step_photo))
    .route("/complete", post(submission::complete))
    .route("/{submission_id}", get(submission::detail));

  Router::new()
    .route("/health", get(handlers::health))
    .nest("/auth", auth)
    .route("/users/me", get(handlers::me))
    .route("/users/me/skills", get(handlers::my_skills))
    .route("/skills", get(handlers::skills).post(handlers::create_skill))
    .nest("/recipes", recipes)
    .nest("/submissions", submissions)
    .route("/evaluation/process", post(evaluation::process))
    .route("/evaluations", post(evaluation::create))
    .route("/skill-evaluations", post(evaluation::create_skill))
    .layer(
      ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
      ),
    )
    .with_state(app)
}

/// Per-client quota, refilled at `QUOTA_PER_SECOND` up to `QUOTA_BURST`.
const QUOTA_PER_SECOND: u64 = 2;
const QUOTA_BURST: u32 = 100;
const QUOTA_GC: Duration = Duration::from_secs(60);

/// Runs `retain` every [`QUOTA_GC`] so idle clients drop out of the limiter.
async fn forget_idle_clients(retain: impl Fn()) {
  let mut tick = time::interval(QUOTA_GC);
  tick.tick().await;
  loop {
    tick.tick().await;
    retain();
  }
}

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let quota = GovernorConfigBuilder::default()
      .per_second(QUOTA_PER_SECOND)
      .burst_size(QUOTA_BURST)
      .finish()
      .context("Invalid rate limit quota")?;
    let quota = Arc::new(quota);
    let limiter = quota.limiter().clone();

    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));
    let service = router(app)
      .layer(GovernorLayer::new(quota))
      .into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("cookrank API listening on {addr}");

    let server = async { axum::serve(listener, service).await };

    tokio::select! {
      served = server => {
        served.context("HTTP server failed")?;
        info!("HTTP server stopped");
        Ok(())
      }
      () = forget_idle_clients(move || limiter.retain_recent()) => Ok(()),
    }
  }
}
