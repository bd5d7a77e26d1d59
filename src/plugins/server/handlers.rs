use axum::{Json, extract::State, http::StatusCode};

use super::Payload;
use crate::{
  auth::{AuthUser, Permission},
  entity::{skill, user},
  prelude::*,
  state::AppState,
  sv::{
    identity::{Credentials, CredentialsUpdate, SignedUp},
    skill::NewSkill,
    user::{ProfileUpdate, SkillProgress},
  },
};

pub async fn health() -> &'static str {
  "OK"
}

pub async fn sign_up(
  State(app): State<Arc<AppState>>,
  Payload(credentials): Payload<Credentials>,
) -> Result<(StatusCode, Json<SignedUp>)> {
  let signed = app.sv().identity.sign_up(credentials).await?;
  Ok((StatusCode::CREATED, Json(signed)))
}

pub async fn sign_in(
  State(app): State<Arc<AppState>>,
  Payload(credentials): Payload<Credentials>,
) -> Result<Json<json::Value>> {
  Ok(Json(app.sv().identity.sign_in(credentials).await?))
}

pub async fn update_auth(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(update): Payload<CredentialsUpdate>,
) -> Result<Json<json::Value>> {
  let account = app.sv().identity.update_credentials(&caller.token, update).await?;
  Ok(Json(account))
}

pub async fn register_profile(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(profile): Payload<ProfileUpdate>,
) -> Result<Json<user::Model>> {
  Ok(Json(app.sv().user.register(caller.id, profile).await?))
}

pub async fn update_profile(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(update): Payload<ProfileUpdate>,
) -> Result<Json<user::Model>> {
  Ok(Json(app.sv().user.update_profile(caller.id, update).await?))
}

pub async fn me(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
) -> Result<Json<user::Model>> {
  Ok(Json(app.sv().user.get(caller.id).await?))
}

pub async fn my_skills(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
) -> Result<Json<Vec<SkillProgress>>> {
  Ok(Json(app.sv().user.skills(caller.id).await?))
}

pub async fn skills(
  State(app): State<Arc<AppState>>,
  _caller: AuthUser,
) -> Result<Json<Vec<skill::Model>>> {
  Ok(Json(app.sv().skill.all().await?))
}

pub async fn create_skill(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(new): Payload<NewSkill>,
) -> Result<(StatusCode, Json<skill::Model>)> {
  let sv = app.sv();
  sv.user.authorize(caller.id, Permission::ManageCatalog).await?;

  Ok((StatusCode::CREATED, Json(sv.skill.create(new).await?)))
}
