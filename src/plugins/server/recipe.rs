use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};

use super::Payload;
use crate::{
  auth::{AuthUser, Permission},
  entity::{recipe, recipe_step, step_photo},
  prelude::*,
  state::AppState,
  sv::recipe::{Card, ChallengeDetail, NewRecipe, StepPhoto},
};

pub async fn all(
  State(app): State<Arc<AppState>>,
  _caller: AuthUser,
) -> Result<Json<Vec<recipe::Model>>> {
  Ok(Json(app.sv().recipe.all().await?))
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(new): Payload<NewRecipe>,
) -> Result<(StatusCode, Json<recipe::Model>)> {
  let sv = app.sv();
  sv.user.authorize(caller.id, Permission::ManageCatalog).await?;

  Ok((StatusCode::CREATED, Json(sv.recipe.create(new).await?)))
}

pub async fn by_id(
  State(app): State<Arc<AppState>>,
  _caller: AuthUser,
  Path(recipe_id): Path<Uuid>,
) -> Result<Json<recipe::Model>> {
  Ok(Json(app.sv().recipe.by_id(recipe_id).await?))
}

pub async fn steps(
  State(app): State<Arc<AppState>>,
  _caller: AuthUser,
  Path(recipe_id): Path<Uuid>,
) -> Result<Json<Vec<recipe_step::Model>>> {
  let sv = app.sv();
  sv.recipe.by_id(recipe_id).await?;
  Ok(Json(sv.recipe.steps(recipe_id).await?))
}

pub async fn recommended(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
) -> Result<Json<Vec<Card>>> {
  let count = app.config.recommendations;
  Ok(Json(app.sv().recipe.recommended(caller.id, count).await?))
}

pub async fn challenges(
  State(app): State<Arc<AppState>>,
  _caller: AuthUser,
  Path(skill_id): Path<Uuid>,
) -> Result<Json<Vec<Card>>> {
  Ok(Json(app.sv().recipe.challenges(skill_id).await?))
}

pub async fn challenge_detail(
  State(app): State<Arc<AppState>>,
  _caller: AuthUser,
  Path(recipe_id): Path<Uuid>,
) -> Result<Json<ChallengeDetail>> {
  Ok(Json(app.sv().recipe.challenge_detail(recipe_id).await?))
}

pub async fn save_step_photo(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(photo): Payload<StepPhoto>,
) -> Result<(StatusCode, Json<step_photo::Model>)> {
  let photo = app.sv().recipe.save_step_photo(caller.id, photo).await?;
  Ok((StatusCode::CREATED, Json(photo)))
}
