use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use serde::Deserialize;

use super::Payload;
use crate::{
  auth::AuthUser,
  entity::{submission, submission_step_image},
  prelude::*,
  state::AppState,
  sv::submission::{Detail, SubmissionPhoto},
};

#[derive(Debug, Deserialize)]
pub struct StartReq {
  pub recipe_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CompleteReq {
  pub submission_id: Uuid,
}

pub async fn start(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(req): Payload<StartReq>,
) -> Result<(StatusCode, Json<submission::Model>)> {
  let submission = app.sv().submission.start(caller.id, req.recipe_id).await?;
  Ok((StatusCode::CREATED, Json(submission)))
}

pub async fn save_step_photo(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(photo): Payload<SubmissionPhoto>,
) -> Result<(StatusCode, Json<submission_step_image::Model>)> {
  let image = app.sv().submission.save_step_photo(caller.id, photo).await?;
  Ok((StatusCode::CREATED, Json(image)))
}

pub async fn complete(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(req): Payload<CompleteReq>,
) -> Result<Json<json::Value>> {
  let completion = app.sv().submission.complete(caller.id, req.submission_id).await?;
  Ok(Json(json::json!({ "success": true, "message": completion.message() })))
}

pub async fn detail(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Path(submission_id): Path<Uuid>,
) -> Result<Json<Detail>> {
  Ok(Json(app.sv().submission.detail(caller.id, submission_id).await?))
}
