use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use super::Payload;
use crate::{
  auth::AuthUser,
  entity::{evaluation, skill_evaluation},
  prelude::*,
  state::AppState,
  sv::evaluation::{NewEvaluation, NewSkillEvaluation, Outcome},
};

#[derive(Debug, Deserialize)]
pub struct ProcessReq {
  #[serde(rename = "submissionId", alias = "submission_id")]
  pub submission_id: Option<String>,
}

pub async fn process(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(req): Payload<ProcessReq>,
) -> Result<Json<Outcome>> {
  let outcome =
    app.sv().evaluation.process(caller.id, req.submission_id.as_deref()).await?;
  Ok(Json(outcome))
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(new): Payload<NewEvaluation>,
) -> Result<(StatusCode, Json<evaluation::Model>)> {
  let evaluation =
    app.sv().evaluation.create_submission_evaluation(caller.id, new).await?;
  Ok((StatusCode::CREATED, Json(evaluation)))
}

pub async fn create_skill(
  State(app): State<Arc<AppState>>,
  caller: AuthUser,
  Payload(new): Payload<NewSkillEvaluation>,
) -> Result<(StatusCode, Json<skill_evaluation::Model>)> {
  let verdict = app.sv().evaluation.create_skill_evaluation(caller.id, new).await?;
  Ok((StatusCode::CREATED, Json(verdict)))
}
