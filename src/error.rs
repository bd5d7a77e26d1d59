//! Error types for the cookrank server

use std::fmt;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] DbErr),

  #[error("Bad request: {0}")]
  BadRequest(String),

  #[error("Unauthorized: {0}")]
  Unauthorized(&'static str),

  #[error("Forbidden: {0}")]
  Forbidden(&'static str),

  #[error("{0} not found")]
  NotFound(Missing),

  /// A store call of the evaluation pipeline failed; earlier writes stay.
  #[error("Failed to {step}: {source}")]
  Persistence {
    step: Step,
    #[source]
    source: DbErr,
  },

  #[error("Identity provider error ({status}): {message}")]
  Identity { status: StatusCode, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
  User,
  Skill,
  Recipe,
  Submission,
  Evaluations,
}

impl fmt::Display for Missing {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Missing::User => "User",
      Missing::Skill => "Skill",
      Missing::Recipe => "Recipe",
      Missing::Submission => "Submission",
      Missing::Evaluations => "Skill evaluations",
    })
  }
}

/// Store-touching steps of the submission evaluation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  LoadEvaluations,
  UpdateSkill(Uuid),
  ReloadLevels,
  PersistRank,
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::LoadEvaluations => f.write_str("load skill evaluations"),
      Step::UpdateSkill(skill) => write!(f, "update progress of skill {skill}"),
      Step::ReloadLevels => f.write_str("reload skill levels"),
      Step::PersistRank => f.write_str("persist user rank"),
    }
  }
}

impl Error {
  /// Tags a store failure with the pipeline step it happened in.
  pub fn during(self, step: Step) -> Self {
    match self {
      Error::Database(source) => Error::Persistence { step, source },
      other => other,
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Error::BadRequest(message.into())
  }

  fn status(&self) -> StatusCode {
    match self {
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      Error::Forbidden(_) => StatusCode::FORBIDDEN,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::Identity { status, .. } => *status,
      Error::Database(_) | Error::Persistence { .. } => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      Error::Database(err) => {
        tracing::error!("Database error: {err}");
        "Database error".to_string()
      }
      Error::Persistence { step, source } => {
        tracing::error!("Failed to {step}: {source}");
        format!("Failed to {step}")
      }
      Error::BadRequest(msg) => msg.clone(),
      Error::Identity { message, .. } => message.clone(),
      Error::Unauthorized(msg) | Error::Forbidden(msg) => msg.to_string(),
      Error::NotFound(what) => format!("{what} not found"),
    };

    let body = json::json!({
      "success": false,
      "error": message
    });

    (status, axum::Json(body)).into_response()
  }
}

impl From<JsonRejection> for Error {
  fn from(rejection: JsonRejection) -> Self {
    Error::BadRequest(rejection.body_text())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
