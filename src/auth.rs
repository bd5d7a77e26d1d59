//! Bearer token verification and role permissions
//!
//! Tokens are issued by the identity provider and only verified here. The
//! role carried in a token is ignored; authorization always reads
//! `users.role`.

use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{entity::Role, prelude::*, state::AppState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub: Uuid,
  pub exp: i64,
  #[serde(default)]
  pub iat: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

pub fn verify(token: &str, secret: &str) -> Result<Claims> {
  let mut validation = Validation::new(Algorithm::HS256);
  validation.validate_aud = false;

  decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
    .map(|data| data.claims)
    .map_err(|err| {
      debug!("Rejected token: {err}");
      Error::Unauthorized("Invalid or expired token")
    })
}

/// Authenticated caller, extracted from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
  pub id: Uuid,
  /// raw token, forwarded when acting on the caller's identity account
  pub token: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    app: &Arc<AppState>,
  ) -> Result<Self, Self::Rejection> {
    let header = parts
      .headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(Error::Unauthorized("No token provided"))?;

    let token = header
      .strip_prefix("Bearer ")
      .ok_or(Error::Unauthorized("Expected: Bearer <token>"))?;

    let claims = verify(token, &app.config.jwt_secret)?;

    Ok(Self { id: claims.sub, token: token.to_string() })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
  /// issue submission and skill verdicts, run the evaluation pipeline
  Evaluate,
  /// create skills and recipes
  ManageCatalog,
  /// read submissions of other users
  ReviewSubmissions,
}

impl Role {
  pub fn allows(self, permission: Permission) -> bool {
    match permission {
      Permission::Evaluate | Permission::ReviewSubmissions => {
        matches!(self, Role::Admin | Role::Evaluator)
      }
      Permission::ManageCatalog => self == Role::Admin,
    }
  }
}

#[cfg(test)]
pub(crate) fn issue(user: Uuid, secret: &str) -> String {
  use jsonwebtoken::{EncodingKey, Header, encode};

  let now = Utc::now().timestamp();
  let claims = Claims { sub: user, exp: now + 600, iat: now, email: None };
  encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
    .unwrap()
}
