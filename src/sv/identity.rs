//! Accounts live at an external identity provider (GoTrue-style REST api).
//! This service only forwards credentials and mirrors new accounts into
//! `users`.

use axum::http::StatusCode;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::{
  entity::user,
  prelude::*,
  state::IdpConfig,
  sv::{self, user::ProfileUpdate},
};

#[derive(Debug, Deserialize, Serialize)]
pub struct Credentials {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CredentialsUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignedUp {
  pub id: Uuid,
  pub email: Option<String>,
  pub profile: user::Model,
}

/// Best human-readable message of a provider error body.
pub fn provider_message(body: &json::Value) -> Option<String> {
  ["msg", "message", "error_description", "error"]
    .iter()
    .find_map(|key| body.get(key)?.as_str())
    .map(str::to_string)
}

fn require(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::bad_request(format!("{field} is required")));
  }
  Ok(())
}

pub struct Identity<'a> {
  db: &'a DatabaseConnection,
  http: &'a Client,
  idp: &'a IdpConfig,
}

impl<'a> Identity<'a> {
  pub fn new(
    db: &'a DatabaseConnection,
    http: &'a Client,
    idp: &'a IdpConfig,
  ) -> Self {
    Self { db, http, idp }
  }

  fn url(&self, path: &str) -> String {
    format!("{}/auth/v1/{path}", self.idp.url)
  }

  async fn call(&self, request: RequestBuilder) -> Result<json::Value> {
    let res = request
      .header("apikey", &self.idp.anon_key)
      .send()
      .await
      .map_err(|err| {
        error!("Identity provider unreachable: {err}");
        Error::Identity {
          status: StatusCode::BAD_GATEWAY,
          message: "Identity provider unreachable".into(),
        }
      })?;

    let status = res.status();
    let body = res.json::<json::Value>().await.unwrap_or_default();

    if status.is_success() {
      return Ok(body);
    }

    let message = provider_message(&body)
      .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
    warn!("Identity provider answered {status}: {message}");

    let status =
      if status.is_client_error() { status } else { StatusCode::BAD_GATEWAY };
    Err(Error::Identity { status, message })
  }

  /// Creates the account at the provider, then its local profile.
  pub async fn sign_up(&self, credentials: Credentials) -> Result<SignedUp> {
    require("email", &credentials.email)?;
    require("password", &credentials.password)?;

    let body =
      self.call(self.http.post(self.url("signup")).json(&credentials)).await?;

    // confirmed sign-ups nest the account under `user`, pending ones don't
    let account = body.get("user").filter(|u| u.is_object()).unwrap_or(&body);
    let id = account
      .get("id")
      .and_then(|id| id.as_str())
      .and_then(|id| Uuid::parse_str(id).ok())
      .ok_or_else(|| Error::Identity {
        status: StatusCode::BAD_GATEWAY,
        message: "Identity provider returned no user id".into(),
      })?;
    let email = account.get("email").and_then(|e| e.as_str()).map(str::to_string);

    let profile = sv::User::new(self.db).register(id, ProfileUpdate::default()).await?;
    Ok(SignedUp { id, email, profile })
  }

  /// Password grant; returns the provider session as is.
  pub async fn sign_in(&self, credentials: Credentials) -> Result<json::Value> {
    require("email", &credentials.email)?;
    require("password", &credentials.password)?;

    self
      .call(self.http.post(self.url("token?grant_type=password")).json(&credentials))
      .await
  }

  /// Changes email and/or password of the account `token` belongs to.
  pub async fn update_credentials(
    &self,
    token: &str,
    update: CredentialsUpdate,
  ) -> Result<json::Value> {
    if update.email.is_none() && update.password.is_none() {
      return Err(Error::bad_request("Nothing to update: pass email or password"));
    }

    self
      .call(self.http.put(self.url("user")).bearer_auth(token).json(&update))
      .await
  }
}

#[cfg(test)]
mod tests {
  use axum::{
    Json, Router,
    http::HeaderMap,
    routing::{post, put},
  };

  use super::*;
  use crate::testing;

  const ANON: &str = "anon-key";
  const PASSWORD: &str = "hunter22";

  fn keyed(headers: &HeaderMap) -> bool {
    headers.get("apikey").is_some_and(|key| key == ANON)
  }

  /// Minimal provider answering the three calls the service makes.
  async fn fake_idp() -> IdpConfig {
    let router = Router::new()
      .route(
        "/auth/v1/signup",
        post(|headers: HeaderMap, Json(body): Json<json::Value>| async move {
          if !keyed(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json::json!({ "message": "No API key" })));
          }
          if body["email"] == "taken@example.com" {
            let err = json::json!({ "msg": "User already registered" });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(err));
          }
          let user = json::json!({ "id": Uuid::new_v4(), "email": body["email"] });
          (StatusCode::OK, Json(json::json!({ "user": user })))
        }),
      )
      .route(
        "/auth/v1/token",
        post(|Json(body): Json<json::Value>| async move {
          if body["password"] != PASSWORD {
            let err = json::json!({ "error_description": "Invalid login credentials" });
            return (StatusCode::BAD_REQUEST, Json(err));
          }
          (StatusCode::OK, Json(json::json!({ "access_token": "t0k3n" })))
        }),
      )
      .route(
        "/auth/v1/user",
        put(|headers: HeaderMap, Json(body): Json<json::Value>| async move {
          match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer t0k3n") => (StatusCode::OK, Json(body)),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, Json(json::json!({}))),
          }
        }),
      );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    IdpConfig { url: format!("http://{addr}"), anon_key: ANON.into() }
  }

  fn creds(email: &str, password: &str) -> Credentials {
    Credentials { email: email.into(), password: password.into() }
  }

  #[test]
  fn test_provider_message_priority() {
    let body = json::json!({ "error": "invalid_grant", "error_description": "Bad password" });
    assert_eq!(provider_message(&body).as_deref(), Some("Bad password"));
    assert_eq!(provider_message(&json::json!({ "code": 500 })), None);
  }

  #[tokio::test]
  async fn test_sign_up_creates_profile() {
    let db = testing::setup_db().await;
    let idp = fake_idp().await;
    let http = Client::new();
    let sv = Identity::new(&db, &http, &idp);

    let signed = sv.sign_up(creds("cook@example.com", PASSWORD)).await.unwrap();
    assert_eq!(signed.email.as_deref(), Some("cook@example.com"));
    assert_eq!(signed.profile.user_id, signed.id);
    assert_eq!(signed.profile.rank, 1);

    let res = sv.sign_up(creds("taken@example.com", PASSWORD)).await;
    match res {
      Err(Error::Identity { status, message }) => {
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message, "User already registered");
      }
      other => panic!("unexpected {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_sign_in_forwards_session() {
    let db = testing::setup_db().await;
    let idp = fake_idp().await;
    let http = Client::new();
    let sv = Identity::new(&db, &http, &idp);

    let session = sv.sign_in(creds("cook@example.com", PASSWORD)).await.unwrap();
    assert_eq!(session["access_token"], "t0k3n");

    assert!(matches!(
      sv.sign_in(creds("cook@example.com", "nope")).await,
      Err(Error::Identity { status: StatusCode::BAD_REQUEST, .. })
    ));
    assert!(matches!(sv.sign_in(creds("", PASSWORD)).await, Err(Error::BadRequest(_))));
  }

  #[tokio::test]
  async fn test_update_credentials() {
    let db = testing::setup_db().await;
    let idp = fake_idp().await;
    let http = Client::new();
    let sv = Identity::new(&db, &http, &idp);

    assert!(matches!(
      sv.update_credentials("t0k3n", CredentialsUpdate::default()).await,
      Err(Error::BadRequest(_))
    ));

    let update =
      CredentialsUpdate { email: Some("new@example.com".into()), password: None };
    let res = sv.update_credentials("t0k3n", update).await.unwrap();
    assert_eq!(res, json::json!({ "email": "new@example.com" }));

    let update = CredentialsUpdate { email: None, password: Some("x".into()) };
    assert!(matches!(
      sv.update_credentials("stale", update).await,
      Err(Error::Identity { status: StatusCode::BAD_GATEWAY, .. })
    ));
  }
}
