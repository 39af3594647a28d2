//! Accounts and the identity gate.
//!
//! `/register` and `/login` are open. Everything under `/api` passes through
//! [`require_actor`], which checks HTTP Basic credentials against the users
//! table and hands the resolved [`Actor`] to the handlers.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{Request, State},
  http::{HeaderMap, StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use meet_api::ApiError;
use meet_core::{
  registration::RegistrationForm,
  store::MeetStore,
  user::{Actor, NewUser, User},
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::{
  AppState,
  error::{Error, Result},
};

type CoreError = meet_core::Error;

// ─── Passwords ────────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

/// `true` if `password` matches the PHC string. A malformed hash never matches.
pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .and_then(|hash| Argon2::default().verify_password(password.as_bytes(), &hash))
    .is_ok()
}

/// Resolve a username and password to an actor.
///
/// `Ok(None)` covers every way the pair can be wrong; callers must not tell
/// the user which part failed.
pub async fn authenticate<S>(
  store:    &S,
  username: &str,
  password: &str,
) -> Result<Option<Actor>>
where
  S: MeetStore,
{
  let username = username.trim();
  if username.is_empty() || password.is_empty() {
    return Ok(None);
  }

  let Some(credentials) = store
    .find_credentials(username)
    .await
    .map_err(ApiError::from_store)?
  else {
    return Ok(None);
  };

  if !verify_password(password, &credentials.password_hash) {
    return Ok(None);
  }
  Ok(Some(Actor(credentials.user)))
}

// ─── Identity gate ────────────────────────────────────────────────────────────

/// Pull `username:password` out of a `Basic` authorization header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let encoded = value.strip_prefix("Basic ")?;
  let decoded = B64.decode(encoded).ok()?;
  let creds = String::from_utf8(decoded).ok()?;
  let (username, password) = creds.split_once(':')?;
  Some((username.to_owned(), password.to_owned()))
}

/// Middleware: reject the request with 401 unless it carries valid
/// credentials, otherwise insert the [`Actor`] extension.
pub async fn require_actor<S>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Result<Response>
where
  S: MeetStore + Clone + 'static,
{
  let (username, password) = basic_credentials(req.headers()).ok_or(Error::Unauthorized)?;

  let actor = authenticate(&*state.store, &username, &password)
    .await?
    .ok_or(Error::Unauthorized)?;

  req.extensions_mut().insert(actor);
  Ok(next.run(req).await)
}

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /register`: returns 201 + the new user.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(form): Json<RegistrationForm>,
) -> Result<impl IntoResponse>
where
  S: MeetStore + Clone + 'static,
{
  let username = form.username().map_err(CoreError::from)?;
  let taken = state
    .store
    .find_credentials(username)
    .await
    .map_err(ApiError::from_store)?
    .is_some();
  if taken {
    return Err(CoreError::DuplicateUsername(username.to_owned()).into());
  }

  let valid = form.validate().map_err(CoreError::from)?;
  let password_hash = hash_password(&valid.password)?;

  let user = state
    .store
    .register_user(NewUser {
      username: valid.username,
      password_hash,
      birthday: valid.birthday,
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(user_id = %user.id, "user registered");
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
  pub username: String,
  pub password: String,
}

/// `POST /login`: returns the user if the credentials are good.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(form): Json<LoginForm>,
) -> Result<Json<User>>
where
  S: MeetStore + Clone + 'static,
{
  let actor = authenticate(&*state.store, &form.username, &form.password)
    .await?
    .ok_or(CoreError::InvalidCredentials)?;
  Ok(Json(actor.0))
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("correct horse").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("correct horse", &hash));
    assert!(!verify_password("wrong horse", &hash));
  }

  #[test]
  fn malformed_hash_never_matches() {
    assert!(!verify_password("anything", "not-a-phc-string"));
  }

  #[test]
  fn parses_basic_header() {
    let creds = basic_credentials(&headers(&basic("alice", "pa:ss")));
    assert_eq!(creds, Some(("alice".to_string(), "pa:ss".to_string())));
  }

  #[test]
  fn missing_header() {
    assert_eq!(basic_credentials(&HeaderMap::new()), None);
  }

  #[test]
  fn invalid_base64() {
    assert_eq!(basic_credentials(&headers("Basic !!!not-base64!!!")), None);
  }

  #[test]
  fn wrong_scheme() {
    let bearer = basic("alice", "secret").replace("Basic", "Bearer");
    assert_eq!(basic_credentials(&headers(&bearer)), None);
  }
}
