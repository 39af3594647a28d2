//! HTTP server for Birthday Meet.
//!
//! Mounts the JSON API from `meet-api` under `/api` behind the identity gate,
//! alongside the open `/register` and `/login` endpoints.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, header},
  middleware,
  response::Response,
  routing::post,
};
use meet_core::store::MeetStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `MEET_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       5000,
      store_path: PathBuf::from("birthday-meet.db"),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: MeetStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: MeetStore + Clone + 'static,
{
  let api = meet_api::api_router(state.store.clone()).layer(
    middleware::from_fn_with_state(state.clone(), auth::require_actor::<S>),
  );

  Router::new()
    .route("/register", post(auth::register::<S>))
    .route("/login",    post(auth::login::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(middleware::map_response(no_cache))
    .layer(TraceLayer::new_for_http())
}

/// Responses are per-user and change with every action; never cache them.
async fn no_cache(mut res: Response) -> Response {
  let headers = res.headers_mut();
  headers.insert(
    header::CACHE_CONTROL,
    HeaderValue::from_static("no-cache, no-store, must-revalidate"),
  );
  headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
  headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
  res
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use meet_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  const PASSWORD: &str = "correct horse";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig {
        store_path: PathBuf::from(":memory:"),
        ..ServerConfig::default()
      }),
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn send(
    state:  &AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    auth:   Option<&str>,
    body:   Option<Value>,
  ) -> (StatusCode, Response) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = auth {
      builder = builder.header(header::AUTHORIZATION, auth_header(user, PASSWORD));
    }
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let resp = router(state.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    (resp.status(), resp)
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn call(
    state:  &AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    auth:   Option<&str>,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let (status, resp) = send(state, method, uri, auth, body).await;
    (status, json_body(resp).await)
  }

  async fn register(state: &AppState<SqliteStore>, name: &str, month: &str, day: &str) -> i64 {
    let (status, user) = call(
      state,
      "POST",
      "/register",
      None,
      Some(json!({
        "username": name,
        "password": PASSWORD,
        "confirm":  PASSWORD,
        "month":    month,
        "day":      day,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{user}");
    user["id"].as_i64().unwrap()
  }

  // ── Registration ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_returns_created_user() {
    let state = make_state().await;
    let (status, user) = call(
      &state,
      "POST",
      "/register",
      None,
      Some(json!({
        "username": "  alice ",
        "password": PASSWORD,
        "confirm":  PASSWORD,
        "month":    "5",
        "day":      "10",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["username"], "alice");
    assert_eq!(user["birthday"], json!({ "month": 5, "day": 10 }));
    assert!(user.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn register_rejects_duplicate_username() {
    let state = make_state().await;
    register(&state, "alice", "5", "10").await;

    // Duplicate wins over the later password problem.
    let (status, body) = call(
      &state,
      "POST",
      "/register",
      None,
      Some(json!({ "username": "alice", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["field"], "username");
    assert_eq!(body["error"], "Username already taken");
  }

  #[tokio::test]
  async fn register_reports_first_bad_field() {
    let state = make_state().await;
    let cases = [
      (json!({ "username": " ", "password": PASSWORD }), "username"),
      (json!({ "username": "bob", "password": "short", "confirm": "short" }), "password"),
      (
        json!({ "username": "bob", "password": PASSWORD, "confirm": "different!" }),
        "confirm",
      ),
      (
        json!({
          "username": "bob",
          "password": PASSWORD,
          "confirm":  PASSWORD,
          "month":    "2",
          "day":      "30",
        }),
        "birthday",
      ),
    ];
    for (form, field) in cases {
      let (status, body) = call(&state, "POST", "/register", None, Some(form)).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
      assert_eq!(body["field"], field);
    }
  }

  // ── Login and the gate ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_checks_password() {
    let state = make_state().await;
    register(&state, "alice", "5", "10").await;

    let (status, user) = call(
      &state,
      "POST",
      "/login",
      None,
      Some(json!({ "username": "alice", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "alice");

    for (username, password) in [("alice", "wrong password"), ("nobody", PASSWORD), ("", "")] {
      let (status, body) = call(
        &state,
        "POST",
        "/login",
        None,
        Some(json!({ "username": username, "password": password })),
      )
      .await;
      assert_eq!(status, StatusCode::UNAUTHORIZED);
      assert_eq!(body["error"], "Incorrect username or password");
    }
  }

  #[tokio::test]
  async fn api_requires_credentials() {
    let state = make_state().await;
    register(&state, "alice", "5", "10").await;

    let (status, resp) = send(&state, "GET", "/api/overview", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let resp = router(state.clone())
      .oneshot(
        Request::builder()
          .uri("/api/overview")
          .header(header::AUTHORIZATION, auth_header("alice", "wrong password"))
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn responses_are_not_cached() {
    let state = make_state().await;
    let (_, resp) = send(&state, "GET", "/api/overview", None, None).await;
    let headers = resp.headers();
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache, no-store, must-revalidate");
    assert_eq!(headers[header::EXPIRES], "0");
    assert_eq!(headers[header::PRAGMA], "no-cache");
  }

  // ── Full flows ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn request_accept_then_message() {
    let state = make_state().await;
    let alice = register(&state, "alice", "5", "10").await;
    let bob = register(&state, "bob", "5", "10").await;
    register(&state, "carol", "6", "10").await;

    let (status, found) = call(&state, "GET", "/api/explore", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([{ "user_id": bob, "username": "bob" }]));

    let (status, outcome) = call(
      &state,
      "POST",
      "/api/explore",
      Some("alice"),
      Some(json!({ "receiver_id": bob, "message": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(outcome["outcome"], "request_created");
    assert_eq!(
      outcome["request"]["text"],
      meet_core::request::DEFAULT_REQUEST_MESSAGE
    );

    let (_, requests) = call(&state, "GET", "/api/requests", Some("bob"), None).await;
    let requests = requests.as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["sender_username"], "alice");
    let request_id = requests[0]["request"]["request_id"].as_i64().unwrap();

    let (status, resolution) = call(
      &state,
      "POST",
      &format!("/api/requests/{request_id}/accept"),
      Some("bob"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolution, json!({ "outcome": "accepted", "friend_id": alice }));

    // Resubmitting the same decision finds nothing.
    let (status, _) = call(
      &state,
      "POST",
      &format!("/api/requests/{request_id}/accept"),
      Some("bob"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, friends) = call(&state, "GET", "/api/friends", Some("alice"), None).await;
    assert_eq!(friends, json!([{ "user_id": bob, "username": "bob" }]));
    let (_, found) = call(&state, "GET", "/api/explore", Some("alice"), None).await;
    assert_eq!(found, json!([]));

    let (status, message) = call(
      &state,
      "POST",
      "/api/messages",
      Some("alice"),
      Some(json!({ "receiver_id": bob, "text": "happy birthday!" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message["is_read"], false);
    let message_id = message["message_id"].as_i64().unwrap();

    let (_, overview) = call(&state, "GET", "/api/overview", Some("bob"), None).await;
    assert_eq!(overview["unread_message_count"], 1);
    assert_eq!(overview["pending_request_count"], 0);
    assert_eq!(overview["birth_month_name"], "May");

    let read_uri = format!("/api/messages/{message_id}/read");
    let (status, _) = send(&state, "POST", &read_uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = call(&state, "POST", &read_uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["field"], "message_id");

    let (_, inbox) = call(&state, "GET", "/api/messages", Some("bob"), None).await;
    assert_eq!(inbox[0]["sender_username"], "alice");
    assert_eq!(inbox[0]["message"]["is_read"], true);

    let (_, sent) = call(&state, "GET", "/api/messages/sent", Some("alice"), None).await;
    assert_eq!(sent[0]["receiver_username"], "bob");
  }

  #[tokio::test]
  async fn mutual_request_forms_friendship() {
    let state = make_state().await;
    let alice = register(&state, "alice", "1", "1").await;
    let bob = register(&state, "bob", "1", "1").await;

    let (status, _) = call(
      &state,
      "POST",
      "/api/explore",
      Some("alice"),
      Some(json!({ "receiver_id": bob })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, outcome) = call(
      &state,
      "POST",
      "/api/explore",
      Some("bob"),
      Some(json!({ "receiver_id": alice, "message": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "outcome": "friendship_formed", "friend_id": alice }));

    let (_, requests) = call(&state, "GET", "/api/requests", Some("bob"), None).await;
    assert_eq!(requests, json!([]));
  }

  #[tokio::test]
  async fn rejected_actions_map_to_client_errors() {
    let state = make_state().await;
    let alice = register(&state, "alice", "1", "1").await;
    let carol = register(&state, "carol", "2", "2").await;

    let (status, body) = call(
      &state,
      "POST",
      "/api/explore",
      Some("alice"),
      Some(json!({ "receiver_id": alice })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "receiver_id");

    let (status, _) = call(
      &state,
      "POST",
      "/api/explore",
      Some("alice"),
      Some(json!({ "receiver_id": carol })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
      &state,
      "POST",
      "/api/messages",
      Some("alice"),
      Some(json!({ "receiver_id": carol, "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&state, "POST", "/api/requests/99/ignore", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&state, "POST", "/api/messages/99/read", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
