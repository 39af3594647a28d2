//! Handlers for `/explore`: finding people who share your birthday.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/explore` | Potential friends, sorted by username |
//! | `POST` | `/explore` | Body: [`SendRequestBody`]; 201 + request, or 200 if a friendship formed |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use meet_core::{
  id::UserId,
  matching::PotentialFriend,
  request::SendOutcome,
  store::MeetStore,
  user::Actor,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /explore`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<PotentialFriend>>, ApiError>
where
  S: MeetStore,
{
  let found = store
    .potential_friends(actor.id())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(found))
}

// ─── Send request ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendRequestBody {
  pub receiver_id: UserId,
  /// Blank or missing uses the default greeting.
  #[serde(default)]
  pub message:     Option<String>,
}

/// `POST /explore`: body: `{"receiver_id":2,"message":"..."}`
pub async fn send_request<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
  Json(body): Json<SendRequestBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MeetStore,
{
  let outcome = store
    .send_request(actor.id(), body.receiver_id, body.message)
    .await
    .map_err(ApiError::from_store)?;

  let status = match outcome {
    SendOutcome::RequestCreated { .. } => StatusCode::CREATED,
    SendOutcome::FriendshipFormed { .. } => StatusCode::OK,
  };
  Ok((status, Json(outcome)))
}
