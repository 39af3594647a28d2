//! Handlers for `/messages` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/messages` | Inbox, newest first |
//! | `POST` | `/messages` | Body: `{"receiver_id":2,"text":"..."}`; receiver must be a friend |
//! | `GET`  | `/messages/sent` | Sent messages, newest first |
//! | `POST` | `/messages/:id/read` | 204; 409 if it was already read |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use meet_core::{
  id::{MessageId, UserId},
  message::{ReceivedMessage, SentMessage},
  store::MeetStore,
  user::Actor,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Inbox ────────────────────────────────────────────────────────────────────

/// `GET /messages`
pub async fn inbox<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ReceivedMessage>>, ApiError>
where
  S: MeetStore,
{
  let messages = store
    .messages(actor.id())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(messages))
}

/// `GET /messages/sent`
pub async fn sent<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<SentMessage>>, ApiError>
where
  S: MeetStore,
{
  let messages = store
    .sent_messages(actor.id())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(messages))
}

// ─── Send ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
  pub receiver_id: UserId,
  pub text:        String,
}

/// `POST /messages`: returns 201 + the stored message.
pub async fn send<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
  Json(body): Json<SendMessageBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MeetStore,
{
  let message = store
    .send_message(actor.id(), body.receiver_id, body.text)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(message)))
}

// ─── Mark read ────────────────────────────────────────────────────────────────

/// `POST /messages/:id/read`
pub async fn mark_read<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
  Path(id): Path<MessageId>,
) -> Result<StatusCode, ApiError>
where
  S: MeetStore,
{
  store
    .mark_read(actor.id(), id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
