//! Handlers for `/requests` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/requests` | Requests addressed to the actor, newest first |
//! | `POST` | `/requests/:id/accept` | Deletes the request and records the friendship |
//! | `POST` | `/requests/:id/ignore` | Deletes the request |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, State},
};
use meet_core::{
  id::RequestId,
  request::{Decision, IncomingRequest, Resolution},
  store::MeetStore,
  user::Actor,
};

use crate::error::ApiError;

/// `GET /requests`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<IncomingRequest>>, ApiError>
where
  S: MeetStore,
{
  let requests = store
    .incoming_requests(actor.id())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(requests))
}

/// `POST /requests/:id/accept`
pub async fn accept<S>(
  state: State<Arc<S>>,
  actor: Extension<Actor>,
  Path(id): Path<RequestId>,
) -> Result<Json<Resolution>, ApiError>
where
  S: MeetStore,
{
  resolve(state, actor, id, Decision::Accept).await
}

/// `POST /requests/:id/ignore`
pub async fn ignore<S>(
  state: State<Arc<S>>,
  actor: Extension<Actor>,
  Path(id): Path<RequestId>,
) -> Result<Json<Resolution>, ApiError>
where
  S: MeetStore,
{
  resolve(state, actor, id, Decision::Ignore).await
}

async fn resolve<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
  id: RequestId,
  decision: Decision,
) -> Result<Json<Resolution>, ApiError>
where
  S: MeetStore,
{
  let resolution = store
    .resolve_request(actor.id(), id, decision)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(resolution))
}
