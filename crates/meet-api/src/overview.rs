//! Handlers for `/overview` and `/friends`.

use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use meet_core::{friendship::Friend, store::MeetStore, summary::Summary, user::Actor};

use crate::error::ApiError;

/// `GET /overview`: counts shown on the home page.
pub async fn summary<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
) -> Result<Json<Summary>, ApiError>
where
  S: MeetStore,
{
  let summary = store
    .summary(actor.id())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(summary))
}

/// `GET /friends`
pub async fn friends<S>(
  State(store): State<Arc<S>>,
  Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Friend>>, ApiError>
where
  S: MeetStore,
{
  let friends = store
    .friends(actor.id())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(friends))
}
