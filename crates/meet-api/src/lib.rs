//! JSON REST API for Birthday Meet.
//!
//! Exposes an axum [`Router`] backed by any [`meet_core::store::MeetStore`].
//! Every handler reads the acting user from a [`meet_core::user::Actor`]
//! request extension. Authenticating the request and inserting that extension
//! is the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", meet_api::api_router(store.clone()).layer(identity_gate))
//! ```

pub mod error;
pub mod explore;
pub mod messages;
pub mod overview;
pub mod requests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use meet_core::store::MeetStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MeetStore + 'static,
{
  Router::new()
    .route("/overview", get(overview::summary::<S>))
    .route("/friends", get(overview::friends::<S>))
    // Matching
    .route("/explore", get(explore::list::<S>).post(explore::send_request::<S>))
    // Requests
    .route("/requests", get(requests::list::<S>))
    .route("/requests/{id}/accept", post(requests::accept::<S>))
    .route("/requests/{id}/ignore", post(requests::ignore::<S>))
    // Messages
    .route("/messages", get(messages::inbox::<S>).post(messages::send::<S>))
    .route("/messages/sent", get(messages::sent::<S>))
    .route("/messages/{id}/read", post(messages::mark_read::<S>))
    .with_state(store)
}
