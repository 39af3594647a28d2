//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use meet_api::ApiError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error(transparent)]
  Api(#[from] ApiError),
  #[error("password hashing failed: {0}")]
  Hash(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<meet_core::Error> for Error {
  fn from(e: meet_core::Error) -> Self { Error::Api(e.into()) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "Login required", "field": null })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"birthday-meet\""),
        );
        res
      }
      Error::Api(e) => e.into_response(),
      Error::Hash(msg) => {
        tracing::error!(error = %msg, "password hashing failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal error", "field": null })),
        )
          .into_response()
      }
    }
  }
}
