//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Domain errors become a 4xx response whose body names the form field the
//! message belongs to, so the client can show it inline. Anything else from
//! the store is a 500.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use meet_core::store::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{message}")]
  Rejected {
    status:  StatusCode,
    message: String,
    field:   Option<&'static str>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store error as a user-facing rejection or a backend failure.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    match e.domain() {
      Some(domain) => Self::from(domain),
      None => {
        tracing::error!(error = %e, "store failure");
        Self::Store(Box::new(e))
      }
    }
  }
}

impl From<&meet_core::Error> for ApiError {
  fn from(e: &meet_core::Error) -> Self {
    use meet_core::Error as E;

    let status = match e {
      E::InvalidRequestTarget(_)
      | E::InvalidRegistration(_)
      | E::InvalidRecipient(_)
      | E::EmptyMessage => StatusCode::BAD_REQUEST,
      E::InvalidCredentials => StatusCode::UNAUTHORIZED,
      E::InvalidRequest(_) | E::InvalidMessage(_) | E::UnknownActor(_) => {
        StatusCode::NOT_FOUND
      }
      E::AlreadyRead(_) | E::DuplicateUsername(_) => StatusCode::CONFLICT,
    };
    tracing::debug!(%status, error = %e, "request rejected");

    ApiError::Rejected { status, message: e.to_string(), field: e.field() }
  }
}

impl From<meet_core::Error> for ApiError {
  fn from(e: meet_core::Error) -> Self { Self::from(&e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Rejected { status, message, field } => {
        (status, Json(json!({ "error": message, "field": field }))).into_response()
      }
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string(), "field": null })),
      )
        .into_response(),
    }
  }
}

#[cfg(test)]
mod tests {
  use meet_core::{
    id::MessageId, matching::TargetRejection, registration::RegistrationError,
  };

  use super::*;

  fn status_of(e: meet_core::Error) -> StatusCode {
    match ApiError::from(e) {
      ApiError::Rejected { status, .. } => status,
      ApiError::Store(_) => unreachable!(),
    }
  }

  #[test]
  fn statuses() {
    assert_eq!(
      status_of(TargetRejection::AlreadyFriends.into()),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(status_of(meet_core::Error::InvalidCredentials), StatusCode::UNAUTHORIZED);
    assert_eq!(
      status_of(meet_core::Error::InvalidMessage(MessageId(1))),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      status_of(meet_core::Error::AlreadyRead(MessageId(1))),
      StatusCode::CONFLICT
    );
  }

  #[test]
  fn field_is_carried() {
    let ApiError::Rejected { message, field, .. } =
      ApiError::from(meet_core::Error::from(RegistrationError::PasswordMismatch))
    else {
      unreachable!()
    };
    assert_eq!(message, "Passwords do not match");
    assert_eq!(field, Some("confirm"));
  }
}
