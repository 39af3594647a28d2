//! Error types for `meet-core`.
//!
//! Every variant is recoverable: the presentation layer shows the message next
//! to the form field returned by [`Error::field`] and re-renders the view.

use thiserror::Error;

use crate::{
  id::{MessageId, RequestId, UserId},
  matching::TargetRejection,
  registration::RegistrationError,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  InvalidRequestTarget(#[from] TargetRejection),

  #[error("Invalid request {0}")]
  InvalidRequest(RequestId),

  #[error("Invalid message {0}")]
  InvalidMessage(MessageId),

  #[error("Message {0} is already marked as read")]
  AlreadyRead(MessageId),

  #[error("Username already taken")]
  DuplicateUsername(String),

  #[error("Incorrect username or password")]
  InvalidCredentials,

  #[error("{0}")]
  InvalidRegistration(#[from] RegistrationError),

  #[error("You can only message your friends")]
  InvalidRecipient(UserId),

  #[error("Message cannot be empty")]
  EmptyMessage,

  #[error("unknown user: {0}")]
  UnknownActor(UserId),
}

impl Error {
  /// The form field this error should be displayed next to, if any.
  pub fn field(&self) -> Option<&'static str> {
    match self {
      Self::InvalidRequestTarget(_) => Some("receiver_id"),
      Self::InvalidRequest(_) => Some("request_id"),
      Self::InvalidMessage(_) | Self::AlreadyRead(_) => Some("message_id"),
      Self::DuplicateUsername(_) => Some("username"),
      Self::InvalidCredentials => None,
      Self::InvalidRegistration(e) => Some(e.field()),
      Self::InvalidRecipient(_) => Some("receiver_id"),
      Self::EmptyMessage => Some("message"),
      Self::UnknownActor(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
