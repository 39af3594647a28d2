//! Friend requests and their lifecycle outcomes.
//!
//! A request is never kept once it has been answered. Accepting or ignoring
//! deletes it; accepting also records a friendship. Sending a request to
//! someone who already requested you skips the request entirely and forms the
//! friendship straight away.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{RequestId, UserId};

/// Used when the sender leaves the message blank.
pub const DEFAULT_REQUEST_MESSAGE: &str = "Hello, I would like to add you as my friend!";

/// The text to store for a request, substituting the default for blank input.
pub fn request_text(text: Option<&str>) -> String {
  match text.map(str::trim) {
    Some(t) if !t.is_empty() => t.to_owned(),
    _ => DEFAULT_REQUEST_MESSAGE.to_owned(),
  }
}

/// A pending friend request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendRequest {
  pub request_id:  RequestId,
  pub sender_id:   UserId,
  pub receiver_id: UserId,
  pub text:        String,
  pub sent_on:     NaiveDate,
}

/// A request addressed to the actor, with the sender's name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomingRequest {
  pub request:         FriendRequest,
  pub sender_username: String,
}

/// Result of [`MeetStore::send_request`](crate::store::MeetStore::send_request).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
  /// The target had already requested the actor; the two are now friends.
  FriendshipFormed { friend_id: UserId },
  RequestCreated { request: FriendRequest },
}

/// How the receiver answers a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
  Accept,
  Ignore,
}

/// Result of [`MeetStore::resolve_request`](crate::store::MeetStore::resolve_request).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
  Accepted { friend_id: UserId },
  Ignored,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_text_gets_default() {
    assert_eq!(request_text(None), DEFAULT_REQUEST_MESSAGE);
    assert_eq!(request_text(Some("")), DEFAULT_REQUEST_MESSAGE);
    assert_eq!(request_text(Some("  \n")), DEFAULT_REQUEST_MESSAGE);
  }

  #[test]
  fn text_is_kept() {
    assert_eq!(request_text(Some(" hi there ")), "hi there");
  }

  #[test]
  fn outcome_serialises_with_tag() {
    let json = serde_json::to_value(Resolution::Accepted { friend_id: UserId(7) }).unwrap();
    assert_eq!(json, serde_json::json!({ "outcome": "accepted", "friend_id": 7 }));
  }
}
