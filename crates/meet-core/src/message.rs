//! Messages between friends.
//!
//! The read flag only ever moves from unread to read.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  Error, Result,
  id::{MessageId, UserId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
  pub message_id:  MessageId,
  pub sender_id:   UserId,
  pub receiver_id: UserId,
  pub text:        String,
  pub sent_on:     NaiveDate,
  pub is_read:     bool,
}

/// A message in the actor's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceivedMessage {
  pub message:         Message,
  pub sender_username: String,
}

/// A message the actor sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentMessage {
  pub message:           Message,
  pub receiver_username: String,
}

/// Trim a message body, rejecting it if nothing is left.
pub fn message_text(text: &str) -> Result<String> {
  let text = text.trim();
  if text.is_empty() {
    return Err(Error::EmptyMessage);
  }
  Ok(text.to_owned())
}
