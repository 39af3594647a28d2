//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings. Ids are the table's integer row
//! ids. Rows are first read into `Raw*` structs inside the connection closure
//! and converted to domain types afterwards, so decode failures surface as
//! [`Error`] rather than as a database error.

use chrono::NaiveDate;
use meet_core::{
  id::{MessageId, RequestId, UserId},
  message::Message,
  request::FriendRequest,
  user::{Birthday, User},
};

use crate::{Error, Result};

// ─── NaiveDate ────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?)
}

// ─── Birthday ─────────────────────────────────────────────────────────────────

pub fn decode_birthday(month: u32, day: u32) -> Result<Birthday> {
  Birthday::new(month, day)
    .ok_or_else(|| Error::Decode(format!("invalid birthday {month}/{day}")))
}

// ─── Raw row types ────────────────────────────────────────────────────────────

pub struct RawUser {
  pub id:       i64,
  pub username: String,
  pub month:    u32,
  pub day:      u32,
}

impl RawUser {
  pub const COLUMNS: &'static str = "u.id, u.username, u.month, u.day";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:       row.get(0)?,
      username: row.get(1)?,
      month:    row.get(2)?,
      day:      row.get(3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:       UserId(self.id),
      username: self.username,
      birthday: decode_birthday(self.month, self.day)?,
    })
  }
}

pub struct RawRequest {
  pub id:          i64,
  pub sender_id:   i64,
  pub receiver_id: i64,
  pub text:        String,
  pub when_sent:   String,
}

impl RawRequest {
  pub const COLUMNS: &'static str =
    "r.id, r.sender_id, r.receiver_id, r.request_message, r.when_sent";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      sender_id:   row.get(1)?,
      receiver_id: row.get(2)?,
      text:        row.get(3)?,
      when_sent:   row.get(4)?,
    })
  }

  pub fn into_request(self) -> Result<FriendRequest> {
    Ok(FriendRequest {
      request_id:  RequestId(self.id),
      sender_id:   UserId(self.sender_id),
      receiver_id: UserId(self.receiver_id),
      text:        self.text,
      sent_on:     decode_date(&self.when_sent)?,
    })
  }
}

pub struct RawMessage {
  pub id:          i64,
  pub sender_id:   i64,
  pub receiver_id: i64,
  pub text:        String,
  pub when_sent:   String,
  pub is_read:     bool,
}

impl RawMessage {
  pub const COLUMNS: &'static str =
    "m.id, m.sender_id, m.receiver_id, m.message_text, m.when_sent, m.is_read";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      sender_id:   row.get(1)?,
      receiver_id: row.get(2)?,
      text:        row.get(3)?,
      when_sent:   row.get(4)?,
      is_read:     row.get(5)?,
    })
  }

  pub fn into_message(self) -> Result<Message> {
    Ok(Message {
      message_id:  MessageId(self.id),
      sender_id:   UserId(self.sender_id),
      receiver_id: UserId(self.receiver_id),
      text:        self.text,
      sent_on:     decode_date(&self.when_sent)?,
      is_read:     self.is_read,
    })
  }
}
