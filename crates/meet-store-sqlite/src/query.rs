//! Synchronous query helpers, run on the connection thread.
//!
//! Each function takes a plain [`Connection`]; a [`rusqlite::Transaction`]
//! derefs to one, so the same helpers serve reads and transactional writes.

use chrono::NaiveDate;
use meet_core::{
  friendship::{Friend, FriendPair},
  id::{MessageId, RequestId, UserId},
  matching::Relationship,
  message::{Message, ReceivedMessage, SentMessage},
  request::{FriendRequest, IncomingRequest},
  user::{Credentials, NewUser, User},
};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::{
  Error, Result,
  encode::{RawMessage, RawRequest, RawUser, encode_date},
};

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn user_by_id(conn: &Connection, id: UserId) -> Result<Option<User>> {
  let raw = conn
    .query_row(
      &format!("SELECT {} FROM users u WHERE u.id = ?1", RawUser::COLUMNS),
      params![id.0],
      RawUser::from_row,
    )
    .optional()?;
  raw.map(RawUser::into_user).transpose()
}

/// Load the acting user, failing if the id has no user behind it.
pub fn actor(conn: &Connection, id: UserId) -> Result<User> {
  user_by_id(conn, id)?.ok_or(Error::Core(meet_core::Error::UnknownActor(id)))
}

pub fn credentials_by_username(
  conn: &Connection,
  username: &str,
) -> Result<Option<Credentials>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {}, u.password_hash FROM users u WHERE u.username = ?1",
        RawUser::COLUMNS
      ),
      params![username],
      |row| Ok((RawUser::from_row(row)?, row.get::<_, String>(4)?)),
    )
    .optional()?;

  raw
    .map(|(user, password_hash)| {
      Ok(Credentials { user: user.into_user()?, password_hash })
    })
    .transpose()
}

pub fn username_taken(conn: &Connection, username: &str) -> rusqlite::Result<bool> {
  conn.query_row(
    "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
    params![username],
    |row| row.get(0),
  )
}

pub fn insert_user(conn: &Connection, user: &NewUser) -> rusqlite::Result<UserId> {
  conn.execute(
    "INSERT INTO users (username, password_hash, month, day) VALUES (?1, ?2, ?3, ?4)",
    params![
      user.username,
      user.password_hash,
      user.birthday.month(),
      user.birthday.day(),
    ],
  )?;
  Ok(UserId(conn.last_insert_rowid()))
}

// ─── Relationships ───────────────────────────────────────────────────────────

/// How `actor` and `other` are connected. Friendships are checked in both
/// stored orders.
pub fn relationship(
  conn: &Connection,
  actor: UserId,
  other: UserId,
) -> rusqlite::Result<Relationship> {
  conn.query_row(
    "SELECT
       EXISTS(SELECT 1 FROM friends
              WHERE (user_1_id = ?1 AND user_2_id = ?2)
                 OR (user_1_id = ?2 AND user_2_id = ?1)),
       EXISTS(SELECT 1 FROM requests WHERE sender_id = ?1 AND receiver_id = ?2),
       EXISTS(SELECT 1 FROM requests WHERE sender_id = ?2 AND receiver_id = ?1)",
    params![actor.0, other.0],
    |row| {
      Ok(Relationship {
        friends:          row.get(0)?,
        outgoing_request: row.get(1)?,
        incoming_request: row.get(2)?,
      })
    },
  )
}

/// Every other user sharing the actor's birthday, with how they relate to the
/// actor. The matching rules decide which of them are potential friends.
pub fn same_birthday_candidates(
  conn: &Connection,
  actor: &User,
) -> Result<Vec<(User, Relationship)>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {},
       EXISTS(SELECT 1 FROM friends f
              WHERE (f.user_1_id = ?1 AND f.user_2_id = u.id)
                 OR (f.user_1_id = u.id AND f.user_2_id = ?1)),
       EXISTS(SELECT 1 FROM requests r WHERE r.sender_id = ?1 AND r.receiver_id = u.id),
       EXISTS(SELECT 1 FROM requests r WHERE r.sender_id = u.id AND r.receiver_id = ?1)
     FROM users u
     WHERE u.month = ?2 AND u.day = ?3 AND u.id != ?1",
    RawUser::COLUMNS
  ))?;

  let rows = stmt
    .query_map(
      params![actor.id.0, actor.birthday.month(), actor.birthday.day()],
      |row| {
        Ok((RawUser::from_row(row)?, Relationship {
          friends:          row.get(4)?,
          outgoing_request: row.get(5)?,
          incoming_request: row.get(6)?,
        }))
      },
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows
    .into_iter()
    .map(|(raw, rel)| Ok((raw.into_user()?, rel)))
    .collect()
}

// ─── Friend requests ─────────────────────────────────────────────────────────

pub fn insert_request(
  conn: &Connection,
  sender: UserId,
  receiver: UserId,
  text: &str,
  sent_on: NaiveDate,
) -> rusqlite::Result<RequestId> {
  conn.execute(
    "INSERT INTO requests (sender_id, receiver_id, request_message, when_sent)
     VALUES (?1, ?2, ?3, ?4)",
    params![sender.0, receiver.0, text, encode_date(sent_on)],
  )?;
  Ok(RequestId(conn.last_insert_rowid()))
}

pub fn request_by_id(conn: &Connection, id: RequestId) -> Result<Option<FriendRequest>> {
  let raw = conn
    .query_row(
      &format!("SELECT {} FROM requests r WHERE r.id = ?1", RawRequest::COLUMNS),
      params![id.0],
      RawRequest::from_row,
    )
    .optional()?;
  raw.map(RawRequest::into_request).transpose()
}

pub fn delete_request(conn: &Connection, id: RequestId) -> rusqlite::Result<()> {
  conn.execute("DELETE FROM requests WHERE id = ?1", params![id.0])?;
  Ok(())
}

pub fn delete_request_between(
  conn: &Connection,
  sender: UserId,
  receiver: UserId,
) -> rusqlite::Result<()> {
  conn.execute(
    "DELETE FROM requests WHERE sender_id = ?1 AND receiver_id = ?2",
    params![sender.0, receiver.0],
  )?;
  Ok(())
}

/// Requests addressed to `receiver`, newest first.
pub fn incoming_requests(conn: &Connection, receiver: UserId) -> Result<Vec<IncomingRequest>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {}, u.username
     FROM requests r
     JOIN users u ON u.id = r.sender_id
     WHERE r.receiver_id = ?1
     ORDER BY r.id DESC",
    RawRequest::COLUMNS
  ))?;

  let rows = stmt
    .query_map(params![receiver.0], |row| {
      Ok((RawRequest::from_row(row)?, row.get::<_, String>(5)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows
    .into_iter()
    .map(|(raw, sender_username)| {
      Ok(IncomingRequest { request: raw.into_request()?, sender_username })
    })
    .collect()
}

pub fn count_incoming_requests(conn: &Connection, receiver: UserId) -> rusqlite::Result<usize> {
  let n: i64 = conn.query_row(
    "SELECT COUNT(*) FROM requests WHERE receiver_id = ?1",
    params![receiver.0],
    |row| row.get(0),
  )?;
  Ok(n as usize)
}

// ─── Friendships ─────────────────────────────────────────────────────────────

/// Record a friendship. A pair that is already friends is left as is.
pub fn insert_friendship(conn: &Connection, pair: FriendPair) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT OR IGNORE INTO friends (user_1_id, user_2_id) VALUES (?1, ?2)",
    params![pair.low().0, pair.high().0],
  )?;
  Ok(())
}

/// The user's friends, sorted by username.
pub fn friends(conn: &Connection, user: UserId) -> rusqlite::Result<Vec<Friend>> {
  let mut stmt = conn.prepare(
    "SELECT u.id, u.username
     FROM friends f
     JOIN users u
       ON u.id = CASE WHEN f.user_1_id = ?1 THEN f.user_2_id ELSE f.user_1_id END
     WHERE f.user_1_id = ?1 OR f.user_2_id = ?1
     ORDER BY u.username ASC",
  )?;

  let rows = stmt
    .query_map(params![user.0], |row| {
      Ok(Friend {
        user_id:  UserId(row.get(0)?),
        username: row.get(1)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── Messages ────────────────────────────────────────────────────────────────

pub fn insert_message(
  conn: &Connection,
  sender: UserId,
  receiver: UserId,
  text: &str,
  sent_on: NaiveDate,
) -> rusqlite::Result<MessageId> {
  conn.execute(
    "INSERT INTO messages (sender_id, receiver_id, message_text, when_sent, is_read)
     VALUES (?1, ?2, ?3, ?4, 0)",
    params![sender.0, receiver.0, text, encode_date(sent_on)],
  )?;
  Ok(MessageId(conn.last_insert_rowid()))
}

pub fn message_by_id(conn: &Connection, id: MessageId) -> Result<Option<Message>> {
  let raw = conn
    .query_row(
      &format!("SELECT {} FROM messages m WHERE m.id = ?1", RawMessage::COLUMNS),
      params![id.0],
      RawMessage::from_row,
    )
    .optional()?;
  raw.map(RawMessage::into_message).transpose()
}

pub fn set_read(conn: &Connection, id: MessageId) -> rusqlite::Result<()> {
  conn.execute("UPDATE messages SET is_read = 1 WHERE id = ?1", params![id.0])?;
  Ok(())
}

/// Messages addressed to `receiver`, newest first.
pub fn received_messages(conn: &Connection, receiver: UserId) -> Result<Vec<ReceivedMessage>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {}, u.username
     FROM messages m
     JOIN users u ON u.id = m.sender_id
     WHERE m.receiver_id = ?1
     ORDER BY m.id DESC",
    RawMessage::COLUMNS
  ))?;

  let rows = stmt
    .query_map(params![receiver.0], |row| {
      Ok((RawMessage::from_row(row)?, row.get::<_, String>(6)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows
    .into_iter()
    .map(|(raw, sender_username)| {
      Ok(ReceivedMessage { message: raw.into_message()?, sender_username })
    })
    .collect()
}

/// Messages sent by `sender`, newest first.
pub fn sent_messages(conn: &Connection, sender: UserId) -> Result<Vec<SentMessage>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {}, u.username
     FROM messages m
     JOIN users u ON u.id = m.receiver_id
     WHERE m.sender_id = ?1
     ORDER BY m.id DESC",
    RawMessage::COLUMNS
  ))?;

  let rows = stmt
    .query_map(params![sender.0], |row| {
      Ok((RawMessage::from_row(row)?, row.get::<_, String>(6)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows
    .into_iter()
    .map(|(raw, receiver_username)| {
      Ok(SentMessage { message: raw.into_message()?, receiver_username })
    })
    .collect()
}

pub fn count_unread(conn: &Connection, receiver: UserId) -> rusqlite::Result<usize> {
  let n: i64 = conn.query_row(
    "SELECT COUNT(*) FROM messages WHERE receiver_id = ?1 AND is_read = 0",
    params![receiver.0],
    |row| row.get(0),
  )?;
  Ok(n as usize)
}
