//! [`SqliteStore`]: the SQLite implementation of [`MeetStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use meet_core::{
  friendship::{Friend, FriendPair},
  id::{MessageId, RequestId, UserId},
  matching::{self, PotentialFriend, TargetRejection},
  message::{self, Message, ReceivedMessage, SentMessage},
  request::{self, Decision, FriendRequest, IncomingRequest, Resolution, SendOutcome},
  store::MeetStore,
  summary::Summary,
  user::{Credentials, NewUser, User},
};
use rusqlite::{Connection, Transaction};

use crate::{Error, Result, query, schema::SCHEMA};

type CoreError = meet_core::Error;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Birthday Meet store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!("database opened at {}", path.display());
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the connection thread.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside a transaction, committing only if it succeeds.
  async fn transact<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let result = f(&tx);
        if result.is_ok() {
          tx.commit()?;
        }
        Ok(result)
      })
      .await?
  }
}

fn today() -> NaiveDate { Utc::now().date_naive() }

// ─── Transactional operations ────────────────────────────────────────────────

fn register_tx(tx: &Transaction<'_>, user: NewUser) -> Result<User> {
  if query::username_taken(tx, &user.username)? {
    return Err(CoreError::DuplicateUsername(user.username).into());
  }
  let id = query::insert_user(tx, &user)?;
  Ok(User { id, username: user.username, birthday: user.birthday })
}

fn send_request_tx(
  tx: &Transaction<'_>,
  actor_id: UserId,
  target_id: UserId,
  text: Option<String>,
  sent_on: NaiveDate,
) -> Result<SendOutcome> {
  let actor = query::actor(tx, actor_id)?;
  let target = query::user_by_id(tx, target_id)?;
  let relationship = query::relationship(tx, actor_id, target_id)?;

  matching::check_target(&actor, target.as_ref(), relationship).map_err(CoreError::from)?;

  if relationship.incoming_request {
    // The target asked first: treat this as accepting their request.
    let pair = FriendPair::new(actor_id, target_id)
      .ok_or(CoreError::from(TargetRejection::SelfTarget))?;
    query::delete_request_between(tx, target_id, actor_id)?;
    query::insert_friendship(tx, pair)?;
    return Ok(SendOutcome::FriendshipFormed { friend_id: target_id });
  }

  let text = request::request_text(text.as_deref());
  let request_id = query::insert_request(tx, actor_id, target_id, &text, sent_on)?;
  Ok(SendOutcome::RequestCreated {
    request: FriendRequest {
      request_id,
      sender_id: actor_id,
      receiver_id: target_id,
      text,
      sent_on,
    },
  })
}

fn resolve_request_tx(
  tx: &Transaction<'_>,
  actor_id: UserId,
  request_id: RequestId,
  decision: Decision,
) -> Result<Resolution> {
  let request = query::request_by_id(tx, request_id)?
    .filter(|r| r.receiver_id == actor_id)
    .ok_or(CoreError::InvalidRequest(request_id))?;

  query::delete_request(tx, request_id)?;

  match decision {
    Decision::Accept => {
      let pair = FriendPair::new(actor_id, request.sender_id)
        .ok_or(CoreError::InvalidRequest(request_id))?;
      query::insert_friendship(tx, pair)?;
      Ok(Resolution::Accepted { friend_id: request.sender_id })
    }
    Decision::Ignore => Ok(Resolution::Ignored),
  }
}

fn send_message_tx(
  tx: &Transaction<'_>,
  actor_id: UserId,
  receiver_id: UserId,
  text: String,
  sent_on: NaiveDate,
) -> Result<Message> {
  query::actor(tx, actor_id)?;
  let receiver = query::user_by_id(tx, receiver_id)?;
  let relationship = query::relationship(tx, actor_id, receiver_id)?;
  if receiver.is_none() || !relationship.friends {
    return Err(CoreError::InvalidRecipient(receiver_id).into());
  }

  let message_id = query::insert_message(tx, actor_id, receiver_id, &text, sent_on)?;
  Ok(Message {
    message_id,
    sender_id: actor_id,
    receiver_id,
    text,
    sent_on,
    is_read: false,
  })
}

fn mark_read_tx(tx: &Transaction<'_>, actor_id: UserId, message_id: MessageId) -> Result<()> {
  let message = query::message_by_id(tx, message_id)?
    .filter(|m| m.receiver_id == actor_id)
    .ok_or(CoreError::InvalidMessage(message_id))?;

  if message.is_read {
    return Err(CoreError::AlreadyRead(message_id).into());
  }
  query::set_read(tx, message_id)?;
  Ok(())
}

fn potential_friends(conn: &Connection, actor_id: UserId) -> Result<Vec<PotentialFriend>> {
  let actor = query::actor(conn, actor_id)?;
  let candidates = query::same_birthday_candidates(conn, &actor)?;
  Ok(matching::potential_friends(&actor, candidates))
}

// ─── MeetStore impl ──────────────────────────────────────────────────────────

impl MeetStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn register_user(&self, user: NewUser) -> Result<User> {
    let user = self.transact(move |tx| register_tx(tx, user)).await?;
    tracing::debug!(user_id = %user.id, "user registered");
    Ok(user)
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    self.read(move |conn| query::user_by_id(conn, id)).await
  }

  async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>> {
    let username = username.to_owned();
    self
      .read(move |conn| query::credentials_by_username(conn, &username))
      .await
  }

  // ── Matching ──────────────────────────────────────────────────────────────

  async fn potential_friends(&self, actor: UserId) -> Result<Vec<PotentialFriend>> {
    self.read(move |conn| potential_friends(conn, actor)).await
  }

  // ── Requests ──────────────────────────────────────────────────────────────

  async fn send_request(
    &self,
    actor:  UserId,
    target: UserId,
    text:   Option<String>,
  ) -> Result<SendOutcome> {
    let sent_on = today();
    let outcome = self
      .transact(move |tx| send_request_tx(tx, actor, target, text, sent_on))
      .await?;

    match &outcome {
      SendOutcome::FriendshipFormed { friend_id } => {
        tracing::debug!(%actor, %friend_id, "mutual request formed friendship");
      }
      SendOutcome::RequestCreated { request } => {
        tracing::debug!(%actor, %target, request_id = %request.request_id, "friend request created");
      }
    }
    Ok(outcome)
  }

  async fn resolve_request(
    &self,
    actor:    UserId,
    request:  RequestId,
    decision: Decision,
  ) -> Result<Resolution> {
    let resolution = self
      .transact(move |tx| resolve_request_tx(tx, actor, request, decision))
      .await?;
    tracing::debug!(%actor, request_id = %request, ?resolution, "friend request resolved");
    Ok(resolution)
  }

  async fn incoming_requests(&self, actor: UserId) -> Result<Vec<IncomingRequest>> {
    self
      .read(move |conn| {
        query::actor(conn, actor)?;
        query::incoming_requests(conn, actor)
      })
      .await
  }

  // ── Friends ───────────────────────────────────────────────────────────────

  async fn friends(&self, actor: UserId) -> Result<Vec<Friend>> {
    self
      .read(move |conn| {
        query::actor(conn, actor)?;
        Ok(query::friends(conn, actor)?)
      })
      .await
  }

  // ── Messages ──────────────────────────────────────────────────────────────

  async fn send_message(
    &self,
    actor:    UserId,
    receiver: UserId,
    text:     String,
  ) -> Result<Message> {
    let text = message::message_text(&text)?;
    let sent_on = today();
    let message = self
      .transact(move |tx| send_message_tx(tx, actor, receiver, text, sent_on))
      .await?;
    tracing::debug!(%actor, %receiver, message_id = %message.message_id, "message sent");
    Ok(message)
  }

  async fn messages(&self, actor: UserId) -> Result<Vec<ReceivedMessage>> {
    self
      .read(move |conn| {
        query::actor(conn, actor)?;
        query::received_messages(conn, actor)
      })
      .await
  }

  async fn sent_messages(&self, actor: UserId) -> Result<Vec<SentMessage>> {
    self
      .read(move |conn| {
        query::actor(conn, actor)?;
        query::sent_messages(conn, actor)
      })
      .await
  }

  async fn mark_read(&self, actor: UserId, message: MessageId) -> Result<()> {
    self.transact(move |tx| mark_read_tx(tx, actor, message)).await?;
    tracing::debug!(%actor, message_id = %message, "message marked read");
    Ok(())
  }

  // ── Overview ──────────────────────────────────────────────────────────────

  async fn summary(&self, actor: UserId) -> Result<Summary> {
    self
      .transact(move |tx| {
        let user = query::actor(tx, actor)?;
        let potential = potential_friends(tx, actor)?.len();
        let pending = query::count_incoming_requests(tx, actor)?;
        let unread = query::count_unread(tx, actor)?;
        Ok(Summary::new(&user, pending, unread, potential))
      })
      .await
  }
}
