//! The `MeetStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `meet-store-sqlite`).
//! Higher layers (`meet-api`, `meet-server`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Every operation takes the actor explicitly. Callers are expected to have
//! authenticated the actor already. Reads and sends for an actor id with no
//! user behind it fail with [`Error::UnknownActor`](crate::Error::UnknownActor);
//! `resolve_request` and `mark_read` report the request or message as invalid
//! instead, since nothing can be addressed to a missing user.

use std::future::Future;

use crate::{
  friendship::Friend,
  id::{MessageId, RequestId, UserId},
  matching::PotentialFriend,
  message::{Message, ReceivedMessage, SentMessage},
  request::{Decision, IncomingRequest, Resolution, SendOutcome},
  summary::Summary,
  user::{Credentials, NewUser, User},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A backend error that may carry a domain [`Error`](crate::Error).
///
/// Domain errors are the user's fault and are shown to them; anything else is
/// a backend failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn domain(&self) -> Option<&crate::Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Birthday Meet storage backend.
///
/// Each mutating method is atomic: either every row it touches changes, or
/// none do.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MeetStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create a user. Fails with `DuplicateUsername` if the name is taken.
  fn register_user(
    &self,
    user: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look a user up by name, including their password hash.
  fn find_credentials<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  // ── Matching ──────────────────────────────────────────────────────────

  /// Users the actor could send a friend request to, sorted by username.
  fn potential_friends(
    &self,
    actor: UserId,
  ) -> impl Future<Output = Result<Vec<PotentialFriend>, Self::Error>> + Send + '_;

  // ── Requests ──────────────────────────────────────────────────────────

  /// Send a friend request, or form the friendship if `target` already
  /// requested the actor. Blank `text` is replaced by the default message.
  fn send_request(
    &self,
    actor: UserId,
    target: UserId,
    text: Option<String>,
  ) -> impl Future<Output = Result<SendOutcome, Self::Error>> + Send + '_;

  /// Accept or ignore a request addressed to the actor. The request is
  /// deleted either way.
  fn resolve_request(
    &self,
    actor: UserId,
    request: RequestId,
    decision: Decision,
  ) -> impl Future<Output = Result<Resolution, Self::Error>> + Send + '_;

  /// Requests addressed to the actor, newest first.
  fn incoming_requests(
    &self,
    actor: UserId,
  ) -> impl Future<Output = Result<Vec<IncomingRequest>, Self::Error>> + Send + '_;

  // ── Friends ───────────────────────────────────────────────────────────

  /// The actor's friends, sorted by username.
  fn friends(
    &self,
    actor: UserId,
  ) -> impl Future<Output = Result<Vec<Friend>, Self::Error>> + Send + '_;

  // ── Messages ──────────────────────────────────────────────────────────

  /// Send a message to one of the actor's friends.
  fn send_message(
    &self,
    actor: UserId,
    receiver: UserId,
    text: String,
  ) -> impl Future<Output = Result<Message, Self::Error>> + Send + '_;

  /// Messages addressed to the actor, newest first.
  fn messages(
    &self,
    actor: UserId,
  ) -> impl Future<Output = Result<Vec<ReceivedMessage>, Self::Error>> + Send + '_;

  /// Messages the actor sent, newest first.
  fn sent_messages(
    &self,
    actor: UserId,
  ) -> impl Future<Output = Result<Vec<SentMessage>, Self::Error>> + Send + '_;

  /// Mark a message addressed to the actor as read.
  ///
  /// Fails with `InvalidMessage` if the message is not the actor's and with
  /// `AlreadyRead` if it was read before; neither changes anything.
  fn mark_read(
    &self,
    actor: UserId,
    message: MessageId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Overview ──────────────────────────────────────────────────────────

  fn summary(
    &self,
    actor: UserId,
  ) -> impl Future<Output = Result<Summary, Self::Error>> + Send + '_;
}
