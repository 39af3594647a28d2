//! Potential-friend matching.
//!
//! Two users can become friends only if they share a birth month and day. The
//! rules here are pure: the store gathers a [`Relationship`] for each pair and
//! these functions decide.

use serde::Serialize;
use thiserror::Error;

use crate::{id::UserId, user::User};

/// Why a friend request target was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TargetRejection {
  #[error("Invalid friend request")]
  UnknownUser,
  #[error("Invalid friend request")]
  SelfTarget,
  #[error("Invalid friend request")]
  BirthdayMismatch,
  #[error("User is already a friend")]
  AlreadyFriends,
  #[error("You have already sent a request")]
  AlreadyRequested,
}

/// What the store knows about how an actor and another user are connected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relationship {
  /// A friendship exists, in either stored order.
  pub friends:          bool,
  /// The actor has a pending request to the other user.
  pub outgoing_request: bool,
  /// The other user has a pending request to the actor.
  pub incoming_request: bool,
}

/// An entry on the actor's explore page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PotentialFriend {
  pub user_id:  UserId,
  pub username: String,
}

/// Check that `actor` may send a friend request to `target`.
///
/// A pending request in the other direction does not disqualify the target;
/// sending to them forms the friendship instead.
pub fn check_target(
  actor: &User,
  target: Option<&User>,
  relationship: Relationship,
) -> Result<(), TargetRejection> {
  let target = target.ok_or(TargetRejection::UnknownUser)?;

  if target.id == actor.id {
    return Err(TargetRejection::SelfTarget);
  }
  if target.birthday != actor.birthday {
    return Err(TargetRejection::BirthdayMismatch);
  }
  if relationship.friends {
    return Err(TargetRejection::AlreadyFriends);
  }
  if relationship.outgoing_request {
    return Err(TargetRejection::AlreadyRequested);
  }
  Ok(())
}

pub fn is_potential_friend(actor: &User, candidate: &User, relationship: Relationship) -> bool {
  check_target(actor, Some(candidate), relationship).is_ok()
}

/// Filter `candidates` down to the actor's potential friends, sorted by
/// username.
pub fn potential_friends(
  actor: &User,
  candidates: impl IntoIterator<Item = (User, Relationship)>,
) -> Vec<PotentialFriend> {
  let mut found: Vec<PotentialFriend> = candidates
    .into_iter()
    .filter(|(candidate, rel)| is_potential_friend(actor, candidate, *rel))
    .map(|(candidate, _)| PotentialFriend {
      user_id:  candidate.id,
      username: candidate.username,
    })
    .collect();
  found.sort_by(|a, b| a.username.cmp(&b.username));
  found
}
