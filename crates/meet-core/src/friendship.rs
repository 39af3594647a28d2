//! Friendships.
//!
//! A friendship is unordered. It is stored as a normalised pair so that the
//! same two users can only ever produce one row.

use serde::Serialize;

use crate::id::UserId;

/// An unordered pair of distinct users, stored lower id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FriendPair {
  low:  UserId,
  high: UserId,
}

impl FriendPair {
  /// Returns `None` when `a == b`; nobody can befriend themself.
  pub fn new(a: UserId, b: UserId) -> Option<Self> {
    match a.cmp(&b) {
      std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
      std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
      std::cmp::Ordering::Equal => None,
    }
  }

  pub fn low(&self) -> UserId { self.low }

  pub fn high(&self) -> UserId { self.high }

  /// The member of the pair that is not `me`.
  pub fn other(&self, me: UserId) -> UserId {
    if me == self.low { self.high } else { self.low }
  }
}

/// One of the actor's friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Friend {
  pub user_id:  UserId,
  pub username: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn order_does_not_matter() {
    assert_eq!(FriendPair::new(UserId(1), UserId(2)), FriendPair::new(UserId(2), UserId(1)));
  }

  #[test]
  fn lower_id_first() {
    let pair = FriendPair::new(UserId(9), UserId(3)).unwrap();
    assert_eq!(pair.low(), UserId(3));
    assert_eq!(pair.high(), UserId(9));
    assert_eq!(pair.other(UserId(9)), UserId(3));
    assert_eq!(pair.other(UserId(3)), UserId(9));
  }

  #[test]
  fn no_self_friendship() {
    assert!(FriendPair::new(UserId(4), UserId(4)).is_none());
  }
}
