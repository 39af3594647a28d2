//! Users and their birthdays.

use serde::Serialize;

use crate::id::UserId;

// ─── Birthday ────────────────────────────────────────────────────────────────

/// Longest day in each month. February allows the 29th in every year, since
/// birthdays carry no year.
const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const MONTH_NAMES: [&str; 12] = [
  "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
  "Dec",
];

/// A birth month and day, always valid for that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Birthday {
  month: u32,
  day:   u32,
}

impl Birthday {
  /// Returns `None` unless `(month, day)` is a valid calendar day.
  pub fn new(month: u32, day: u32) -> Option<Self> {
    Self::is_valid(month, day).then_some(Self { month, day })
  }

  pub fn is_valid(month: u32, day: u32) -> bool {
    (1..=12).contains(&month) && day >= 1 && day <= DAYS_IN_MONTH[month as usize - 1]
  }

  pub fn month(&self) -> u32 { self.month }

  pub fn day(&self) -> u32 { self.day }

  /// Three-letter English month abbreviation, e.g. `"May"`.
  pub fn month_name(&self) -> &'static str { MONTH_NAMES[self.month as usize - 1] }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// The public profile of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
  pub id:       UserId,
  pub username: String,
  pub birthday: Birthday,
}

/// A user together with the stored password hash. Only the login path and the
/// identity gate ever load this.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user:          User,
  /// PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Input to [`MeetStore::register_user`](crate::store::MeetStore::register_user).
/// The password has already been hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
  pub birthday:      Birthday,
}

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone)]
pub struct Actor(pub User);

impl Actor {
  pub fn id(&self) -> UserId { self.0.id }

  pub fn user(&self) -> &User { &self.0 }
}
