//! The overview shown on the home page.

use serde::Serialize;

use crate::user::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
  pub username:               String,
  pub birth_month:            u32,
  pub birth_month_name:       &'static str,
  pub birth_day:              u32,
  pub pending_request_count:  usize,
  pub unread_message_count:   usize,
  pub potential_friend_count: usize,
}

impl Summary {
  pub fn new(
    user: &User,
    pending_request_count: usize,
    unread_message_count: usize,
    potential_friend_count: usize,
  ) -> Self {
    Self {
      username: user.username.clone(),
      birth_month: user.birthday.month(),
      birth_month_name: user.birthday.month_name(),
      birth_day: user.birthday.day(),
      pending_request_count,
      unread_message_count,
      potential_friend_count,
    }
  }
}
