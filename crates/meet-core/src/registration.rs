//! Validation of the registration form.
//!
//! Fields arrive as raw strings, exactly as typed. Checks run in form order and
//! the first failure wins, so the user sees one message at a time. Username
//! uniqueness is not checked here; it needs the store.

use serde::Deserialize;
use thiserror::Error;

use crate::user::Birthday;

pub const MIN_PASSWORD_LEN: usize = 8;

/// A registration failure, scoped to the form field that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistrationError {
  #[error("Invalid username")]
  InvalidUsername,
  #[error("Invalid password")]
  InvalidPassword,
  #[error("Passwords do not match")]
  PasswordMismatch,
  #[error("Invalid birthday")]
  InvalidBirthday,
}

impl RegistrationError {
  pub fn field(&self) -> &'static str {
    match self {
      Self::InvalidUsername => "username",
      Self::InvalidPassword => "password",
      Self::PasswordMismatch => "confirm",
      Self::InvalidBirthday => "birthday",
    }
  }
}

/// The registration form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
  pub username: String,
  pub password: String,
  pub confirm:  String,
  pub month:    String,
  pub day:      String,
}

/// A form that passed every check except uniqueness.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
  pub username: String,
  pub password: String,
  pub birthday: Birthday,
}

impl RegistrationForm {
  /// The username as it will be stored, or an error if it is blank.
  pub fn username(&self) -> Result<&str, RegistrationError> {
    let username = self.username.trim();
    if username.is_empty() {
      return Err(RegistrationError::InvalidUsername);
    }
    Ok(username)
  }

  pub fn validate(self) -> Result<ValidRegistration, RegistrationError> {
    let username = self.username()?.to_owned();

    if self.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(RegistrationError::InvalidPassword);
    }
    if self.password != self.confirm {
      return Err(RegistrationError::PasswordMismatch);
    }

    let month = parse_number(&self.month).ok_or(RegistrationError::InvalidBirthday)?;
    let day = parse_number(&self.day).ok_or(RegistrationError::InvalidBirthday)?;
    let birthday = Birthday::new(month, day).ok_or(RegistrationError::InvalidBirthday)?;

    Ok(ValidRegistration { username, password: self.password, birthday })
  }
}

/// Digits only; signs, spaces inside the number and decimals are rejected.
fn parse_number(s: &str) -> Option<u32> {
  let s = s.trim();
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  s.parse().ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form() -> RegistrationForm {
    RegistrationForm {
      username: "alice".into(),
      password: "correct horse".into(),
      confirm:  "correct horse".into(),
      month:    "5".into(),
      day:      "10".into(),
    }
  }

  #[test]
  fn valid_form() {
    let valid = form().validate().unwrap();
    assert_eq!(valid.username, "alice");
    assert_eq!(valid.birthday, Birthday::new(5, 10).unwrap());
  }

  #[test]
  fn username_is_trimmed() {
    let mut f = form();
    f.username = "  alice ".into();
    assert_eq!(f.validate().unwrap().username, "alice");
  }

  #[test]
  fn blank_username() {
    let mut f = form();
    f.username = "   ".into();
    assert_eq!(f.validate().unwrap_err(), RegistrationError::InvalidUsername);
  }

  #[test]
  fn short_password() {
    let mut f = form();
    f.password = "short".into();
    f.confirm = "short".into();
    assert_eq!(f.validate().unwrap_err(), RegistrationError::InvalidPassword);
  }

  #[test]
  fn mismatched_confirmation() {
    let mut f = form();
    f.confirm = "something else".into();
    assert_eq!(f.validate().unwrap_err(), RegistrationError::PasswordMismatch);
  }

  #[test]
  fn first_failure_wins() {
    let mut f = form();
    f.password = "short".into();
    f.month = "13".into();
    assert_eq!(f.validate().unwrap_err(), RegistrationError::InvalidPassword);
  }

  #[test]
  fn non_numeric_birthday() {
    for (month, day) in [("May", "10"), ("5", "ten"), ("-5", "10"), ("", "10"), ("5", "1.5")] {
      let mut f = form();
      f.month = month.into();
      f.day = day.into();
      assert_eq!(
        f.validate().unwrap_err(),
        RegistrationError::InvalidBirthday,
        "{month:?}/{day:?}"
      );
    }
  }

  #[test]
  fn impossible_birthday() {
    let mut f = form();
    f.month = "4".into();
    f.day = "31".into();
    assert_eq!(f.validate().unwrap_err(), RegistrationError::InvalidBirthday);
  }

  #[test]
  fn error_fields() {
    assert_eq!(RegistrationError::InvalidUsername.field(), "username");
    assert_eq!(RegistrationError::PasswordMismatch.field(), "confirm");
    assert_eq!(RegistrationError::InvalidBirthday.field(), "birthday");
  }
}
