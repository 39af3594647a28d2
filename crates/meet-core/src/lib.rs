//! Core types and trait definitions for Birthday Meet.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the domain model (users, friend requests, friendships, messages), the rules
//! that decide who may befriend whom, and the [`store::MeetStore`] trait that
//! storage backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod friendship;
pub mod id;
pub mod matching;
pub mod message;
pub mod registration;
pub mod request;
pub mod store;
pub mod summary;
pub mod user;

pub use error::{Error, Result};
