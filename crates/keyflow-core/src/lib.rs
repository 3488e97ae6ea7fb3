//! Core library for the keyflow sign-in flows shared by the CLI and TUI front-ends.
//!
//! All interaction with the hosted authentication service goes through the
//! [`auth::AuthClient`] capability trait; the flow coordinators in [`auth`]
//! own the client-side state machines around those calls.

pub mod auth;
pub mod phone;
pub mod presenter;
