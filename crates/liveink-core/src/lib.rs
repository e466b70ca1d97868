//! liveink core: transport-agnostic protocol primitives, error types, and the
//! element registry shared by the presenter and audience endpoints.
//!
//! This crate defines the wire-level contract of the notes channel. It carries
//! no runtime or transport dependencies so both endpoints (and test tooling)
//! can reuse it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed or
//! foreign traffic on a shared channel must surface as `DecodeError`, never as
//! a crash of the receive loop.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod element;
pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{DecodeError, LiveInkError, Result};
