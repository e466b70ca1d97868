//! liveink sync library entry.
//!
//! Wires the transport, the presenter session (handshake, state replication,
//! element actions), the audience responder and the page input adapter into
//! one stack. Consumed by the demo binary (`main.rs`) and integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod context;
pub mod input;
pub mod obs;
pub mod presentation;
pub mod responder;
pub mod session;
pub mod transport;

pub use context::SyncContext;
pub use responder::{AudienceResponder, AudienceView};
pub use session::{LinkState, PresenterSession, SessionStatus};
