//! Channel transport between the presenter and the audience process.
//!
//! The contract mirrors a cross-window post-and-listen primitive: posting is
//! fire-and-forget with no delivery confirmation and no ordering guarantee
//! across posts, and receivers see an opaque `source` handle they can reply
//! to. No origin checks are made.

pub mod codec;
pub mod local;

use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use liveink_core::error::Result;

pub use codec::{classify, post_envelope, Inbound};
pub use local::{LocalEndpoint, LocalHub};

/// Opaque handle to a process on the channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerHandle(Arc<str>);

impl PeerHandle {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One inbound post.
#[derive(Debug, Clone)]
pub struct Posted {
    pub source: PeerHandle,
    pub data: String,
}

pub trait Channel: Send + Sync {
    /// Own identity, attached as `source` to every post.
    fn local(&self) -> PeerHandle;

    /// Acquire a handle to `target`, creating the process if needed. Reusing
    /// `name` targets the same process.
    fn open(&self, target: &str, name: &str, features: &str) -> Result<PeerHandle>;

    /// Fire-and-forget. Posts to a live process that is not listening yet are
    /// silently lost; a process that is gone yields `ChannelUnavailable`.
    fn post(&self, to: &PeerHandle, data: String) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<Posted>;
}

/// Spawn a receive loop calling `handler` once per inbound post.
///
/// Handler errors are logged and the loop keeps going; it only ends when the
/// channel itself is gone or the returned task is aborted.
pub fn listen<F>(channel: &dyn Channel, mut handler: F) -> JoinHandle<()>
where
    F: FnMut(Posted) -> Result<()> + Send + 'static,
{
    let mut rx = channel.subscribe();
    let me = channel.local();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(posted) => {
                    if let Err(e) = handler(posted) {
                        tracing::warn!(endpoint=%me, code=e.code().as_str(), error=%e, "message handler failed");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(endpoint=%me, skipped, "listener lagged, skipping ahead");
                }
                Err(RecvError::Closed) => {
                    tracing::debug!(endpoint=%me, "channel closed, listener stops");
                    break;
                }
            }
        }
    })
}
