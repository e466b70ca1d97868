//! In-process channel hub.
//!
//! Each named "window" owns a broadcast sender; endpoints subscribe to their
//! own window and post into others. A window that exists but has no
//! subscriber behaves like a page whose script has not loaded yet: posts are
//! accepted and lost.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;

use liveink_core::error::{LiveInkError, Result};

use crate::transport::{Channel, PeerHandle, Posted};

struct Window {
    tx: broadcast::Sender<Posted>,
    location: Option<String>,
    closed: bool,
}

struct HubInner {
    capacity: usize,
    windows: DashMap<PeerHandle, Window>,
    popups_blocked: AtomicBool,
}

impl HubInner {
    fn new_window(&self, location: Option<String>) -> Window {
        Window {
            tx: broadcast::channel(self.capacity).0,
            location,
            closed: false,
        }
    }
}

#[derive(Clone)]
pub struct LocalHub {
    inner: Arc<HubInner>,
}

impl LocalHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                capacity: capacity.max(1),
                windows: DashMap::new(),
                popups_blocked: AtomicBool::new(false),
            }),
        }
    }

    /// Endpoint living in window `name`, created when missing. A page loading
    /// into a closed window reopens it at the same location.
    pub fn endpoint(&self, name: &str) -> LocalEndpoint {
        let me = PeerHandle::new(name);
        let mut w = self
            .inner
            .windows
            .entry(me.clone())
            .or_insert_with(|| self.inner.new_window(None));
        if w.closed {
            let location = w.location.take();
            *w = self.inner.new_window(location);
        }
        drop(w);
        LocalEndpoint {
            hub: Arc::clone(&self.inner),
            me,
        }
    }

    /// Make every later `open` fail, like a browser popup blocker.
    pub fn block_popups(&self, blocked: bool) {
        self.inner.popups_blocked.store(blocked, Ordering::Relaxed);
    }

    /// Close window `name`; its listeners end and posts to it fail.
    pub fn close(&self, name: &str) {
        if let Some(mut w) = self.inner.windows.get_mut(&PeerHandle::new(name)) {
            w.closed = true;
            // dropping the old sender ends every receiver of the window
            w.tx = broadcast::channel(self.inner.capacity).0;
        }
    }

    /// Location last opened in window `name`.
    pub fn location(&self, name: &str) -> Option<String> {
        self.inner
            .windows
            .get(&PeerHandle::new(name))
            .and_then(|w| w.location.clone())
    }
}

#[derive(Clone)]
pub struct LocalEndpoint {
    hub: Arc<HubInner>,
    me: PeerHandle,
}

impl Channel for LocalEndpoint {
    fn local(&self) -> PeerHandle {
        self.me.clone()
    }

    fn open(&self, target: &str, name: &str, features: &str) -> Result<PeerHandle> {
        if self.hub.popups_blocked.load(Ordering::Relaxed) {
            return Err(LiveInkError::SessionOpenFailed(format!(
                "popup blocked: {target}"
            )));
        }
        if target.trim().is_empty() || name.trim().is_empty() {
            return Err(LiveInkError::SessionOpenFailed(
                "empty target or window name".into(),
            ));
        }

        let handle = PeerHandle::new(name);
        let mut w = self
            .hub
            .windows
            .entry(handle.clone())
            .or_insert_with(|| self.hub.new_window(None));
        if w.closed {
            *w = self.hub.new_window(None);
        }
        w.location = Some(target.to_string());
        drop(w);

        tracing::debug!(from=%self.me, window=%handle, %target, %features, "window opened");
        Ok(handle)
    }

    fn post(&self, to: &PeerHandle, data: String) -> Result<()> {
        let w = self
            .hub
            .windows
            .get(to)
            .ok_or_else(|| LiveInkError::ChannelUnavailable(format!("no window named {to}")))?;
        if w.closed {
            return Err(LiveInkError::ChannelUnavailable(format!("window {to} is closed")));
        }
        let posted = Posted {
            source: self.me.clone(),
            data,
        };
        if w.tx.send(posted).is_err() {
            tracing::trace!(to=%to, "nobody listening, post lost");
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Posted> {
        self.hub
            .windows
            .entry(self.me.clone())
            .or_insert_with(|| self.hub.new_window(None))
            .tx
            .subscribe()
    }
}
