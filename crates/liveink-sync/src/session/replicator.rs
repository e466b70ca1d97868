//! Pushes full-state snapshots to the audience.
//!
//! One `state` envelope per lifecycle event, in emit order, carrying the
//! state captured when the event fired, plus one right after connecting.
//! Nothing is batched or coalesced.

use std::sync::Arc;

use tokio::sync::watch;

use liveink_core::error::Result;
use liveink_core::protocol::{Envelope, Snapshot};

use crate::context::SyncContext;
use crate::presentation::{LifecycleUpdate, Slide};
use crate::session::{report_delivery, SessionStatus};
use crate::transport::{post_envelope, PeerHandle};

pub struct StateReplicator {
    ctx: SyncContext,
    peer: PeerHandle,
    status: Arc<watch::Sender<SessionStatus>>,
}

impl StateReplicator {
    pub fn new(ctx: SyncContext, peer: PeerHandle, status: Arc<watch::Sender<SessionStatus>>) -> Self {
        Self { ctx, peer, status }
    }

    /// Read the engine's current state and post it.
    pub fn push(&self, cause: &str) -> Result<()> {
        let deck = self.ctx.deck();
        self.send(cause, &deck.current_slide(), deck.snapshot())
    }

    /// Post the state an event captured when it fired.
    pub fn push_update(&self, update: &LifecycleUpdate) -> Result<()> {
        self.send(update.event.as_str(), &update.slide, update.snapshot.clone())
    }

    fn send(&self, cause: &str, slide: &Slide, snapshot: Snapshot) -> Result<()> {
        let env = Envelope::state(&slide.notes, snapshot);
        let res = post_envelope(self.ctx.channel(), &self.peer, &env, self.ctx.metrics());
        report_delivery(&self.status, &res);
        match &res {
            Ok(()) => tracing::debug!(cause, h = slide.position.h, v = slide.position.v, "state pushed"),
            Err(e) => tracing::warn!(cause, error=%e, "state push failed"),
        }
        res
    }

    /// Subscribe to lifecycle events, push the initial state, then follow the
    /// engine until its event source ends.
    pub async fn follow(self) {
        let mut events = self.ctx.deck().subscribe();
        let _ = self.push("connected");

        while let Some(update) = events.recv().await {
            let _ = self.push_update(&update);
        }
        tracing::debug!("presentation event source closed");
    }
}
