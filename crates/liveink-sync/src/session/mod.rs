//! Presenter session: one audience window, one handshake task.
//!
//! A session is an explicit object owned by the caller. It holds the handle
//! to the audience window, the context-menu selection and the task that runs
//! the connect loop and, once connected, the state replication. Opening again
//! aborts the previous task first, so at most one connect loop exists per
//! session.

pub mod handshake;
pub mod relay;
pub mod replicator;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use liveink_core::element::{ElementId, ElementRegistry};
use liveink_core::error::{LiveInkError, Result};
use liveink_core::protocol::{ElementAction, Envelope};

use crate::context::SyncContext;
use crate::input::default_notes_path;
use crate::transport::{post_envelope, PeerHandle};

pub use handshake::{Handshake, LinkState, Step};
pub use relay::ActionRelay;
pub use replicator::StateReplicator;

/// What the presenter knows about its link to the audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub link: LinkState,
    /// False after a post found the audience window gone.
    pub peer_reachable: bool,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            link: LinkState::Disconnected,
            peer_reachable: true,
        }
    }
}

/// Track reachability from the outcome of one post.
pub(crate) fn report_delivery(status: &watch::Sender<SessionStatus>, res: &Result<()>) {
    let reachable = match res {
        Ok(()) => true,
        Err(LiveInkError::ChannelUnavailable(_)) => false,
        Err(_) => return,
    };
    status.send_if_modified(|s| {
        if s.peer_reachable == reachable {
            return false;
        }
        s.peer_reachable = reachable;
        if reachable {
            tracing::info!("audience window reachable again");
        } else {
            tracing::warn!("audience window unreachable");
        }
        true
    });
}

pub struct PresenterSession {
    ctx: SyncContext,
    peer: Option<PeerHandle>,
    status: Arc<watch::Sender<SessionStatus>>,
    task: Option<JoinHandle<()>>,
    /// Present once speaker-only affordances are enabled.
    relay: Option<ActionRelay>,
}

impl PresenterSession {
    pub fn new(ctx: SyncContext) -> Self {
        Self {
            ctx,
            peer: None,
            status: Arc::new(watch::channel(SessionStatus::default()).0),
            task: None,
            relay: None,
        }
    }

    /// Open (or re-target) the audience window and start the handshake.
    ///
    /// Without a target the default audience page next to the plugin script
    /// is used and speaker-only affordances are enabled: element ids are
    /// assigned once for this session. Must be called inside a Tokio runtime.
    pub fn open(&mut self, target: Option<&str>) -> Result<()> {
        self.cancel();
        self.peer = None;

        let target = match target {
            Some(t) => t.to_string(),
            None => {
                if self.relay.is_none() {
                    let registry = ElementRegistry::assign(self.ctx.deck().nodes());
                    tracing::debug!(
                        elements = registry.len(),
                        speaker_only = registry.menu_targets().len(),
                        "element ids assigned"
                    );
                    self.relay = Some(ActionRelay::new(registry));
                }
                default_notes_path(&self.ctx.cfg().presenter, self.ctx.deck().script_src().as_deref())
            }
        };

        let presenter = &self.ctx.cfg().presenter;
        let peer = match self
            .ctx
            .channel()
            .open(&target, &presenter.window_name, &presenter.window_features)
        {
            Ok(peer) => peer,
            Err(e) => {
                tracing::warn!(%target, code = e.code().as_str(), error=%e, "audience window not opened");
                self.status.send_replace(SessionStatus::default());
                return Err(e);
            }
        };

        self.status.send_replace(SessionStatus {
            link: LinkState::Connecting,
            peer_reachable: true,
        });

        let span = tracing::info_span!("notes_session", window=%peer, target=%target);
        let task = tokio::spawn(
            run_link(self.ctx.clone(), peer.clone(), Arc::clone(&self.status)).instrument(span),
        );
        self.task = Some(task);
        self.peer = Some(peer);
        Ok(())
    }

    /// Stop the connect loop or the replication and forget the window. The
    /// window itself stays open.
    pub fn close(&mut self) {
        tracing::debug!(link = self.link_state().as_str(), "closing notes session");
        self.cancel();
        self.peer = None;
        self.status.send_replace(SessionStatus::default());
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("previous session task cancelled");
        }
    }

    pub fn context(&self) -> &SyncContext {
        &self.ctx
    }

    pub fn status(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn link_state(&self) -> LinkState {
        self.status.borrow().link
    }

    /// Resolves once the handshake settles: true when the audience
    /// acknowledged, false when the link is or falls back to disconnected.
    pub async fn connected(&self) -> bool {
        let mut rx = self.status.subscribe();
        let settled = rx
            .wait_for(|s| s.link != LinkState::Connecting)
            .await
            .map(|s| s.link == LinkState::Connected);
        settled.unwrap_or(false)
    }

    pub fn peer(&self) -> Option<&PeerHandle> {
        self.peer.as_ref()
    }

    pub fn relay(&self) -> Option<&ActionRelay> {
        self.relay.as_ref()
    }

    /// Context menu opened on `id` (ignored when `id` carries no menu).
    pub fn select(&mut self, id: ElementId) -> bool {
        self.relay.as_mut().is_some_and(|r| r.select(id))
    }

    /// Any click: the menu closes and the selection is cleared.
    pub fn dismiss(&mut self) {
        if let Some(r) = self.relay.as_mut() {
            r.dismiss();
        }
    }

    /// Reveal the selected element to the audience. `Ok(None)` if nothing
    /// was selected; no envelope is sent then.
    pub fn reveal(&mut self) -> Result<Option<ElementId>> {
        self.relay_action(ElementAction::RevealElement)
    }

    /// Hide the selected element from the audience again.
    pub fn hide(&mut self) -> Result<Option<ElementId>> {
        self.relay_action(ElementAction::HideElement)
    }

    fn relay_action(&mut self, action: ElementAction) -> Result<Option<ElementId>> {
        let Some(relay) = self.relay.as_mut() else {
            return Ok(None);
        };
        let Some(id) = relay.apply(action)? else {
            tracing::trace!(action = action.as_str(), "no element selected");
            return Ok(None);
        };
        let Some(peer) = self.peer.as_ref() else {
            tracing::debug!(elemid=%id, "no audience window, action kept local");
            return Ok(Some(id));
        };
        if self.link_state() == LinkState::Disconnected {
            tracing::debug!(elemid=%id, "link down, action kept local");
            return Ok(Some(id));
        }

        let env = Envelope::action(id, action, self.ctx.deck().snapshot());
        let res = post_envelope(self.ctx.channel(), peer, &env, self.ctx.metrics());
        report_delivery(&self.status, &res);
        res?;
        tracing::info!(elemid=%id, action = action.as_str(), "element action relayed");
        Ok(Some(id))
    }
}

impl Drop for PresenterSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_link(ctx: SyncContext, peer: PeerHandle, status: Arc<watch::Sender<SessionStatus>>) {
    if !handshake::connect(&ctx, &peer, &status).await {
        status.send_modify(|s| s.link = LinkState::Disconnected);
        return;
    }

    let first = status.send_if_modified(|s| {
        if s.link == LinkState::Connected {
            return false;
        }
        s.link = LinkState::Connected;
        true
    });
    if !first {
        return;
    }

    StateReplicator::new(ctx, peer, status).follow().await;
}
