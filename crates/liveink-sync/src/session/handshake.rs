//! Presenter side of the connect handshake.
//!
//! Handshake process:
//! 1. The presenter posts `connect` (its URL and snapshot) to the audience
//!    window every retry interval. The audience script may not be listening
//!    yet and there is no readiness signal across processes, so early posts
//!    are expected to be lost.
//! 2. The audience answers `connected` once it is listening.
//! 3. The first `connected` stops the retry timer; from then on the
//!    replicator owns the link.

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use liveink_core::protocol::Envelope;

use crate::context::SyncContext;
use crate::session::{report_delivery, SessionStatus};
use crate::transport::{classify, post_envelope, Inbound, PeerHandle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connecting,
    /// Terminal for the session; loss of the audience is not detected.
    Connected,
}

impl LinkState {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkState::Disconnected => "disconnected",
            LinkState::Connecting => "connecting",
            LinkState::Connected => "connected",
        }
    }
}

/// Outcome of feeding one envelope to the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Ignore,
    /// First acknowledgement: run the connected side effects now.
    Connected,
}

/// Pure handshake state machine (no timers, no I/O).
#[derive(Debug, Default)]
pub struct Handshake {
    state: LinkState,
}

impl Handshake {
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// `Disconnected -> Connecting`. False if already past that.
    pub fn begin(&mut self) -> bool {
        if self.state != LinkState::Disconnected {
            return false;
        }
        self.state = LinkState::Connecting;
        true
    }

    pub fn on_envelope(&mut self, env: &Envelope) -> Step {
        match (self.state, env) {
            (LinkState::Connecting, Envelope::Connected) => {
                self.state = LinkState::Connected;
                Step::Connected
            }
            _ => Step::Ignore,
        }
    }
}

/// Run the retrying connect loop until the audience acknowledges.
///
/// Returns false if the presenter's own channel went away first. The loop is
/// cancelled by aborting the task that runs it.
pub(crate) async fn connect(
    ctx: &SyncContext,
    peer: &PeerHandle,
    status: &watch::Sender<SessionStatus>,
) -> bool {
    let mut hs = Handshake::default();
    hs.begin();

    // subscribe before the first post so no reply can slip past
    let mut inbound = ctx.channel().subscribe();

    let period = ctx.cfg().presenter.retry_interval();
    let mut retry = time::interval_at(Instant::now() + period, period);
    retry.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut attempts: u64 = 0;

    loop {
        tokio::select! {
            incoming = inbound.recv() => {
                match incoming {
                    Ok(posted) => {
                        let Inbound::Envelope(env) = classify(&posted, ctx.metrics()) else {
                            continue;
                        };
                        if hs.on_envelope(&env) == Step::Connected {
                            tracing::info!(source=%posted.source, attempts, "audience connected");
                            return true;
                        }
                        tracing::trace!(kind = env.kind(), "ignored while connecting");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "inbound lagged while connecting");
                    }
                    Err(RecvError::Closed) => {
                        tracing::warn!("presenter channel closed before audience connected");
                        return false;
                    }
                }
            }

            _ = retry.tick() => {
                attempts += 1;
                ctx.metrics().connect_attempts.inc(&[]);
                let deck = ctx.deck();
                let env = Envelope::connect(deck.location().connect_url(), deck.snapshot());
                let res = post_envelope(ctx.channel(), peer, &env, ctx.metrics());
                report_delivery(status, &res);
                tracing::debug!(attempts, ok = res.is_ok(), "connect posted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use liveink_core::protocol::Snapshot;

    use super::*;

    #[test]
    fn connected_is_reported_once() {
        let mut hs = Handshake::default();
        assert_eq!(hs.on_envelope(&Envelope::Connected), Step::Ignore);
        assert!(hs.begin());
        assert!(!hs.begin());
        assert_eq!(hs.state(), LinkState::Connecting);

        assert_eq!(hs.on_envelope(&Envelope::Connected), Step::Connected);
        for _ in 0..3 {
            assert_eq!(hs.on_envelope(&Envelope::Connected), Step::Ignore);
        }
        assert_eq!(hs.state(), LinkState::Connected);
        assert!(!hs.begin());
    }

    #[test]
    fn other_envelopes_do_not_connect() {
        let mut hs = Handshake::default();
        hs.begin();
        let echo = Envelope::connect("http://x/", Snapshot::default());
        assert_eq!(hs.on_envelope(&echo), Step::Ignore);
        assert_eq!(hs.state(), LinkState::Connecting);
    }
}
