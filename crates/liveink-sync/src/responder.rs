//! Audience side of the handshake.
//!
//! Answers every `connect` with one `connected` addressed to the post's
//! source, then mirrors `state` and applies `action` messages. Actions are
//! keyed by element id only, so their order relative to `state` messages
//! does not matter.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use liveink_core::element::{ElementId, Visibility};
use liveink_core::error::Result;
use liveink_core::protocol::{ElementAction, Envelope, Snapshot, Whitespace};

use crate::obs::SyncMetrics;
use crate::transport::{classify, listen, post_envelope, Channel, Inbound, PeerHandle, Posted};

/// What the audience window currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudienceView {
    /// Presentation the audience loaded (from `connect`).
    pub url: Option<String>,
    pub presenter: Option<PeerHandle>,
    pub position: Option<Snapshot>,
    pub notes: String,
    pub markdown: bool,
    pub whitespace: Whitespace,
    /// Elements touched by an action.
    pub elements: HashMap<ElementId, Visibility>,
    pub connects: u64,
    pub states: u64,
}

pub struct AudienceResponder {
    channel: Arc<dyn Channel>,
    metrics: Arc<SyncMetrics>,
    view: watch::Sender<AudienceView>,
}

impl AudienceResponder {
    pub fn new(channel: Arc<dyn Channel>, metrics: Arc<SyncMetrics>) -> Self {
        Self {
            channel,
            metrics,
            view: watch::channel(AudienceView::default()).0,
        }
    }

    pub fn view(&self) -> watch::Receiver<AudienceView> {
        self.view.subscribe()
    }

    /// Handle one inbound post.
    pub fn handle(&self, posted: &Posted) -> Result<()> {
        let Inbound::Envelope(env) = classify(posted, &self.metrics) else {
            return Ok(());
        };

        match env {
            Envelope::Connect(c) => {
                self.view.send_modify(|v| {
                    v.url = Some(c.url.clone());
                    v.presenter = Some(posted.source.clone());
                    v.position = Some(c.state.clone());
                    v.connects += 1;
                });
                tracing::debug!(source=%posted.source, url=%c.url, "connect received, acknowledging");
                post_envelope(
                    self.channel.as_ref(),
                    &posted.source,
                    &Envelope::Connected,
                    &self.metrics,
                )
            }
            Envelope::State(s) => {
                self.view.send_modify(|v| {
                    v.position = Some(s.state);
                    v.notes = s.notes;
                    v.markdown = s.markdown;
                    v.whitespace = s.whitespace;
                    v.states += 1;
                });
                Ok(())
            }
            Envelope::Action(a) => {
                let vis = match a.action {
                    ElementAction::RevealElement => Visibility::Shown,
                    ElementAction::HideElement => Visibility::SpeakerOnly,
                };
                self.view.send_modify(|v| {
                    v.elements.insert(a.elemid, vis);
                });
                tracing::debug!(elemid=%a.elemid, action = a.action.as_str(), "element action applied");
                Ok(())
            }
            Envelope::Connected => {
                tracing::trace!(source=%posted.source, "unexpected connected ignored");
                Ok(())
            }
        }
    }

    /// Start listening on the audience channel.
    pub fn spawn(self) -> JoinHandle<()> {
        let channel = Arc::clone(&self.channel);
        listen(channel.as_ref(), move |posted| self.handle(&posted))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use liveink_core::protocol::{encode, SlideNotes};

    use super::*;
    use crate::transport::LocalHub;

    fn posted(from: &str, env: &Envelope) -> Posted {
        Posted {
            source: PeerHandle::new(from),
            data: encode(env).unwrap(),
        }
    }

    #[tokio::test]
    async fn every_connect_gets_one_reply() {
        let hub = LocalHub::new(16);
        let presenter = hub.endpoint("presenter");
        let mut replies = presenter.subscribe();
        let responder = AudienceResponder::new(Arc::new(hub.endpoint("audience")), Arc::default());

        let connect = Envelope::connect("http://h/deck.html", Snapshot::new(json!({"indexh": 1})));
        responder.handle(&posted("presenter", &connect)).unwrap();
        responder.handle(&posted("presenter", &connect)).unwrap();

        for _ in 0..2 {
            let p = replies.recv().await.unwrap();
            assert_eq!(liveink_core::protocol::decode(&p.data).unwrap(), Envelope::Connected);
        }
        assert!(replies.try_recv().is_err());

        let view = responder.view().borrow().clone();
        assert_eq!(view.url.as_deref(), Some("http://h/deck.html"));
        assert_eq!(view.connects, 2);
        assert_eq!(view.position.unwrap().as_value()["indexh"], 1);
    }

    #[test]
    fn action_applies_regardless_of_state_order() {
        let hub = LocalHub::new(16);
        let responder = AudienceResponder::new(Arc::new(hub.endpoint("audience")), Arc::default());
        let id = ElementId::new(42);

        let reveal = Envelope::action(id, ElementAction::RevealElement, Snapshot::new(json!({"indexh": 4})));
        let older = Envelope::state(&SlideNotes::default(), Snapshot::new(json!({"indexh": 3})));
        responder.handle(&posted("presenter", &reveal)).unwrap();
        responder.handle(&posted("presenter", &older)).unwrap();

        let view = responder.view().borrow().clone();
        assert_eq!(view.elements.get(&id), Some(&Visibility::Shown));
        assert_eq!(view.position.unwrap().as_value()["indexh"], 3);
    }

    #[test]
    fn foreign_traffic_is_ignored() {
        let hub = LocalHub::new(16);
        let metrics = Arc::new(SyncMetrics::default());
        let responder = AudienceResponder::new(Arc::new(hub.endpoint("audience")), Arc::clone(&metrics));
        let p = Posted {
            source: PeerHandle::new("presenter"),
            data: r#"{"namespace":"reveal-menu","type":"open"}"#.into(),
        };
        responder.handle(&p).unwrap();
        assert_eq!(responder.view().borrow().connects, 0);
        assert_eq!(metrics.decode_drops.get(&[("reason", "FOREIGN_NAMESPACE")]), 1);
    }
}
