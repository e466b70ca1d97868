//! Presentation engine collaborator.
//!
//! The sync layer never renders slides. It reads the current slide's notes
//! and an opaque position snapshot, and follows the engine's lifecycle
//! events.

pub mod deck;

use std::fmt;

use tokio::sync::mpsc;
use url::Url;

use liveink_core::element::NodeClass;
use liveink_core::protocol::{SlideNotes, Snapshot};

pub use deck::{DeckSlide, ScriptedDeck};

/// Engine events that change what the audience should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    SlideChanged,
    FragmentShown,
    FragmentHidden,
    OverviewShown,
    OverviewHidden,
    Paused,
    Resumed,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 7] = [
        LifecycleEvent::SlideChanged,
        LifecycleEvent::FragmentShown,
        LifecycleEvent::FragmentHidden,
        LifecycleEvent::OverviewShown,
        LifecycleEvent::OverviewHidden,
        LifecycleEvent::Paused,
        LifecycleEvent::Resumed,
    ];

    /// Engine event name.
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleEvent::SlideChanged => "slidechanged",
            LifecycleEvent::FragmentShown => "fragmentshown",
            LifecycleEvent::FragmentHidden => "fragmenthidden",
            LifecycleEvent::OverviewShown => "overviewshown",
            LifecycleEvent::OverviewHidden => "overviewhidden",
            LifecycleEvent::Paused => "paused",
            LifecycleEvent::Resumed => "resumed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlidePosition {
    pub h: u32,
    pub v: u32,
    pub f: Option<u32>,
}

/// Current slide as the sync layer sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub position: SlidePosition,
    pub notes: SlideNotes,
}

/// What a lifecycle event changed, captured when the engine emitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleUpdate {
    pub event: LifecycleEvent,
    pub slide: Slide,
    pub snapshot: Snapshot,
}

/// Absolute page location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// `None` unless `url` is absolute.
    pub fn parse(url: &str) -> Option<Self> {
        Url::parse(url).ok().map(|url| Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Query string without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    /// URL announced in `connect`: everything but the fragment.
    pub fn connect_url(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.into()
    }
}

pub trait Presentation: Send + Sync {
    fn current_slide(&self) -> Slide;

    /// Opaque position snapshot (engine defined).
    fn snapshot(&self) -> Snapshot;

    /// Every event emitted after this call, in order, none dropped.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<LifecycleUpdate>;

    fn location(&self) -> Location;

    /// Classes of every document node, in document order.
    fn nodes(&self) -> Vec<NodeClass>;

    /// Where the plugin script was loaded from, if known.
    fn script_src(&self) -> Option<String> {
        None
    }

    fn keyboard_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn connect_url_drops_fragment_only() {
        let loc = Location::parse("https://talks.example.org:8443/deck/index.html?notes&x=1#/3/0").unwrap();
        assert_eq!(loc.url().host_str(), Some("talks.example.org"));
        assert_eq!(loc.url().port(), Some(8443));
        assert_eq!(loc.query(), Some("notes&x=1"));
        assert_eq!(loc.fragment(), Some("/3/0"));
        assert_eq!(
            loc.connect_url(),
            "https://talks.example.org:8443/deck/index.html?notes&x=1"
        );
    }

    #[test]
    fn bare_host_gets_root_path() {
        let loc = Location::parse("http://localhost:8000").unwrap();
        assert_eq!(loc.connect_url(), "http://localhost:8000/");
        assert!(Location::parse("index.html").is_none());
    }

    #[test]
    fn event_names_round_trip() {
        for e in LifecycleEvent::ALL {
            assert_eq!(LifecycleEvent::from_name(e.as_str()), Some(e));
        }
        assert_eq!(LifecycleEvent::from_name("ready"), None);
    }
}
