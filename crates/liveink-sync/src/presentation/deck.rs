//! Scripted in-memory deck.
//!
//! Drives the sync layer without a browser: navigation methods update the
//! position and emit the same lifecycle events a real engine would.

use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::mpsc;

use liveink_core::element::NodeClass;
use liveink_core::protocol::{SlideNotes, Snapshot};

use crate::presentation::{
    LifecycleEvent, LifecycleUpdate, Location, Presentation, Slide, SlidePosition,
};

/// One horizontal slide.
#[derive(Debug, Clone, Default)]
pub struct DeckSlide {
    pub notes: SlideNotes,
    pub fragments: u32,
}

#[derive(Debug, Default)]
struct Cursor {
    h: u32,
    /// Index of the last shown fragment.
    f: Option<u32>,
    paused: bool,
    overview: bool,
}

pub struct ScriptedDeck {
    slides: Vec<DeckSlide>,
    nodes: Vec<NodeClass>,
    location: Location,
    script_src: Option<String>,
    keyboard: bool,
    cursor: Mutex<Cursor>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<LifecycleUpdate>>>,
}

impl ScriptedDeck {
    pub fn new(slides: Vec<DeckSlide>, location: Location) -> Self {
        Self {
            slides,
            nodes: Vec::new(),
            location,
            script_src: None,
            keyboard: true,
            cursor: Mutex::new(Cursor::default()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<NodeClass>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_script_src(mut self, src: impl Into<String>) -> Self {
        self.script_src = Some(src.into());
        self
    }

    pub fn with_keyboard(mut self, enabled: bool) -> Self {
        self.keyboard = enabled;
        self
    }

    /// Jump to horizontal slide `h` (clamped to the deck).
    pub fn goto(&self, h: u32) {
        let mut c = self.cursor.lock();
        let last = u32::try_from(self.slides.len().saturating_sub(1)).unwrap_or(u32::MAX);
        c.h = h.min(last);
        c.f = None;
        self.emit(&c, LifecycleEvent::SlideChanged);
    }

    /// Show the next fragment of the current slide; false when none is left.
    pub fn next_fragment(&self) -> bool {
        let mut c = self.cursor.lock();
        let total = self.slides.get(c.h as usize).map_or(0, |s| s.fragments);
        let next = c.f.map_or(0, |f| f + 1);
        if next >= total {
            return false;
        }
        c.f = Some(next);
        self.emit(&c, LifecycleEvent::FragmentShown);
        true
    }

    /// Hide the last shown fragment; false when none is shown.
    pub fn prev_fragment(&self) -> bool {
        let mut c = self.cursor.lock();
        let Some(f) = c.f else {
            return false;
        };
        c.f = f.checked_sub(1);
        self.emit(&c, LifecycleEvent::FragmentHidden);
        true
    }

    pub fn set_overview(&self, shown: bool) {
        let mut c = self.cursor.lock();
        c.overview = shown;
        self.emit(&c, if shown {
            LifecycleEvent::OverviewShown
        } else {
            LifecycleEvent::OverviewHidden
        });
    }

    pub fn set_paused(&self, paused: bool) {
        let mut c = self.cursor.lock();
        c.paused = paused;
        self.emit(&c, if paused {
            LifecycleEvent::Paused
        } else {
            LifecycleEvent::Resumed
        });
    }

    /// Called with the cursor still locked so updates leave in mutation order.
    fn emit(&self, c: &Cursor, event: LifecycleEvent) {
        let update = LifecycleUpdate {
            event,
            slide: self.slide_at(c),
            snapshot: snapshot_at(c),
        };
        self.subscribers
            .lock()
            .retain(|tx| tx.send(update.clone()).is_ok());
    }

    fn slide_at(&self, c: &Cursor) -> Slide {
        Slide {
            position: SlidePosition {
                h: c.h,
                v: 0,
                f: c.f,
            },
            notes: self
                .slides
                .get(c.h as usize)
                .map(|s| s.notes.clone())
                .unwrap_or_default(),
        }
    }
}

fn snapshot_at(c: &Cursor) -> Snapshot {
    let indexf = c.f.map_or(-1, i64::from);
    Snapshot::new(json!({
        "indexh": c.h,
        "indexv": 0,
        "indexf": indexf,
        "paused": c.paused,
        "overview": c.overview,
    }))
}

impl Presentation for ScriptedDeck {
    fn current_slide(&self) -> Slide {
        self.slide_at(&self.cursor.lock())
    }

    fn snapshot(&self) -> Snapshot {
        snapshot_at(&self.cursor.lock())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<LifecycleUpdate> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }

    fn location(&self) -> Location {
        self.location.clone()
    }

    fn nodes(&self) -> Vec<NodeClass> {
        self.nodes.clone()
    }

    fn script_src(&self) -> Option<String> {
        self.script_src.clone()
    }

    fn keyboard_enabled(&self) -> bool {
        self.keyboard
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn deck() -> ScriptedDeck {
        let slides = vec![
            DeckSlide::default(),
            DeckSlide {
                notes: SlideNotes::from_attribute("two"),
                fragments: 2,
            },
        ];
        ScriptedDeck::new(slides, Location::parse("http://localhost/deck.html").unwrap())
    }

    #[test]
    fn navigation_emits_events_in_order() {
        let d = deck();
        let mut rx = d.subscribe();
        d.goto(1);
        assert!(d.next_fragment());
        assert!(d.next_fragment());
        assert!(!d.next_fragment());
        assert!(d.prev_fragment());
        d.set_paused(true);

        let mut seen = Vec::new();
        while let Ok(u) = rx.try_recv() {
            seen.push(u.event);
        }
        assert_eq!(
            seen,
            vec![
                LifecycleEvent::SlideChanged,
                LifecycleEvent::FragmentShown,
                LifecycleEvent::FragmentShown,
                LifecycleEvent::FragmentHidden,
                LifecycleEvent::Paused,
            ]
        );
        assert_eq!(d.snapshot().as_value()["indexf"], 0);
        assert_eq!(d.snapshot().as_value()["paused"], true);
    }

    #[test]
    fn updates_carry_the_state_at_emit_time() {
        let d = deck();
        let mut rx = d.subscribe();
        d.goto(1);
        assert!(d.next_fragment());
        d.goto(0);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.slide.position.h, 1);
        assert_eq!(first.slide.notes, SlideNotes::from_attribute("two"));
        assert_eq!(first.snapshot.as_value()["indexf"], -1);
        let second = rx.try_recv().unwrap();
        assert_eq!(second.snapshot.as_value()["indexf"], 0);
        let third = rx.try_recv().unwrap();
        assert_eq!(third.snapshot.as_value()["indexh"], 0);
    }

    #[test]
    fn burst_of_events_is_never_dropped() {
        let d = deck();
        let mut rx = d.subscribe();
        for i in 0..500 {
            d.goto(i % 2);
        }
        let mut n = 0;
        while let Ok(u) = rx.try_recv() {
            assert_eq!(u.slide.position.h, n % 2);
            n += 1;
        }
        assert_eq!(n, 500);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let d = deck();
        drop(d.subscribe());
        let mut live = d.subscribe();
        d.set_paused(true);
        assert_eq!(d.subscribers.lock().len(), 1);
        assert_eq!(live.try_recv().unwrap().event, LifecycleEvent::Paused);
    }

    #[test]
    fn goto_is_clamped() {
        let d = deck();
        d.goto(9);
        assert_eq!(d.current_slide().position.h, 1);
        assert_eq!(d.current_slide().notes, SlideNotes::from_attribute("two"));
    }
}
