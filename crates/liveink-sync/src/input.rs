//! Host UI events -> session commands.
//!
//! The page integration (page load, keydown listener, context menu, query
//! string checks, help overlay entry) lives here so the session itself only sees
//! `open`, `select`, `dismiss`, `reveal` and `hide`.

use url::Url;

use liveink_core::element::ElementId;
use liveink_core::error::Result;

use crate::config::PresenterSection;
use crate::presentation::Location;
use crate::session::PresenterSession;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(self) -> bool {
        self.shift || self.alt || self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: char,
    pub modifiers: Modifiers,
    /// Some element (input, textarea, ...) has focus.
    pub focused: bool,
}

/// Entries of the speaker-only context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Shown but inert.
    Edit,
    Reveal,
    Hide,
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The presentation finished loading.
    Load,
    KeyDown(KeyPress),
    ContextMenu {
        target: ElementId,
        ctrl: bool,
        x: i32,
        y: i32,
    },
    MenuClick(MenuItem),
    /// Click anywhere outside the menu.
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OpenSession,
    Select(ElementId),
    Reveal,
    Hide,
    Dismiss,
}

pub struct InputAdapter {
    shortcut: char,
    auto_open: bool,
}

impl InputAdapter {
    /// Adapter for the presenter page, or `None` on receiver pages.
    pub fn install(cfg: &PresenterSection, location: &Location) -> Option<Self> {
        if is_receiver(cfg, location) {
            tracing::debug!(query = ?location.query(), "receiver page, notes shortcut not installed");
            return None;
        }
        Some(Self {
            shortcut: cfg.shortcut,
            auto_open: wants_auto_open(cfg, location),
        })
    }

    /// Entry for the presentation's keyboard help overlay.
    pub fn help_entry(&self) -> (String, &'static str) {
        (self.shortcut.to_ascii_uppercase().to_string(), "Speaker notes view")
    }

    pub fn translate(&self, ev: &HostEvent, keyboard_enabled: bool) -> Vec<Command> {
        match *ev {
            HostEvent::Load if self.auto_open => vec![Command::OpenSession],
            HostEvent::Load => Vec::new(),
            HostEvent::KeyDown(k) => {
                if k.focused || k.modifiers.any() || !keyboard_enabled {
                    return Vec::new();
                }
                if k.key.eq_ignore_ascii_case(&self.shortcut) {
                    vec![Command::OpenSession]
                } else {
                    Vec::new()
                }
            }
            // ctrl keeps the native context menu
            HostEvent::ContextMenu { ctrl: true, .. } => Vec::new(),
            HostEvent::ContextMenu { target, x, y, .. } => {
                tracing::trace!(elemid=%target, x, y, "context menu opened");
                vec![Command::Select(target)]
            }
            // the click bubbles to the page afterwards, which closes the menu
            HostEvent::MenuClick(MenuItem::Reveal) => vec![Command::Reveal, Command::Dismiss],
            HostEvent::MenuClick(MenuItem::Hide) => vec![Command::Hide, Command::Dismiss],
            HostEvent::MenuClick(MenuItem::Edit | MenuItem::Dismiss) | HostEvent::Click => {
                vec![Command::Dismiss]
            }
        }
    }

    /// Translate and run against `session`.
    pub fn dispatch(&self, session: &mut PresenterSession, ev: &HostEvent) -> Result<()> {
        let keyboard = session.context().deck().keyboard_enabled();
        for cmd in self.translate(ev, keyboard) {
            match cmd {
                Command::OpenSession => session.open(None)?,
                Command::Select(id) => {
                    if !session.select(id) {
                        tracing::debug!(elemid=%id, "element has no speaker-only menu");
                    }
                }
                Command::Reveal => {
                    session.reveal()?;
                }
                Command::Hide => {
                    session.hide()?;
                }
                Command::Dismiss => session.dismiss(),
            }
        }
        Ok(())
    }
}

/// Page is itself a notes receiver (`?receiver`).
pub fn is_receiver(cfg: &PresenterSection, location: &Location) -> bool {
    location.query().is_some_and(|q| {
        q.to_ascii_lowercase()
            .contains(&cfg.receiver_param.to_ascii_lowercase())
    })
}

/// Page asked for the notes window on load (`?notes` or `&notes`).
pub fn wants_auto_open(cfg: &PresenterSection, location: &Location) -> bool {
    let Some(query) = location.query() else {
        return false;
    };
    let query = query.to_ascii_lowercase();
    let param = cfg.auto_open_param.to_ascii_lowercase();
    query.starts_with(&param) || query.contains(&format!("&{param}"))
}

/// Audience page in the folder the plugin script was loaded from:
/// `.../live.js?v=2` becomes `.../audience.html`.
pub fn default_notes_path(cfg: &PresenterSection, script_src: Option<&str>) -> String {
    let joined = script_src
        .and_then(|src| Url::parse(src).ok())
        .and_then(|src| src.join(&cfg.audience_page).ok());
    match joined {
        Some(url) => url.into(),
        None => cfg.audience_page.clone(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn cfg() -> PresenterSection {
        PresenterSection::default()
    }

    fn loc(url: &str) -> Location {
        Location::parse(url).unwrap()
    }

    fn key(c: char) -> HostEvent {
        HostEvent::KeyDown(KeyPress {
            key: c,
            modifiers: Modifiers::default(),
            focused: false,
        })
    }

    #[test]
    fn shortcut_opens_only_when_unmodified_and_unfocused() {
        let a = InputAdapter::install(&cfg(), &loc("http://h/deck.html")).unwrap();
        assert_eq!(a.translate(&key('s'), true), vec![Command::OpenSession]);
        assert_eq!(a.translate(&key('S'), true), vec![Command::OpenSession]);
        assert!(a.translate(&key('s'), false).is_empty());
        assert!(a.translate(&key('n'), true).is_empty());

        let shifted = HostEvent::KeyDown(KeyPress {
            key: 's',
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::default()
            },
            focused: false,
        });
        assert!(a.translate(&shifted, true).is_empty());

        let focused = HostEvent::KeyDown(KeyPress {
            key: 's',
            modifiers: Modifiers::default(),
            focused: true,
        });
        assert!(a.translate(&focused, true).is_empty());
        assert_eq!(a.help_entry(), ("S".to_string(), "Speaker notes view"));
    }

    #[test]
    fn context_menu_flow() {
        let a = InputAdapter::install(&cfg(), &loc("http://h/deck.html")).unwrap();
        let id = ElementId::new(4);
        let open = HostEvent::ContextMenu {
            target: id,
            ctrl: false,
            x: 10,
            y: 20,
        };
        assert_eq!(a.translate(&open, true), vec![Command::Select(id)]);
        let native = HostEvent::ContextMenu {
            target: id,
            ctrl: true,
            x: 10,
            y: 20,
        };
        assert!(a.translate(&native, true).is_empty());
        assert_eq!(
            a.translate(&HostEvent::MenuClick(MenuItem::Reveal), true),
            vec![Command::Reveal, Command::Dismiss]
        );
        assert_eq!(
            a.translate(&HostEvent::MenuClick(MenuItem::Edit), true),
            vec![Command::Dismiss]
        );
        assert_eq!(a.translate(&HostEvent::Click, true), vec![Command::Dismiss]);
    }

    #[test]
    fn load_opens_only_with_the_notes_parameter() {
        let plain = InputAdapter::install(&cfg(), &loc("http://h/deck.html")).unwrap();
        assert!(plain.translate(&HostEvent::Load, true).is_empty());

        let asked = InputAdapter::install(&cfg(), &loc("http://h/deck.html?theme=x&notes")).unwrap();
        assert_eq!(asked.translate(&HostEvent::Load, true), vec![Command::OpenSession]);
        // keyboard lock does not apply to the page load
        assert_eq!(asked.translate(&HostEvent::Load, false), vec![Command::OpenSession]);
    }

    #[test]
    fn query_string_switches() {
        let c = cfg();
        assert!(InputAdapter::install(&c, &loc("http://h/deck.html?Receiver")).is_none());
        assert!(wants_auto_open(&c, &loc("http://h/deck.html?notes")));
        assert!(wants_auto_open(&c, &loc("http://h/deck.html?x=1&Notes=1")));
        assert!(!wants_auto_open(&c, &loc("http://h/deck.html?footnotes")));
        assert!(!wants_auto_open(&c, &loc("http://h/deck.html#notes")));
    }

    #[test]
    fn notes_path_next_to_script() {
        let c = cfg();
        assert_eq!(
            default_notes_path(&c, Some("https://h/plugin/liveink/live.js?v=3")),
            "https://h/plugin/liveink/audience.html"
        );
        assert_eq!(
            default_notes_path(&c, Some("https://h/plugin/liveink/live.min.js")),
            "https://h/plugin/liveink/audience.html"
        );
        assert_eq!(default_notes_path(&c, Some("plugin/live.js")), "audience.html");
        assert_eq!(default_notes_path(&c, None), "audience.html");
    }
}
