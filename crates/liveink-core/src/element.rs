//! Stable element identifiers and speaker-only visibility.
//!
//! Every node of the presenter document gets a dense, zero-based id in
//! document order when the session enables its speaker-only affordances. The
//! id set never changes afterwards; only the visibility of each node does.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LiveInkError, Result};

/// Stable per-element identifier (`data-id`). On the wire it is a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ElementId(u32);

impl ElementId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    /// Id of the node at document position `i`; `None` past the id space.
    pub fn from_position(i: usize) -> Option<Self> {
        u32::try_from(i).ok().map(Self)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ElementId> for String {
    fn from(id: ElementId) -> Self {
        id.0.to_string()
    }
}

impl TryFrom<String> for ElementId {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse::<u32>()
            .map(ElementId)
            .map_err(|e| format!("elemid {s:?} is not an element index: {e}"))
    }
}

/// Class of a document node as seen at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Content,
    /// Withheld from the audience until revealed (`.speaker-only`).
    SpeakerOnly,
}

/// Local visibility classification of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    SpeakerOnly,
}

/// Id assignment plus local visibility for one session.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    visibility: Vec<Visibility>,
    /// Elements that were speaker-only at start; they carry the context menu.
    menu_targets: Vec<ElementId>,
}

impl ElementRegistry {
    /// Assign ids in document order. Nodes past the id space get no id.
    pub fn assign<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = NodeClass>,
    {
        let mut visibility = Vec::new();
        let mut menu_targets = Vec::new();
        for (i, class) in nodes.into_iter().enumerate() {
            let Some(id) = ElementId::from_position(i) else {
                break;
            };
            match class {
                NodeClass::Content => visibility.push(Visibility::Shown),
                NodeClass::SpeakerOnly => {
                    visibility.push(Visibility::SpeakerOnly);
                    menu_targets.push(id);
                }
            }
        }
        Self {
            visibility,
            menu_targets,
        }
    }

    pub fn len(&self) -> usize {
        self.visibility.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visibility.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        (id.0 as usize) < self.visibility.len()
    }

    pub fn visibility(&self, id: ElementId) -> Option<Visibility> {
        self.visibility.get(id.0 as usize).copied()
    }

    pub fn is_menu_target(&self, id: ElementId) -> bool {
        self.menu_targets.binary_search(&id).is_ok()
    }

    pub fn menu_targets(&self) -> &[ElementId] {
        &self.menu_targets
    }

    /// Drop the speaker-only marking. Idempotent.
    pub fn reveal(&mut self, id: ElementId) -> Result<()> {
        self.set(id, Visibility::Shown)
    }

    /// Add the speaker-only marking. Idempotent.
    pub fn hide(&mut self, id: ElementId) -> Result<()> {
        self.set(id, Visibility::SpeakerOnly)
    }

    fn set(&mut self, id: ElementId, v: Visibility) -> Result<()> {
        let slot = self
            .visibility
            .get_mut(id.0 as usize)
            .ok_or(LiveInkError::UnknownElement(id.0))?;
        *slot = v;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn positions_past_u32_get_no_id() {
        assert_eq!(ElementId::from_position(7), Some(ElementId::new(7)));
        let last = usize::try_from(u32::MAX).unwrap();
        assert_eq!(ElementId::from_position(last), Some(ElementId::new(u32::MAX)));
        if let Some(past) = last.checked_add(1) {
            assert_eq!(ElementId::from_position(past), None);
        }
    }

    fn doc() -> ElementRegistry {
        ElementRegistry::assign([
            NodeClass::Content,
            NodeClass::SpeakerOnly,
            NodeClass::Content,
            NodeClass::SpeakerOnly,
        ])
    }

    #[test]
    fn ids_are_dense_in_document_order() {
        let reg = doc();
        assert_eq!(reg.len(), 4);
        assert!(reg.contains(ElementId::new(3)));
        assert!(!reg.contains(ElementId::new(4)));
        assert_eq!(reg.menu_targets(), &[ElementId::new(1), ElementId::new(3)]);
    }

    #[test]
    fn reveal_and_hide_are_idempotent() {
        let mut reg = doc();
        let id = ElementId::new(1);
        reg.reveal(id).unwrap();
        reg.reveal(id).unwrap();
        assert_eq!(reg.visibility(id), Some(Visibility::Shown));
        reg.hide(id).unwrap();
        reg.hide(id).unwrap();
        assert_eq!(reg.visibility(id), Some(Visibility::SpeakerOnly));
        // menu targets are fixed at assignment
        assert!(reg.is_menu_target(id));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let mut reg = doc();
        let err = reg.reveal(ElementId::new(9)).unwrap_err();
        assert_eq!(err.code().as_str(), "UNKNOWN_ELEMENT");
    }

    #[test]
    fn wire_form_is_decimal_string() {
        let s = serde_json::to_string(&ElementId::new(42)).unwrap();
        assert_eq!(s, "\"42\"");
        let id: ElementId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(id.index(), 7);
        assert!(serde_json::from_str::<ElementId>("\"x1\"").is_err());
    }
}
