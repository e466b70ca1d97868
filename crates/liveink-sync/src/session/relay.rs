//! Context-menu selection and reveal/hide of speaker-only elements.

use liveink_core::element::{ElementId, ElementRegistry};
use liveink_core::error::Result;
use liveink_core::protocol::ElementAction;

#[derive(Debug, Default)]
pub struct ActionRelay {
    registry: ElementRegistry,
    selected: Option<ElementId>,
}

impl ActionRelay {
    pub fn new(registry: ElementRegistry) -> Self {
        Self {
            registry,
            selected: None,
        }
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// Context menu opened on `id`. Only elements that were speaker-only at
    /// session start carry the menu.
    pub fn select(&mut self, id: ElementId) -> bool {
        if !self.registry.is_menu_target(id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    /// Consume the selection and update its local visibility. `None` when
    /// nothing was selected.
    pub fn apply(&mut self, action: ElementAction) -> Result<Option<ElementId>> {
        let Some(id) = self.selected.take() else {
            return Ok(None);
        };
        match action {
            ElementAction::RevealElement => self.registry.reveal(id)?,
            ElementAction::HideElement => self.registry.hide(id)?,
        }
        Ok(Some(id))
    }
}
