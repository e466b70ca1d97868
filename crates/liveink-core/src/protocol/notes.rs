//! Speaker notes sources of a slide and their precedence.

use serde::{Deserialize, Serialize};

/// Rendering hint for the notes body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Whitespace {
    #[default]
    Normal,
    PreWrap,
}

/// Embedded notes block (`<aside class="notes">`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesBlock {
    /// Inner HTML (or markdown source) of the block.
    pub body: String,
    /// Block declares `data-markdown`.
    pub markdown: bool,
}

/// Both notes sources a slide may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideNotes {
    /// `data-notes` attribute on the slide element.
    pub attribute: Option<String>,
    pub block: Option<NotesBlock>,
}

/// Notes body and flags after applying precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNotes {
    pub notes: String,
    pub markdown: bool,
    pub whitespace: Whitespace,
}

impl SlideNotes {
    pub fn from_attribute(text: impl Into<String>) -> Self {
        Self {
            attribute: Some(text.into()),
            block: None,
        }
    }

    pub fn from_block(body: impl Into<String>, markdown: bool) -> Self {
        Self {
            attribute: None,
            block: Some(NotesBlock {
                body: body.into(),
                markdown,
            }),
        }
    }

    /// Exactly one source wins: the attribute, then the block, then nothing.
    pub fn resolve(&self) -> ResolvedNotes {
        if let Some(text) = &self.attribute {
            return ResolvedNotes {
                notes: text.clone(),
                markdown: false,
                whitespace: Whitespace::PreWrap,
            };
        }
        if let Some(block) = &self.block {
            return ResolvedNotes {
                notes: block.body.clone(),
                markdown: block.markdown,
                whitespace: Whitespace::Normal,
            };
        }
        ResolvedNotes {
            notes: String::new(),
            markdown: false,
            whitespace: Whitespace::Normal,
        }
    }
}
