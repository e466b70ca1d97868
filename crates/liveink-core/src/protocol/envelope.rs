//! Notes envelope (JSON text).
//!
//! Decoding runs in two steps: the text is parsed into a generic JSON object
//! and the `namespace` is checked, then the remaining fields are parsed into
//! the typed message. This keeps foreign traffic distinguishable from broken
//! traffic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::element::ElementId;
use crate::error::{DecodeError, LiveInkError, Result};
use crate::protocol::notes::{SlideNotes, Whitespace};

/// Discriminator shared by both endpoints.
pub const NAMESPACE: &str = "reveal-notes";

/// Opaque presentation position, passed through unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub Value);

impl Snapshot {
    pub fn new(v: Value) -> Self {
        Self(v)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// `connect`: presenter asks the audience to attach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectPayload {
    /// Absolute presenter location the audience should display.
    pub url: String,
    pub state: Snapshot,
}

/// `state`: full position snapshot plus the current slide's notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePayload {
    pub notes: String,
    pub markdown: bool,
    pub whitespace: Whitespace,
    pub state: Snapshot,
}

impl StatePayload {
    /// Build from the slide's notes sources, applying precedence.
    pub fn from_slide(notes: &SlideNotes, state: Snapshot) -> Self {
        let r = notes.resolve();
        Self {
            notes: r.notes,
            markdown: r.markdown,
            whitespace: r.whitespace,
            state,
        }
    }
}

/// Element mutation relayed to the audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementAction {
    RevealElement,
    HideElement,
}

impl ElementAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementAction::RevealElement => "reveal-element",
            ElementAction::HideElement => "hide-element",
        }
    }
}

/// `action`: reveal/hide one element, keyed by its stable id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPayload {
    pub elemid: ElementId,
    pub action: ElementAction,
    pub state: Snapshot,
}

/// One message on the notes channel. The namespace is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    Connect(ConnectPayload),
    Connected,
    State(StatePayload),
    Action(ActionPayload),
}

impl Envelope {
    pub fn connect(url: impl Into<String>, state: Snapshot) -> Self {
        Envelope::Connect(ConnectPayload {
            url: url.into(),
            state,
        })
    }

    pub fn state(notes: &SlideNotes, state: Snapshot) -> Self {
        Envelope::State(StatePayload::from_slide(notes, state))
    }

    pub fn action(elemid: ElementId, action: ElementAction, state: Snapshot) -> Self {
        Envelope::Action(ActionPayload {
            elemid,
            action,
            state,
        })
    }

    /// Wire value of the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Connect(_) => "connect",
            Envelope::Connected => "connected",
            Envelope::State(_) => "state",
            Envelope::Action(_) => "action",
        }
    }
}

/// Serialize an envelope to its wire string.
pub fn encode(env: &Envelope) -> Result<String> {
    let mut value = serde_json::to_value(env)
        .map_err(|e| LiveInkError::Internal(format!("envelope encode failed: {e}")))?;
    let Value::Object(fields) = &mut value else {
        return Err(LiveInkError::Internal("envelope did not encode to an object".into()));
    };
    fields.insert("namespace".into(), Value::String(NAMESPACE.into()));
    serde_json::to_string(&value)
        .map_err(|e| LiveInkError::Internal(format!("envelope encode failed: {e}")))
}

/// Parse a wire string. Never panics; the error says why the text was skipped.
pub fn decode(wire: &str) -> std::result::Result<Envelope, DecodeError> {
    let value: Value = serde_json::from_str(wire)
        .map_err(|e| DecodeError::MalformedPayload(format!("invalid json: {e}")))?;
    let Value::Object(mut fields) = value else {
        return Err(DecodeError::MalformedPayload("not a json object".into()));
    };
    check_namespace(&fields)?;
    fields.remove("namespace");
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| DecodeError::MalformedPayload(format!("invalid envelope: {e}")))
}

fn check_namespace(fields: &Map<String, Value>) -> std::result::Result<(), DecodeError> {
    match fields.get("namespace") {
        Some(Value::String(ns)) if ns == NAMESPACE => Ok(()),
        Some(Value::String(ns)) => Err(DecodeError::ForeignNamespace {
            found: Some(ns.clone()),
        }),
        Some(other) => Err(DecodeError::ForeignNamespace {
            found: Some(other.to_string()),
        }),
        None => Err(DecodeError::ForeignNamespace { found: None }),
    }
}
