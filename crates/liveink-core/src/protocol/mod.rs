//! Wire protocol of the notes channel.
//!
//! Every message is a single JSON object tagged with the `reveal-notes`
//! namespace and a `type` discriminator; payload fields are flattened next to
//! the tag. The channel may be shared with unrelated traffic, so decoding
//! classifies foreign or malformed input instead of failing the receiver.

pub mod envelope;
pub mod notes;

pub use envelope::{
    decode, encode, ActionPayload, ConnectPayload, ElementAction, Envelope, Snapshot,
    StatePayload, NAMESPACE,
};
pub use notes::{NotesBlock, SlideNotes, Whitespace};
