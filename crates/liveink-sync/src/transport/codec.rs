//! Decode-once step between the transport and the session logic.
//!
//! - Inbound posts => `Inbound::Envelope` or a classified drop
//! - Outbound envelopes => wire string, posted with metrics and logging

use liveink_core::{
    error::{DecodeError, Result},
    protocol::{self, Envelope},
};

use crate::obs::SyncMetrics;
use crate::transport::{Channel, PeerHandle, Posted};

#[derive(Debug)]
pub enum Inbound {
    Envelope(Envelope),
    /// Foreign or malformed traffic; already counted.
    Dropped(DecodeError),
}

pub fn classify(posted: &Posted, metrics: &SyncMetrics) -> Inbound {
    match protocol::decode(&posted.data) {
        Ok(env) => Inbound::Envelope(env),
        Err(e) => {
            metrics.decode_drops.inc(&[("reason", e.code().as_str())]);
            match &e {
                DecodeError::ForeignNamespace { .. } => {
                    tracing::trace!(source=%posted.source, error=%e, "foreign message ignored")
                }
                DecodeError::MalformedPayload(_) => {
                    tracing::debug!(source=%posted.source, error=%e, "malformed message dropped")
                }
            }
            Inbound::Dropped(e)
        }
    }
}

/// Encode and post one envelope.
pub fn post_envelope(
    channel: &dyn Channel,
    to: &PeerHandle,
    env: &Envelope,
    metrics: &SyncMetrics,
) -> Result<()> {
    let wire = protocol::encode(env)?;
    let kind = env.kind();
    match channel.post(to, wire) {
        Ok(()) => {
            metrics.envelopes_sent.inc(&[("type", kind)]);
            tracing::trace!(to=%to, kind, "envelope posted");
            Ok(())
        }
        Err(e) => {
            metrics.channel_errors.inc(&[("type", kind)]);
            Err(e)
        }
    }
}
