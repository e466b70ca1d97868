//! Shared error type across liveink crates.

use thiserror::Error;

/// Stable error codes (used in logs, metrics labels and test vectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Inbound text is not a well-formed notes envelope.
    MalformedPayload,
    /// Inbound text belongs to another protocol sharing the channel.
    ForeignNamespace,
    /// Target process is gone or unreachable.
    ChannelUnavailable,
    /// No handle to the target process could be acquired.
    SessionOpenFailed,
    /// Element id outside the session's registry.
    UnknownElement,
    /// Invalid configuration.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MalformedPayload => "MALFORMED_PAYLOAD",
            ErrorCode::ForeignNamespace => "FOREIGN_NAMESPACE",
            ErrorCode::ChannelUnavailable => "CHANNEL_UNAVAILABLE",
            ErrorCode::SessionOpenFailed => "SESSION_OPEN_FAILED",
            ErrorCode::UnknownElement => "UNKNOWN_ELEMENT",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Why an inbound message was dropped. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    #[error("foreign namespace: {}", .found.as_deref().unwrap_or("<none>"))]
    ForeignNamespace { found: Option<String> },
}

impl DecodeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::MalformedPayload(_) => ErrorCode::MalformedPayload,
            DecodeError::ForeignNamespace { .. } => ErrorCode::ForeignNamespace,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LiveInkError>;

/// Unified error type used by core and sync crates.
#[derive(Debug, Error)]
pub enum LiveInkError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("channel unavailable: {0}")]
    ChannelUnavailable(String),
    #[error("session open failed: {0}")]
    SessionOpenFailed(String),
    #[error("unknown element: {0}")]
    UnknownElement(u32),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl LiveInkError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            LiveInkError::Decode(e) => e.code(),
            LiveInkError::ChannelUnavailable(_) => ErrorCode::ChannelUnavailable,
            LiveInkError::SessionOpenFailed(_) => ErrorCode::SessionOpenFailed,
            LiveInkError::UnknownElement(_) => ErrorCode::UnknownElement,
            LiveInkError::BadConfig(_) => ErrorCode::BadConfig,
            LiveInkError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            LiveInkError::Internal(_) => ErrorCode::Internal,
        }
    }
}
