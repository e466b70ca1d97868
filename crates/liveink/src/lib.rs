//! Top-level facade crate for liveink.
//!
//! Re-exports the protocol core and the sync layer so users can depend on a single crate.

pub mod core {
    pub use liveink_core::*;
}

pub mod sync {
    pub use liveink_sync::*;
}
