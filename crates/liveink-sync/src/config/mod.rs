//! Sync layer config loader (strict parsing).

pub mod schema;

use std::fs;

use liveink_core::error::{LiveInkError, Result};

pub use schema::{ChannelSection, PresenterSection, SyncConfig};

pub fn load_from_file(path: &str) -> Result<SyncConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| LiveInkError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<SyncConfig> {
    let cfg: SyncConfig = serde_yaml::from_str(s)
        .map_err(|e| LiveInkError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
