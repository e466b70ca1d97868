use std::time::Duration;

use serde::Deserialize;
use liveink_core::error::{LiveInkError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    pub version: u32,

    #[serde(default)]
    pub presenter: PresenterSection,

    #[serde(default)]
    pub channel: ChannelSection,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            version: 1,
            presenter: PresenterSection::default(),
            channel: ChannelSection::default(),
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LiveInkError::UnsupportedVersion);
        }

        self.presenter.validate()?;
        self.channel.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresenterSection {
    /// Period of the connect loop.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Name of the audience window; reopening with the same name reuses it.
    #[serde(default = "default_window_name")]
    pub window_name: String,

    #[serde(default = "default_window_features")]
    pub window_features: String,

    /// Page opened next to the plugin script when no target is given.
    #[serde(default = "default_audience_page")]
    pub audience_page: String,

    #[serde(default = "default_shortcut")]
    pub shortcut: char,

    /// Query parameter that opens the notes window on load.
    #[serde(default = "default_auto_open_param")]
    pub auto_open_param: String,

    /// Query marker of pages that are themselves receivers.
    #[serde(default = "default_receiver_param")]
    pub receiver_param: String,
}

impl Default for PresenterSection {
    fn default() -> Self {
        Self {
            retry_interval_ms: default_retry_interval_ms(),
            window_name: default_window_name(),
            window_features: default_window_features(),
            audience_page: default_audience_page(),
            shortcut: default_shortcut(),
            auto_open_param: default_auto_open_param(),
            receiver_param: default_receiver_param(),
        }
    }
}

impl PresenterSection {
    pub fn validate(&self) -> Result<()> {
        if !(50..=10_000).contains(&self.retry_interval_ms) {
            return Err(LiveInkError::BadConfig(
                "presenter.retry_interval_ms must be between 50 and 10000".into(),
            ));
        }
        if self.window_name.trim().is_empty() {
            return Err(LiveInkError::BadConfig(
                "presenter.window_name must not be empty".into(),
            ));
        }
        if self.audience_page.trim().is_empty() {
            return Err(LiveInkError::BadConfig(
                "presenter.audience_page must not be empty".into(),
            ));
        }
        if !self.shortcut.is_ascii_alphanumeric() {
            return Err(LiveInkError::BadConfig(
                "presenter.shortcut must be an ascii letter or digit".into(),
            ));
        }
        if self.auto_open_param.is_empty() || self.receiver_param.is_empty() {
            return Err(LiveInkError::BadConfig(
                "presenter query parameters must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

fn default_retry_interval_ms() -> u64 {
    500
}
fn default_window_name() -> String {
    "reveal.js - Audience View".into()
}
fn default_window_features() -> String {
    "width=1100,height=700".into()
}
fn default_audience_page() -> String {
    "audience.html".into()
}
fn default_shortcut() -> char {
    'S'
}
fn default_auto_open_param() -> String {
    "notes".into()
}
fn default_receiver_param() -> String {
    "receiver".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelSection {
    /// Per-endpoint inbound buffer (messages) of the in-process hub.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl ChannelSection {
    pub fn validate(&self) -> Result<()> {
        if !(8..=4096).contains(&self.capacity) {
            return Err(LiveInkError::BadConfig(
                "channel.capacity must be between 8 and 4096".into(),
            ));
        }
        Ok(())
    }
}

fn default_capacity() -> usize {
    64
}
