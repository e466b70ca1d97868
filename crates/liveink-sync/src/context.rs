//! Shared collaborators of a presenter endpoint.
//!
//! Bundles config, channel, presentation engine and metrics behind `Arc`s so
//! sessions and adapters can clone what they need without global state.

use std::sync::Arc;

use crate::config::SyncConfig;
use crate::obs::SyncMetrics;
use crate::presentation::Presentation;
use crate::transport::Channel;

#[derive(Clone)]
pub struct SyncContext {
    cfg: Arc<SyncConfig>,
    channel: Arc<dyn Channel>,
    deck: Arc<dyn Presentation>,
    metrics: Arc<SyncMetrics>,
}

impl SyncContext {
    pub fn new(
        cfg: SyncConfig,
        channel: Arc<dyn Channel>,
        deck: Arc<dyn Presentation>,
        metrics: Arc<SyncMetrics>,
    ) -> Self {
        Self {
            cfg: Arc::new(cfg),
            channel,
            deck,
            metrics,
        }
    }

    pub fn cfg(&self) -> &SyncConfig {
        &self.cfg
    }

    pub fn channel(&self) -> &dyn Channel {
        self.channel.as_ref()
    }

    pub fn deck(&self) -> &dyn Presentation {
        self.deck.as_ref()
    }

    pub fn metrics(&self) -> &SyncMetrics {
        &self.metrics
    }
}
