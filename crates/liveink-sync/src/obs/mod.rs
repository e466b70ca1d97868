//! Lightweight in-process counters for the notes channel.
//!
//! Counters are atomics behind `DashMap` and render in Prometheus text format
//! so a host application can expose them next to its own metrics.

pub mod metrics;

pub use metrics::{CounterVec, SyncMetrics};
