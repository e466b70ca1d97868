//! Labelled counters for the sync layer.
//!
//! Labels are flattened into sorted key vectors so rendering order of a
//! label set is deterministic.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for one label set (0 when never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (label_str, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (label_str, val) in rows {
            if label_str.is_empty() {
                let _ = writeln!(out, "{} {}", name, val);
            } else {
                let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
            }
        }
    }
}

#[derive(Default)]
pub struct SyncMetrics {
    /// Envelopes posted, by `type`.
    pub envelopes_sent: CounterVec,
    /// Inbound messages dropped by the decoder, by `reason`.
    pub decode_drops: CounterVec,
    pub connect_attempts: CounterVec,
    /// Posts that failed because the peer was gone, by `type`.
    pub channel_errors: CounterVec,
}

impl SyncMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.envelopes_sent.render("liveink_envelopes_sent_total", &mut out);
        self.decode_drops.render("liveink_decode_drops_total", &mut out);
        self.connect_attempts.render("liveink_connect_attempts_total", &mut out);
        self.channel_errors.render("liveink_channel_errors_total", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_order_insensitive() {
        let c = CounterVec::default();
        c.inc(&[("type", "state"), ("peer", "audience")]);
        c.inc(&[("peer", "audience"), ("type", "state")]);
        assert_eq!(c.get(&[("type", "state"), ("peer", "audience")]), 2);
        assert_eq!(c.get(&[("type", "action")]), 0);
    }

    #[test]
    fn render_prometheus_text() {
        let m = SyncMetrics::default();
        m.envelopes_sent.inc(&[("type", "state")]);
        m.envelopes_sent.add(&[("type", "connect")], 3);
        m.connect_attempts.inc(&[]);
        m.decode_drops.inc(&[("reason", "FOREIGN_NAMESPACE")]);

        let out = m.render();
        assert!(out.contains("# TYPE liveink_envelopes_sent_total counter"));
        assert!(out.contains("liveink_envelopes_sent_total{type=\"connect\"} 3"));
        assert!(out.contains("liveink_envelopes_sent_total{type=\"state\"} 1"));
        assert!(out.contains("liveink_connect_attempts_total 1"));
        assert!(out.contains("liveink_decode_drops_total{reason=\"FOREIGN_NAMESPACE\"} 1"));
    }
}
