#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use liveink_sync::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
presenter:
  retry_interval: 500 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.presenter.retry_interval_ms, 500);
    assert_eq!(cfg.presenter.window_name, "reveal.js - Audience View");
    assert_eq!(cfg.presenter.shortcut, 'S');
    assert_eq!(cfg.channel.capacity, 64);
}

#[test]
fn ok_full_config() {
    let ok = r#"
version: 1
presenter:
  retry_interval_ms: 250
  window_name: "notes"
  window_features: "width=800,height=600"
  audience_page: "speaker.html"
  shortcut: "n"
  auto_open_param: "speaker"
  receiver_param: "listener"
channel:
  capacity: 256
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.presenter.retry_interval().as_millis(), 250);
    assert_eq!(cfg.presenter.shortcut, 'n');
    assert_eq!(cfg.channel.capacity, 256);
}

#[test]
fn retry_interval_out_of_range() {
    for ms in [0, 49, 10_001] {
        let s = format!("version: 1\npresenter:\n  retry_interval_ms: {ms}\n");
        let err = config::load_from_str(&s).expect_err("must fail");
        assert_eq!(err.code().as_str(), "BAD_CONFIG", "ms={ms}");
    }
}

#[test]
fn channel_capacity_out_of_range() {
    let err = config::load_from_str("version: 1\nchannel:\n  capacity: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_CONFIG");
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn missing_file() {
    let err = config::load_from_file("does/not/exist.yaml").expect_err("must fail");
    assert_eq!(err.code().as_str(), "INTERNAL");
}
