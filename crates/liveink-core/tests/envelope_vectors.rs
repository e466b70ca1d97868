//! Envelope vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::Value;

use liveink_core::protocol::{decode, encode, Envelope};


#[test]
fn envelope_vectors() {
    let vectors = vector_loader::load_all();
    assert!(vectors.len() >= 10, "vector directory looks empty");

    for (name, v) in vectors {
        let res = decode(&v.wire);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected decode error");
            assert_eq!(e.code().as_str(), err.code, "vector={name} ({})", v.description);
            continue;
        }

        let env = res.unwrap_or_else(|e| panic!("vector={name}: {e}"));
        let ex = v.expect.expect("missing expect block");

        assert_eq!(env.kind(), ex["type"].as_str().unwrap(), "vector={name}");

        // re-encoding reproduces the same structure
        let original: Value = serde_json::from_str(&v.wire).unwrap();
        let again: Value = serde_json::from_str(&encode(&env).unwrap()).unwrap();
        assert_eq!(original, again, "vector={name}");

        // every other expected field shows up verbatim on the wire
        for (k, expected) in ex.as_object().unwrap() {
            assert_eq!(&again[k], expected, "vector={name} field={k}");
        }
    }
}

#[test]
fn state_vector_keeps_opaque_state() {
    let v = vector_loader::load("state_markdown_block.json");
    match decode(&v.wire).unwrap() {
        Envelope::State(s) => {
            assert_eq!(s.notes, "- point one\n- point two");
            assert_eq!(s.state.as_value()["indexv"], 2);
            assert_eq!(s.state.as_value()["indexf"], -1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn decode_never_panics_on_truncated_input() {
    let v = vector_loader::load("connect.json");
    for cut in 0..v.wire.len() {
        if !v.wire.is_char_boundary(cut) {
            continue;
        }
        let _ = decode(&v.wire[..cut]);
    }
}
