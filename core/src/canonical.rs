//! Canonical JSON: the form over which ANNOUNCE signatures are computed.
//!
//! Keys are sorted lexicographically at every nesting level and no
//! insignificant whitespace is emitted. This relies on `serde_json`'s
//! default `Map` representation being a `BTreeMap` (the `preserve_order`
//! feature must stay disabled in this workspace) so that simply routing
//! a value through `serde_json::Value` and serializing compactly already
//! produces sorted keys at every level, with no hand-rolled recursion.

use serde::Serialize;

/// Serialize `value` into canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let as_value = serde_json::to_value(value)?;
    serde_json::to_vec(&as_value)
}

/// Re-serialize an already-parsed value into its canonical byte form.
pub fn canonicalize(value: &serde_json::Value) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_at_every_nesting_level() {
        let value = json!({
            "z": 1,
            "a": { "y": 2, "b": 3 },
        });
        let bytes = canonicalize(&value).unwrap();
        assert_eq!(bytes, br#"{"a":{"b":3,"y":2},"z":1}"#);
    }

    #[test]
    fn round_trip_is_stable_regardless_of_source_key_order() {
        let first = r#"{"b":2,"a":1}"#;
        let second = r#"{"a":1,"b":2}"#;

        let canon_first = canonicalize(&serde_json::from_str(first).unwrap()).unwrap();
        let canon_second = canonicalize(&serde_json::from_str(second).unwrap()).unwrap();
        assert_eq!(canon_first, canon_second);

        let reparsed: serde_json::Value = serde_json::from_slice(&canon_first).unwrap();
        let canon_again = canonicalize(&reparsed).unwrap();
        assert_eq!(canon_first, canon_again);
    }

    #[test]
    fn emits_no_insignificant_whitespace() {
        let bytes = canonicalize(&json!({"a": [1, 2, 3], "b": "x"})).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains(' '));
        assert!(!text.contains('\n'));
    }
}
