//! Serialisation: render a record or the manifest to JSON bytes.
//!
//! Two modes share one entry point. Compact output is what machines read;
//! prettified output indents with one tab per level so diffs of generated
//! trees stay readable. Both are deterministic for identical input.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Encode `value` as JSON, indented with tabs when `prettify` is set.
pub fn to_json_bytes<T>(value: &T, prettify: bool) -> Result<Vec<u8>, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    if !prettify {
        return serde_json::to_vec(value);
    }

    let mut buf = Vec::with_capacity(256);
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compact_has_no_whitespace() {
        let v = json!({"name": "Intro", "headline": ["Intro", "Usage"]});
        let bytes = to_json_bytes(&v, false).unwrap();
        let s = String::from_utf8(bytes).unwrap();
        assert!(!s.contains('\n'));
        assert!(!s.contains('\t'));
    }

    #[test]
    fn prettify_indents_with_tabs_and_keeps_value() {
        let v = json!({"name": "Intro", "wordCount": 3});
        let pretty = to_json_bytes(&v, true).unwrap();
        let text = std::str::from_utf8(&pretty).unwrap();
        assert!(text.contains("\n\t\"name\""), "got: {text}");

        let decoded: serde_json::Value = serde_json::from_slice(&pretty).unwrap();
        let compact: serde_json::Value =
            serde_json::from_slice(&to_json_bytes(&v, false).unwrap()).unwrap();
        assert_eq!(decoded, compact);
    }

    #[test]
    fn output_is_deterministic() {
        let v = json!({"b": 1, "a": [1, 2, 3]});
        assert_eq!(
            to_json_bytes(&v, true).unwrap(),
            to_json_bytes(&v, true).unwrap()
        );
    }
}
