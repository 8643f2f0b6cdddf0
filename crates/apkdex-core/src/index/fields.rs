//! Post-parse helpers for awkward wire encodings.
//!
//! The index documents encode several fields loosely: integers that may
//! arrive as JSON strings, hex-encoded digests, comma-joined lists, and
//! `[name, maxSdk]` permission pairs. Rather than custom deserializer
//! hooks on every field, the raw documents decode generically and these
//! helpers normalize the values afterwards.

use serde_json::Value;
use tracing::debug;

use crate::catalog::Permission;

/// Read an integer that may be a JSON number or a numeric string.
/// Anything else (including absence) is `0`.
pub(crate) fn int_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Decode a hex-encoded field. Malformed hex is tolerated as empty; the
/// digest is re-checked at download time anyway.
pub(crate) fn decode_hex(text: &str) -> Vec<u8> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    match hex::decode(text) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(%err, "ignoring malformed hex field");
            Vec::new()
        }
    }
}

/// Split a comma-joined list, dropping empty segments.
pub(crate) fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim surrounding whitespace and decode HTML character entities.
pub(crate) fn clean_text(text: &str) -> String {
    html_escape::decode_html_entities(text.trim()).into_owned()
}

/// Convert raw `[name, maxSdk|null]` permission pairs. Entries that do
/// not fit the pair shape are dropped.
pub(crate) fn permissions(raw: &[Value]) -> Vec<Permission> {
    raw.iter()
        .filter_map(|entry| {
            let pair = entry.as_array()?;
            let name = pair.first()?.as_str()?.to_string();
            let max_sdk = pair.get(1).and_then(Value::as_i64);
            Some(Permission { name, max_sdk })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_value_accepts_numbers_and_numeric_strings() {
        assert_eq!(int_value(&json!(21)), 21);
        assert_eq!(int_value(&json!("21")), 21);
        assert_eq!(int_value(&json!(" 7 ")), 7);
        assert_eq!(int_value(&json!(null)), 0);
        assert_eq!(int_value(&json!("not a number")), 0);
    }

    #[test]
    fn decode_hex_tolerates_garbage() {
        assert_eq!(decode_hex("cafe"), vec![0xca, 0xfe]);
        assert_eq!(decode_hex(""), Vec::<u8>::new());
        assert_eq!(decode_hex("zz"), Vec::<u8>::new());
    }

    #[test]
    fn split_commas_drops_empty_segments() {
        assert_eq!(
            split_commas("arm64-v8a,armeabi-v7a"),
            vec!["arm64-v8a", "armeabi-v7a"]
        );
        assert_eq!(split_commas(""), Vec::<String>::new());
        assert_eq!(split_commas("a,,b, "), vec!["a", "b"]);
    }

    #[test]
    fn clean_text_trims_and_unescapes() {
        assert_eq!(clean_text("  Tom &amp; Jerry\n"), "Tom & Jerry");
        assert_eq!(clean_text("&lt;b&gt;bold&lt;/b&gt;"), "<b>bold</b>");
    }

    #[test]
    fn permission_pairs_handle_null_max_sdk() {
        let raw = vec![
            json!(["android.permission.CAMERA", null]),
            json!(["android.permission.READ_SMS", 22]),
            json!("not-a-pair"),
        ];
        let perms = permissions(&raw);
        assert_eq!(perms.len(), 2);
        assert_eq!(perms[0].name, "android.permission.CAMERA");
        assert_eq!(perms[0].max_sdk, None);
        assert_eq!(perms[1].max_sdk, Some(22));
    }
}
