//! Response body decoding.

use serde_json::Value;
use tracing::debug;

use oai_core::{Error, Result};

/// Boundary between two newline-joined objects in one body.
const JOINED_OBJECTS: &str = "}\n{";

/// Decode a response body.
///
/// `None` means there was no body and yields `Ok(None)`, which callers can
/// tell apart from a body that decoded to JSON `null`.
pub fn decode_body(body: Option<&str>) -> Result<Option<Value>> {
    match body {
        Some(text) => decode_text(text).map(Some),
        None => Ok(None),
    }
}

/// Parse text as one JSON document, repairing newline-joined objects.
///
/// The upstream API sometimes answers with several objects separated by
/// newlines (an error interleaved with data, or JSON Lines file content).
/// When the text is not a single document, every `}\n{` is turned into
/// `},{` and the whole text is wrapped in brackets before a second attempt.
pub fn decode_text(text: &str) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(original) => {
            let repaired = format!("[{}]", text.replace(JOINED_OBJECTS, "},{"));
            match serde_json::from_str(&repaired) {
                Ok(value) => {
                    debug!(len = text.len(), "Decoded body as joined JSON objects");
                    Ok(value)
                }
                Err(_) => Err(Error::Decode(format!(
                    "{} (body: {})",
                    original,
                    preview(text)
                ))),
            }
        }
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 120;
    if text.len() <= MAX {
        return text.to_string();
    }
    let mut end = MAX;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_single_object() {
        let value = decode_text(r#"{"id":"cmpl-1","choices":[{"text":"hi"}]}"#).unwrap();
        assert_eq!(value, json!({"id": "cmpl-1", "choices": [{"text": "hi"}]}));
    }

    #[test]
    fn test_decode_matches_serde_for_documents() {
        for doc in [
            r#"{"object":"list","data":[]}"#,
            r#"{"error":{"message":"Incorrect API key","type":"invalid_request_error"}}"#,
            "[1,2,3]",
            "\"text\"",
            "42",
            "null",
        ] {
            let expected: Value = serde_json::from_str(doc).unwrap();
            assert_eq!(decode_text(doc).unwrap(), expected, "document {}", doc);
        }
    }

    #[test]
    fn test_decode_newline_joined_objects() {
        let value = decode_text("{\"a\":1}\n{\"b\":2}").unwrap();
        assert_eq!(value, json!([{"a": 1}, {"b": 2}]));
    }

    #[test]
    fn test_decode_jsonl_file_content() {
        let body = "{\"prompt\":\"a\",\"completion\":\"b\"}\n{\"prompt\":\"c\",\"completion\":\"d\"}\n{\"prompt\":\"e\",\"completion\":\"f\"}";
        let value = decode_text(body).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(value[2]["completion"], "f");
    }

    #[test]
    fn test_decode_comma_joined_objects() {
        // Shape produced by the stream pipeline for multi-event chunks.
        let value = decode_text("{\"x\":1},{\"y\":2}\n\n").unwrap();
        assert_eq!(value, json!([{"x": 1}, {"y": 2}]));
    }

    #[test]
    fn test_decode_unrepairable_body() {
        let err = decode_text("<html>502 Bad Gateway</html>").unwrap_err();
        match err {
            Error::Decode(msg) => assert!(msg.contains("502 Bad Gateway")),
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_crlf_joined_objects_fail() {
        // Only the exact `}\n{` boundary is repaired.
        assert!(decode_text("{\"a\":1}\r\n{\"b\":2}").is_err());
    }

    #[test]
    fn test_absent_body_is_none() {
        assert!(decode_body(None).unwrap().is_none());
    }

    #[test]
    fn test_null_body_is_some_null() {
        assert_eq!(decode_body(Some("null")).unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(100);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert!(p.len() <= 123);
    }
}
