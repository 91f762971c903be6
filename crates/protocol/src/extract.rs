//! Byte-exact payload extraction
//!
//! The response's `data` value must be recovered as the verbatim
//! substring of the raw text, because that is what the server signed.
//! Parsing and re-serializing would normalize whitespace and field order
//! and break verification, so the scan below is the specified algorithm,
//! not an optimization.

const MARKER: &str = "\"data\":";

/// Extract the exact `data` object substring from raw response text.
///
/// Scans forward from the payload marker tracking string state (toggled
/// by unescaped quotes), a pending-escape flag, and brace depth counted
/// only outside strings; the substring ends one character past the brace
/// that returns the depth to zero.
///
/// Returns `None` when the marker is missing, the value is not an object,
/// or the braces never balance.
pub fn extract_data_json(raw: &str) -> Option<&str> {
    let mut start = raw.find(MARKER)? + MARKER.len();
    let bytes = raw.as_bytes();
    while start < bytes.len() && bytes[start].is_ascii_whitespace() {
        start += 1;
    }

    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape_next = false;
    let mut seen_open = false;

    for (offset, c) in raw[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => {
                depth += 1;
                seen_open = true;
            }
            '}' if !in_string => {
                depth -= 1;
                if seen_open && depth == 0 {
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_simple_object() {
        let raw = r#"{"data": {"status":"AS"}, "signature": "abc"}"#;
        assert_eq!(extract_data_json(raw), Some(r#"{"status":"AS"}"#));
    }

    #[test]
    fn preserves_interior_whitespace_verbatim() {
        let raw = "{\"data\":   { \"a\" : 1 ,\n \"b\" : {} } , \"signature\": \"x\"}";
        assert_eq!(extract_data_json(raw), Some("{ \"a\" : 1 ,\n \"b\" : {} }"));
    }

    #[test]
    fn handles_nested_braces() {
        let raw = r#"{"data": {"a":{"b":{"c":1}},"d":2}, "signature": "x"}"#;
        assert_eq!(extract_data_json(raw), Some(r#"{"a":{"b":{"c":1}},"d":2}"#));
    }

    #[test]
    fn braces_inside_strings_do_not_count() {
        let raw = r#"{"data": {"msg":"{not a brace}"}, "signature": "x"}"#;
        assert_eq!(extract_data_json(raw), Some(r#"{"msg":"{not a brace}"}"#));
    }

    #[test]
    fn escaped_quote_does_not_leave_string_state() {
        let raw = r#"{"data": {"msg":"say \"hi\" {"}, "signature": "x"}"#;
        assert_eq!(extract_data_json(raw), Some(r#"{"msg":"say \"hi\" {"}"#));
    }

    #[test]
    fn escaped_closing_brace_does_not_terminate_early() {
        let raw = r#"{"data": {"msg":"ends with \}","ok":true}, "signature": "x"}"#;
        assert_eq!(
            extract_data_json(raw),
            Some(r#"{"msg":"ends with \}","ok":true}"#)
        );
    }

    #[test]
    fn missing_marker_returns_none() {
        assert_eq!(extract_data_json(r#"{"payload": {}}"#), None);
    }

    #[test]
    fn unbalanced_braces_return_none() {
        assert_eq!(extract_data_json(r#"{"data": {"a": {"#), None);
    }

    #[test]
    fn non_object_value_returns_none() {
        assert_eq!(extract_data_json(r#"{"data": "just a string"}"#), None);
    }

    #[test]
    fn trailing_garbage_after_object_is_ignored() {
        let raw = "{\"data\": {\"a\":1}, \"signature\": \"x\"}\r\n0\r\n";
        assert_eq!(extract_data_json(raw), Some(r#"{"a":1}"#));
    }
}
