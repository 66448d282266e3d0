//! Deterministic isolation of a JSON object from model output.
//!
//! The model is instructed to answer with a bare JSON object, but it
//! routinely wraps the payload in markdown fences or surrounding prose.
//! Extraction scans for the first balanced `{ ... }` span, respecting
//! string literals and escapes, and parses exactly that span.

use serde_json::Value;

use crate::error::QueryError;

/// Isolate and parse the first complete JSON object embedded in `text`.
pub fn extract_json_object(text: &str) -> Result<Value, QueryError> {
    let span = first_object_span(text).ok_or_else(|| {
        QueryError::Format("response contained no complete JSON object".to_string())
    })?;

    serde_json::from_str(span)
        .map_err(|e| QueryError::Format(format!("embedded JSON object failed to parse: {e}")))
}

/// Return the first balanced top-level `{ ... }` slice of `text`, if any.
fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
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
    fn bare_object_parses() {
        let value = extract_json_object(r#"{"a": 1}"#).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn fenced_object_parses() {
        let text = "```json\n{\"temp\": 21.5}\n```";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["temp"], 21.5);
    }

    #[test]
    fn prose_wrapped_object_parses() {
        let text = "Here is the forecast you asked for:\n{\"ok\": true}\nLet me know!";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn nested_braces_are_balanced() {
        let text = r#"noise {"outer": {"inner": [1, 2]}} trailing"#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["outer"]["inner"][1], 2);
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let text = r#"{"note": "a } inside a string", "n": 3}"#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["n"], 3);
    }

    #[test]
    fn no_object_is_format_error() {
        let err = extract_json_object("sorry, I cannot help with that").unwrap_err();
        assert!(matches!(err, QueryError::Format(_)));
    }

    #[test]
    fn unterminated_object_is_format_error() {
        let err = extract_json_object(r#"{"a": 1"#).unwrap_err();
        assert!(matches!(err, QueryError::Format(_)));
    }

    #[test]
    fn invalid_balanced_span_is_format_error() {
        let err = extract_json_object("{not valid json}").unwrap_err();
        assert!(matches!(err, QueryError::Format(_)));
    }
}
