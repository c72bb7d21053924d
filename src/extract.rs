//! Pulling JSON payloads out of model replies.
//!
//! Models asked for "exact JSON" still wrap it in Markdown fences often
//! enough that every structured caller needs this.

use serde::de::DeserializeOwned;

/// Remove a leading ```` ```json ```` / ```` ``` ```` fence and a trailing
/// ```` ``` ```` fence, plus surrounding whitespace.
pub fn strip_code_fences(content: &str) -> &str {
    let mut body = content.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    }
    if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Parse `content` as `T` after stripping code fences.
///
/// `None` when the reply is not valid JSON of the expected shape.
pub fn extract_json<T: DeserializeOwned>(content: &str) -> Option<T> {
    serde_json::from_str(strip_code_fences(content)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn strips_json_fence() {
        let reply = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(reply), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("  ```\n[1]\n```  "), "[1]");
    }

    #[test]
    fn leaves_plain_text() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn extract_rejects_prose() {
        assert!(extract_json::<Value>("Sure! Here is your draft.").is_none());
        let value: Value = extract_json("```json\n{\"ok\": true}\n```").unwrap();
        assert_eq!(value["ok"], true);
    }
}
