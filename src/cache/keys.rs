//! Cache tags and the request fields each one fingerprints.

use serde_json::{Value, json};

use crate::types::{CompletionRequest, EmbeddingRequest};

/// Tag for completion responses.
pub const COMPLETION: &str = "completion";

/// Tag for embedding responses.
pub const EMBEDDING: &str = "embedding";

/// Tag for structured job drafts.
pub const JOB_DRAFT: &str = "job_draft";

/// Tag for structured cover letters.
pub const COVER_LETTER: &str = "cover_letter";

/// Characters of embedding input that take part in the key.
///
/// Texts sharing this prefix share a cache entry.
pub const EMBEDDING_KEY_CHARS: usize = 100;

/// Model name used in the embedding key when the request names none.
const DEFAULT_MODEL_KEY: &str = "default";

/// Fields for a completion: messages, max_tokens, temperature.
///
/// The preferred provider and `stream` are not part of the key.
pub fn completion_fields(request: &CompletionRequest) -> Value {
    json!({
        "messages": request.messages,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
    })
}

/// Fields for an embedding: the text prefix and the model.
pub fn embedding_fields(request: &EmbeddingRequest) -> Value {
    let prefix: String = request.text.chars().take(EMBEDDING_KEY_CHARS).collect();
    json!({
        "text": prefix,
        "model": request.model.as_deref().unwrap_or(DEFAULT_MODEL_KEY),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[test]
    fn embedding_key_uses_prefix_only() {
        let shared = "x".repeat(EMBEDDING_KEY_CHARS);
        let a = EmbeddingRequest::new(format!("{shared}tail one"));
        let b = EmbeddingRequest::new(format!("{shared}tail two"));
        assert_eq!(embedding_fields(&a), embedding_fields(&b));
    }

    #[test]
    fn embedding_prefix_counts_chars() {
        let text = "é".repeat(EMBEDDING_KEY_CHARS + 5);
        let fields = embedding_fields(&EmbeddingRequest::new(text));
        let prefix = fields["text"].as_str().unwrap();
        assert_eq!(prefix.chars().count(), EMBEDDING_KEY_CHARS);
        assert_eq!(fields["model"], "default");
    }

    #[test]
    fn completion_key_ignores_stream() {
        let base = CompletionRequest::new(vec![Message::user("hi")]);
        let mut streamed = base.clone();
        streamed.stream = true;
        assert_eq!(completion_fields(&base), completion_fields(&streamed));
        assert_ne!(
            completion_fields(&base),
            completion_fields(&base.clone().max_tokens(10))
        );
    }
}
