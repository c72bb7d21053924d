use std::time::Duration;

use heimdall::{HeimdallError, Result};

#[test]
fn test_error_display() {
    let err = HeimdallError::Api {
        status: 502,
        message: "bad gateway".to_string(),
    };
    assert_eq!(err.to_string(), "API error (502): bad gateway");
    assert_eq!(
        HeimdallError::NoProviderAvailable.to_string(),
        "no AI provider available"
    );
}

#[test]
fn test_capability_unsupported() {
    let err = HeimdallError::CapabilityUnsupported("embed");
    assert!(err.to_string().contains("embed"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(HeimdallError::NoProviderAvailable)
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Fallback classification
// ============================================================================

#[test]
fn fallback_triggers() {
    assert!(HeimdallError::Transport("connection reset".into()).is_fallback_trigger());
    assert!(
        HeimdallError::Api {
            status: 500,
            message: "internal".into()
        }
        .is_fallback_trigger()
    );
    assert!(HeimdallError::RateLimited { retry_after: None }.is_fallback_trigger());
    assert!(HeimdallError::Unauthenticated.is_fallback_trigger());
    assert!(HeimdallError::EmptyResponse.is_fallback_trigger());
    assert!(HeimdallError::Configuration("no key".into()).is_fallback_trigger());
}

#[test]
fn terminal_errors() {
    assert!(!HeimdallError::InvalidInput("x".into()).is_fallback_trigger());
    assert!(!HeimdallError::NoProviderAvailable.is_fallback_trigger());
    assert!(!HeimdallError::EmbeddingUnsupported.is_fallback_trigger());
    assert!(!HeimdallError::CapabilityUnsupported("embed").is_fallback_trigger());
    assert!(!HeimdallError::Cache("down".into()).is_fallback_trigger());
}

#[test]
fn only_exhaustion_is_unavailable() {
    assert!(HeimdallError::NoProviderAvailable.is_unavailable());
    assert!(!HeimdallError::EmbeddingUnsupported.is_unavailable());
    assert!(!HeimdallError::Unauthenticated.is_unavailable());
}

// ============================================================================
// retry_after extraction
// ============================================================================

#[test]
fn retry_after_from_rate_limited() {
    let err = HeimdallError::RateLimited {
        retry_after: Some(Duration::from_secs(30)),
    };
    assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
}

#[test]
fn retry_after_none_for_other_errors() {
    assert_eq!(HeimdallError::RateLimited { retry_after: None }.retry_after(), None);
    assert_eq!(HeimdallError::EmptyResponse.retry_after(), None);
}

#[test]
fn json_errors_convert() {
    let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
    let err: HeimdallError = parse.unwrap_err().into();
    assert!(matches!(err, HeimdallError::Json(_)));
    assert!(err.to_string().starts_with("JSON error"));
}
