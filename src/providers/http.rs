//! HTTP plumbing shared by the backend adapters.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::{HeimdallError, Result};

/// Longest error body kept in an `Api` error message.
const MAX_ERROR_BODY: usize = 512;

/// Build the HTTP client shared by all adapters.
///
/// No request timeout is set unless one is given; deadlines belong to the
/// caller.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| HeimdallError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Check response status and map to the appropriate error.
pub(crate) async fn check_status(response: Response, provider: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(HeimdallError::Unauthenticated),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(HeimdallError::RateLimited { retry_after })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            let mut message: String = body.chars().take(MAX_ERROR_BODY).collect();
            if message.is_empty() {
                message = format!("{provider} API error: {status}");
            }
            Err(HeimdallError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_and_without_timeout() {
        assert!(build_client(None).is_ok());
        assert!(build_client(Some(Duration::from_secs(5))).is_ok());
    }
}
