//! Outbound HTTP plumbing shared by the Steam and SteamSpy clients.

use thiserror::Error;

use crate::rate_limit::RateLimiter;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// GET `url` with `params` and parse the body as JSON. When a limiter is
/// supplied the call queues for a send slot first.
pub async fn get_json(
    client: &reqwest::Client,
    limiter: Option<&RateLimiter>,
    url: &str,
    params: &[(&str, String)],
) -> Result<serde_json::Value, RemoteError> {
    if let Some(limiter) = limiter {
        limiter.acquire().await;
    }

    let response = client.get(url).query(params).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RemoteError::Status { status, body });
    }

    Ok(response.json().await?)
}
