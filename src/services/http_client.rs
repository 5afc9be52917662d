use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::error::{PlannerError, Result};

const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// JSON-over-HTTP client shared by the live sources.
///
/// Retries rate-limited and server-error responses with exponential backoff;
/// everything else is returned to the caller on the first attempt.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    max_retries: usize,
}

impl HttpClient {
    pub fn new(timeout: Duration, max_retries: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trip-engine-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| PlannerError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            max_retries,
        })
    }

    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let mut attempt = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let response = self.client.get(url).query(query).send().await?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response.text().await?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_duration = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < self.max_retries {
                    debug!(target: "tripengine::http", url, attempt, "rate limited, retrying");
                    tokio::time::sleep(retry_after_duration).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(PlannerError::RateLimit {
                    retry_after: retry_after_duration.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < self.max_retries {
                debug!(target: "tripengine::http", url, attempt, %status, "server error, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                return Err(PlannerError::unavailable(
                    url,
                    format!("HTTP {}: {}", status, truncate(&response_text, 200)),
                ));
            }

            return Ok(serde_json::from_str(&response_text)?);
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
