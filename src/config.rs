use crate::types::ActivityCategory;
use crate::{PlannerError, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_RETRIES: usize = 2;

/// Settings for the live candidate and weather sources
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub weather_api_key: Option<String>,
    pub weather_base_url: String,
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub request_timeout: Duration,
    pub max_retries: usize,
    /// Cap on a whole source fetch; derived from `request_timeout` when unset
    pub fetch_timeout: Option<Duration>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            places_api_key: None,
            places_base_url: DEFAULT_PLACES_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            fetch_timeout: None,
        }
    }
}

impl SourceConfig {
    /// Read settings from the process environment.
    ///
    /// Missing API keys are not an error: the matching source degrades to
    /// its fallback at generation time.
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            weather_api_key: non_empty_var("WEATHER_API_KEY"),
            places_api_key: non_empty_var("PLACES_API_KEY"),
            ..Self::default()
        };

        if let Some(url) = non_empty_var("WEATHER_BASE_URL") {
            config.weather_base_url = url;
        }
        if let Some(url) = non_empty_var("PLACES_BASE_URL") {
            config.places_base_url = url;
        }

        if let Some(raw) = non_empty_var("TRIP_ENGINE_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                PlannerError::Config(format!(
                    "TRIP_ENGINE_TIMEOUT_SECS must be a whole number of seconds, got `{}`",
                    raw
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = non_empty_var("TRIP_ENGINE_FETCH_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                PlannerError::Config(format!(
                    "TRIP_ENGINE_FETCH_TIMEOUT_SECS must be a whole number of seconds, got `{}`",
                    raw
                ))
            })?;
            config.fetch_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(raw) = non_empty_var("TRIP_ENGINE_MAX_RETRIES") {
            config.max_retries = raw.parse().map_err(|_| {
                PlannerError::Config(format!(
                    "TRIP_ENGINE_MAX_RETRIES must be a non-negative integer, got `{}`",
                    raw
                ))
            })?;
        }

        Ok(config)
    }

    pub fn with_weather_api_key(mut self, key: impl Into<String>) -> Self {
        self.weather_api_key = Some(key.into());
        self
    }

    pub fn with_weather_base_url(mut self, url: impl Into<String>) -> Self {
        self.weather_base_url = url.into();
        self
    }

    pub fn with_places_api_key(mut self, key: impl Into<String>) -> Self {
        self.places_api_key = Some(key.into());
        self
    }

    pub fn with_places_base_url(mut self, url: impl Into<String>) -> Self {
        self.places_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Time allowed for one complete source fetch.
    ///
    /// Places issues one search per sourced category in sequence, so the
    /// default covers that many request timeouts.
    pub fn fetch_budget(&self) -> Duration {
        self.fetch_timeout
            .unwrap_or_else(|| self.request_timeout * ActivityCategory::SOURCED.len() as u32)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = SourceConfig::default()
            .with_weather_api_key("abc")
            .with_places_base_url("http://localhost:1234")
            .with_timeout(Duration::from_secs(3))
            .with_max_retries(0);

        assert_eq!(config.weather_api_key.as_deref(), Some("abc"));
        assert_eq!(config.places_base_url, "http://localhost:1234");
        assert_eq!(config.weather_base_url, DEFAULT_WEATHER_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_fetch_budget_covers_every_category_search() {
        let config = SourceConfig::default().with_timeout(Duration::from_secs(30));
        assert_eq!(
            config.fetch_budget(),
            Duration::from_secs(30 * ActivityCategory::SOURCED.len() as u64)
        );

        let capped = config.with_fetch_timeout(Duration::from_secs(45));
        assert_eq!(capped.fetch_budget(), Duration::from_secs(45));
    }
}
