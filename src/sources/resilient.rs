//! Decorators that turn fallible sources into degraded-but-complete data.

use super::source::{CandidateSource, WeatherSource};
use super::static_table::StaticCandidateSource;
use crate::types::{BudgetTier, CandidatePool, TravelGoal, WeatherForecast};
use crate::PlannerError;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Candidate source that always yields a usable pool.
///
/// Errors, timeouts and empty pools fall back to the static table.
#[derive(Debug)]
pub struct ResilientCandidates {
    inner: Box<dyn CandidateSource>,
    timeout: Duration,
}

impl ResilientCandidates {
    pub fn new<S: CandidateSource + 'static>(source: S) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(inner: Box<dyn CandidateSource>) -> Self {
        Self {
            inner,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn source_name(&self) -> &'static str {
        self.inner.name()
    }

    pub async fn fetch(&self, destination: &str, tier: BudgetTier, goal: TravelGoal) -> CandidatePool {
        let outcome = tokio::time::timeout(
            self.timeout,
            self.inner.fetch_candidates(destination, tier, goal),
        )
        .await
        .unwrap_or_else(|_| {
            Err(PlannerError::Timeout(format!(
                "candidate fetch exceeded {:?}",
                self.timeout
            )))
        });

        match outcome {
            Ok(pool) if pool.values().any(|candidates| !candidates.is_empty()) => {
                info!(
                    target: "tripengine::sources",
                    source = self.inner.name(),
                    categories = pool.len(),
                    "fetched activity candidates"
                );
                pool
            }
            Ok(_) => {
                warn!(
                    target: "tripengine::sources",
                    source = self.inner.name(),
                    "candidate source returned no activities, using static table"
                );
                StaticCandidateSource::pool(tier)
            }
            Err(err) => {
                warn!(
                    target: "tripengine::sources",
                    source = self.inner.name(),
                    error = %err,
                    "candidate source unavailable, using static table"
                );
                StaticCandidateSource::pool(tier)
            }
        }
    }
}

/// Weather source whose failures mean "no weather constraint".
#[derive(Debug)]
pub struct ResilientWeather {
    inner: Box<dyn WeatherSource>,
    timeout: Duration,
}

impl ResilientWeather {
    pub fn new<S: WeatherSource + 'static>(source: S) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(inner: Box<dyn WeatherSource>) -> Self {
        Self {
            inner,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn source_name(&self) -> &'static str {
        self.inner.name()
    }

    pub async fn fetch(
        &self,
        destination: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<WeatherForecast> {
        let outcome = tokio::time::timeout(
            self.timeout,
            self.inner.fetch_forecast(destination, start, end),
        )
        .await
        .unwrap_or_else(|_| {
            Err(PlannerError::Timeout(format!(
                "forecast fetch exceeded {:?}",
                self.timeout
            )))
        });

        match outcome {
            Ok(forecast) => forecast,
            Err(err) => {
                warn!(
                    target: "tripengine::sources",
                    source = self.inner.name(),
                    error = %err,
                    "weather source unavailable, continuing without weather"
                );
                None
            }
        }
    }
}
