use crate::types::{BudgetTier, CandidatePool, TravelGoal, WeatherForecast};
use chrono::NaiveDate;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by source fetches
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = crate::Result<T>> + Send + 'a>>;

/// Supplies candidate activities per category for a destination
pub trait CandidateSource: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Fetch candidates for every category the source knows about
    fn fetch_candidates<'a>(
        &'a self,
        destination: &'a str,
        tier: BudgetTier,
        goal: TravelGoal,
    ) -> SourceFuture<'a, CandidatePool>;
}

/// Supplies per-day weather summaries for a destination
pub trait WeatherSource: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Fetch the forecast for `[start, end]`; `Ok(None)` means no data
    fn fetch_forecast<'a>(
        &'a self,
        destination: &'a str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SourceFuture<'a, Option<WeatherForecast>>;
}

/// Weather source that never has data, for offline runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWeather;

impl WeatherSource for NoWeather {
    fn name(&self) -> &'static str {
        "none"
    }

    fn fetch_forecast<'a>(
        &'a self,
        _destination: &'a str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> SourceFuture<'a, Option<WeatherForecast>> {
        Box::pin(async { Ok(None) })
    }
}
