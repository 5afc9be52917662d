use super::source::{SourceFuture, WeatherSource};
use crate::config::SourceConfig;
use crate::services::http_client::HttpClient;
use crate::types::{DayWeatherSummary, WeatherForecast};
use crate::{PlannerError, Result};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

const MM_PER_INCH: f64 = 25.4;
const HEAVY_RAIN_INCHES: f64 = 0.4;
const GOOD_TEMP_MIN_F: f64 = 41.0;
const GOOD_TEMP_MAX_F: f64 = 104.0;

/// 5-day / 3-hour forecast response, imperial units
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
    #[serde(default)]
    pub city: Option<ForecastCity>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastCity {
    /// Shift from UTC in seconds
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Deserialize)]
pub struct ForecastSample {
    /// Unix timestamp (UTC)
    pub dt: i64,
    pub main: SampleMain,
    #[serde(default)]
    pub weather: Vec<SampleCondition>,
    #[serde(default)]
    pub wind: Option<SampleWind>,
    #[serde(default)]
    pub rain: Option<SampleVolume>,
    #[serde(default)]
    pub snow: Option<SampleVolume>,
}

#[derive(Debug, Deserialize)]
pub struct SampleMain {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct SampleCondition {
    pub main: String,
}

#[derive(Debug, Deserialize)]
pub struct SampleWind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct SampleVolume {
    /// Millimetres over the last three hours
    #[serde(rename = "3h", default)]
    pub three_hours: f64,
}

/// Forecast source backed by the OpenWeather 5-day forecast endpoint
#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config.request_timeout, config.max_retries)?,
            base_url: config.weather_base_url.trim_end_matches('/').to_string(),
            api_key: config.weather_api_key.clone(),
        })
    }

    async fn fetch(
        &self,
        destination: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<WeatherForecast>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| PlannerError::Config("WEATHER_API_KEY is not configured".to_string()))?;

        let url = format!("{}/data/2.5/forecast", self.base_url);
        let query = [
            ("q", destination.to_string()),
            ("appid", api_key.clone()),
            ("units", "imperial".to_string()),
        ];

        let body = self.http.get_json(&url, &query).await?;
        let response: ForecastResponse = serde_json::from_value(body)?;
        let forecast = summarize_forecast(&response, start, end);

        debug!(
            target: "tripengine::sources",
            destination,
            days = forecast.len(),
            "summarized forecast"
        );

        Ok(if forecast.is_empty() {
            None
        } else {
            Some(forecast)
        })
    }
}

impl WeatherSource for OpenWeatherSource {
    fn name(&self) -> &'static str {
        "openweather"
    }

    fn fetch_forecast<'a>(
        &'a self,
        destination: &'a str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> SourceFuture<'a, Option<WeatherForecast>> {
        Box::pin(self.fetch(destination, start, end))
    }
}

#[derive(Default)]
struct DayAccumulator {
    /// Condition counts in first-seen order
    conditions: Vec<(String, usize)>,
    temps: Vec<f64>,
    wind_speeds: Vec<f64>,
    precipitation_mm: f64,
}

impl DayAccumulator {
    fn push_condition(&mut self, condition: String) {
        match self.conditions.iter_mut().find(|(seen, _)| *seen == condition) {
            Some((_, count)) => *count += 1,
            None => self.conditions.push((condition, 1)),
        }
    }

    /// Most frequent condition; among equal counts the latest to appear wins
    fn dominant_condition(&self) -> String {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.conditions {
            if best.map_or(true, |current| entry.1 >= current.1) {
                best = Some(entry);
            }
        }
        best.map(|(condition, _)| condition.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn summarize(self) -> DayWeatherSummary {
        let count = self.temps.len().max(1) as f64;
        let avg_temp = self.temps.iter().sum::<f64>() / count;
        let min_temp = self.temps.iter().copied().fold(f64::INFINITY, f64::min);
        let max_temp = self.temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg_wind_speed =
            self.wind_speeds.iter().sum::<f64>() / self.wind_speeds.len().max(1) as f64;
        let precipitation = self.precipitation_mm / MM_PER_INCH;

        let has_storm = self
            .conditions
            .iter()
            .any(|(condition, _)| condition.contains("thunderstorm"));
        let is_good_weather = !has_storm
            && precipitation <= HEAVY_RAIN_INCHES
            && avg_temp > GOOD_TEMP_MIN_F
            && avg_temp < GOOD_TEMP_MAX_F;

        DayWeatherSummary {
            condition: self.dominant_condition(),
            avg_temp,
            min_temp,
            max_temp,
            avg_wind_speed,
            precipitation,
            is_good_weather,
        }
    }
}

/// Group 3-hour samples into per-day summaries for days within `[start, end]`.
///
/// Samples are bucketed by the destination's local calendar day.
pub fn summarize_forecast(
    response: &ForecastResponse,
    start: NaiveDate,
    end: NaiveDate,
) -> WeatherForecast {
    let offset_secs = response
        .city
        .as_ref()
        .map_or(0, |city| i64::from(city.timezone));

    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for sample in &response.list {
        let Some(local) = DateTime::from_timestamp(sample.dt + offset_secs, 0) else {
            continue;
        };
        let day = local.date_naive();
        if day < start || day > end {
            continue;
        }

        let bucket = days.entry(day).or_default();
        let condition = sample
            .weather
            .first()
            .map(|weather| weather.main.to_lowercase())
            .unwrap_or_else(|| "unknown".to_string());
        bucket.push_condition(condition);
        bucket.temps.push(sample.main.temp);
        bucket
            .wind_speeds
            .push(sample.wind.as_ref().map_or(0.0, |wind| wind.speed));
        bucket.precipitation_mm += sample.rain.as_ref().map_or(0.0, |v| v.three_hours);
        bucket.precipitation_mm += sample.snow.as_ref().map_or(0.0, |v| v.three_hours);
    }

    days.into_iter()
        .map(|(day, bucket)| (day, bucket.summarize()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    // 2025-06-01T00:00:00Z
    const JUNE_1: i64 = 1_748_736_000;

    fn response(value: serde_json::Value) -> ForecastResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_summarizes_samples_per_day() {
        let forecast = summarize_forecast(
            &response(json!({
                "list": [
                    {"dt": JUNE_1 + 9 * 3600, "main": {"temp": 60.0}, "weather": [{"main": "Clear"}], "wind": {"speed": 4.0}},
                    {"dt": JUNE_1 + 12 * 3600, "main": {"temp": 70.0}, "weather": [{"main": "Clouds"}], "wind": {"speed": 6.0}},
                    {"dt": JUNE_1 + 15 * 3600, "main": {"temp": 80.0}, "weather": [{"main": "Clear"}]},
                    {"dt": JUNE_1 + 33 * 3600, "main": {"temp": 50.0}, "weather": [{"main": "Rain"}], "rain": {"3h": 12.7}}
                ]
            })),
            date(1),
            date(2),
        );

        let first = &forecast[&date(1)];
        assert_eq!(first.condition, "clear");
        assert_eq!(first.avg_temp, 70.0);
        assert_eq!(first.min_temp, 60.0);
        assert_eq!(first.max_temp, 80.0);
        assert!((first.avg_wind_speed - 10.0 / 3.0).abs() < 1e-9);
        assert!(first.is_good_weather);

        let second = &forecast[&date(2)];
        assert_eq!(second.condition, "rain");
        assert!((second.precipitation - 0.5).abs() < 1e-9);
        assert!(!second.is_good_weather);
    }

    #[test]
    fn test_drops_days_outside_window() {
        let forecast = summarize_forecast(
            &response(json!({
                "list": [
                    {"dt": JUNE_1 + 3600, "main": {"temp": 60.0}, "weather": [{"main": "Clear"}]},
                    {"dt": JUNE_1 + 4 * 86_400, "main": {"temp": 60.0}, "weather": [{"main": "Clear"}]}
                ]
            })),
            date(1),
            date(2),
        );
        assert_eq!(forecast.len(), 1);
        assert!(forecast.contains_key(&date(1)));
    }

    #[test]
    fn test_city_timezone_shifts_day_boundary() {
        // 22:00Z on June 1 is already June 2 at UTC+3
        let forecast = summarize_forecast(
            &response(json!({
                "city": {"timezone": 10_800},
                "list": [{"dt": JUNE_1 + 22 * 3600, "main": {"temp": 60.0}, "weather": [{"main": "Clear"}]}]
            })),
            date(1),
            date(3),
        );
        assert!(forecast.contains_key(&date(2)));
        assert!(!forecast.contains_key(&date(1)));
    }

    #[test]
    fn test_thunderstorm_is_never_good_weather() {
        let forecast = summarize_forecast(
            &response(json!({
                "list": [
                    {"dt": JUNE_1 + 3600, "main": {"temp": 72.0}, "weather": [{"main": "Clear"}]},
                    {"dt": JUNE_1 + 7200, "main": {"temp": 72.0}, "weather": [{"main": "Clear"}]},
                    {"dt": JUNE_1 + 10800, "main": {"temp": 72.0}, "weather": [{"main": "Thunderstorm"}]}
                ]
            })),
            date(1),
            date(1),
        );
        let day = &forecast[&date(1)];
        assert_eq!(day.condition, "clear");
        assert!(!day.is_good_weather);
    }

    #[test]
    fn test_ties_go_to_latest_condition() {
        let forecast = summarize_forecast(
            &response(json!({
                "list": [
                    {"dt": JUNE_1 + 3600, "main": {"temp": 72.0}, "weather": [{"main": "Clouds"}]},
                    {"dt": JUNE_1 + 7200, "main": {"temp": 72.0}, "weather": [{"main": "Clear"}]},
                    {"dt": JUNE_1 + 10800, "main": {"temp": 72.0}, "weather": [{"main": "Clouds"}]},
                    {"dt": JUNE_1 + 14400, "main": {"temp": 72.0}, "weather": [{"main": "Mist"}]},
                    {"dt": JUNE_1 + 18000, "main": {"temp": 72.0}, "weather": [{"main": "Mist"}]}
                ]
            })),
            date(1),
            date(1),
        );
        assert_eq!(forecast[&date(1)].condition, "mist");

        let pair = summarize_forecast(
            &response(json!({
                "list": [
                    {"dt": JUNE_1 + 3600, "main": {"temp": 72.0}, "weather": [{"main": "Clouds"}]},
                    {"dt": JUNE_1 + 7200, "main": {"temp": 72.0}, "weather": [{"main": "Clear"}]}
                ]
            })),
            date(1),
            date(1),
        );
        assert_eq!(pair[&date(1)].condition, "clear");
    }
}
