use super::activity::ActivityCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const GREAT_WEATHER: &str = "Great weather for outdoor activities!";
const INDOOR_ALTERNATIVES: &str = "Consider indoor alternatives";

/// Aggregated forecast for one calendar day.
///
/// Temperatures are Fahrenheit, wind speed is mph and precipitation is the
/// accumulated rain plus snow in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayWeatherSummary {
    pub condition: String,
    pub avg_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_wind_speed: f64,
    pub precipitation: f64,
    pub is_good_weather: bool,
}

impl DayWeatherSummary {
    pub fn slim(&self) -> DayWeatherSlim {
        DayWeatherSlim {
            condition: self.condition.clone(),
            temperature: self.avg_temp.round(),
            precipitation: self.precipitation,
            recommendation: if self.is_good_weather {
                GREAT_WEATHER.to_string()
            } else {
                INDOOR_ALTERNATIVES.to_string()
            },
        }
    }
}

/// Forecast keyed by calendar day. Missing days carry no constraint.
pub type WeatherForecast = BTreeMap<NaiveDate, DayWeatherSummary>;

/// Per-day weather shape returned alongside the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayWeatherSlim {
    pub condition: String,
    pub temperature: f64,
    pub precipitation: f64,
    pub recommendation: String,
}

impl DayWeatherSlim {
    /// Short explanation of why a category suits the day's weather, if any.
    pub fn activity_note(&self, category: ActivityCategory) -> Option<&'static str> {
        use ActivityCategory::*;

        let temp = self.temperature;
        let condition = self.condition.as_str();

        if (condition.contains("rain") || condition.contains("storm"))
            && matches!(category, CulturalSite | Shopping | AfternoonRest)
        {
            return Some("Indoor activity recommended due to rain");
        }

        if temp > 86.0 && matches!(category, CulturalSite | Shopping) {
            return Some("Indoor activity recommended due to high temperature");
        }

        if temp < 41.0 && matches!(category, CulturalSite | Shopping | EveningEntertainment) {
            return Some("Indoor activity recommended due to cold weather");
        }

        if condition == "clear"
            && temp > 59.0
            && temp < 82.0
            && matches!(category, OutdoorActivity | MorningActivity)
        {
            return Some("Perfect weather for outdoor activities!");
        }

        None
    }
}
