use super::activity::ActivityCategory;
use super::weather::DayWeatherSlim;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of a generated day schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub title: String,
    /// Source category; `None` for fixed commitments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ActivityCategory>,
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: String,
    pub estimated_cost: f64,
    pub is_fixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_note: Option<String>,
}

impl ScheduledEvent {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &ScheduledEvent) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Result of an itinerary generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    pub events: Vec<ScheduledEvent>,
    pub weather_summary: BTreeMap<NaiveDate, DayWeatherSlim>,
    pub destination: String,
    pub total_days: u32,
}

impl Itinerary {
    pub fn empty(destination: impl Into<String>) -> Self {
        Self {
            events: Vec::new(),
            weather_summary: BTreeMap::new(),
            destination: destination.into(),
            total_days: 0,
        }
    }

    pub fn events_on(&self, day: NaiveDate) -> Vec<&ScheduledEvent> {
        self.events.iter().filter(|event| event.date == day).collect()
    }

    pub fn total_estimated_cost(&self) -> f64 {
        self.events.iter().map(|event| event.estimated_cost).sum()
    }

    /// Generate a human-readable day-by-day rendering
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("=== Itinerary: {} ===", self.destination));
        lines.push(format!("Days: {}", self.total_days));
        lines.push(format!(
            "Estimated cost: ${:.2}",
            self.total_estimated_cost()
        ));

        let mut current_day = None;
        for event in &self.events {
            if current_day != Some(event.date) {
                current_day = Some(event.date);
                lines.push(String::new());
                match self.weather_summary.get(&event.date) {
                    Some(weather) => lines.push(format!(
                        "--- {} ({}, {:.0}F) ---",
                        event.date, weather.condition, weather.temperature
                    )),
                    None => lines.push(format!("--- {} ---", event.date)),
                }
            }

            let marker = if event.is_fixed { "*" } else { "-" };
            let mut line = format!(
                "{} {}-{} {} @ {} (${:.2})",
                marker,
                event.start.format("%H:%M"),
                event.end.format("%H:%M"),
                event.title,
                event.location,
                event.estimated_cost
            );
            if let Some(note) = &event.weather_note {
                line.push_str(&format!(" [{}]", note));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}
