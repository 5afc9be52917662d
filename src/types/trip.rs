use crate::request_schema;
use crate::types::clock_time;
use crate::PlannerError;
use chrono::{Duration, NaiveDate, NaiveTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How densely each day is packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStyle {
    Relaxed,
    #[default]
    Moderate,
    Busy,
}

impl ScheduleStyle {
    pub fn events_per_day(&self) -> usize {
        match self {
            ScheduleStyle::Relaxed => 3,
            ScheduleStyle::Moderate => 5,
            ScheduleStyle::Busy => 7,
        }
    }
}

/// Which of the two time-of-day anchors each category uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DailyStart {
    #[default]
    Early,
    Late,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Budget,
    #[default]
    Mid,
    Luxury,
}

impl BudgetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Budget => "budget",
            BudgetTier::Mid => "mid",
            BudgetTier::Luxury => "luxury",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TravelGoal {
    #[default]
    None,
    Relax,
    Explore,
    Food,
}

impl TravelGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelGoal::None => "none",
            TravelGoal::Relax => "relax",
            TravelGoal::Explore => "explore",
            TravelGoal::Food => "food",
        }
    }
}

/// A place the traveler wants on a specific day, scheduled verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FixedCommitment {
    /// Free-text place name
    pub place: String,
    /// Calendar day the commitment belongs to
    pub day: NaiveDate,
    /// Clock time in `HH:MM`; defaults to 10:00
    #[serde(default, with = "clock_time::option")]
    #[schemars(with = "Option<String>")]
    pub time: Option<NaiveTime>,
    /// Duration in minutes; defaults to 120
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Estimated cost, exempt from the daily ceiling
    #[serde(default)]
    pub cost: Option<f64>,
}

impl FixedCommitment {
    pub const DEFAULT_DURATION_MINUTES: u32 = 120;

    pub fn new(place: impl Into<String>, day: NaiveDate) -> Self {
        Self {
            place: place.into(),
            day,
            time: None,
            duration_minutes: None,
            cost: None,
        }
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn lasting(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn costing(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn start_time(&self) -> NaiveTime {
        self.time.unwrap_or_else(default_commitment_time)
    }

    pub fn duration(&self) -> u32 {
        self.duration_minutes
            .unwrap_or(Self::DEFAULT_DURATION_MINUTES)
    }
}

fn default_commitment_time() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Trip window and preferences for itinerary generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[request_schema(name = "TripRequest")]
pub struct TripWindow {
    /// Destination city, e.g. "Lisbon, Portugal"
    pub destination: String,
    /// First day of the trip (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the trip (inclusive)
    pub end_date: NaiveDate,
    /// relaxed, moderate or busy (3, 5 or 7 events per day)
    #[serde(default)]
    pub schedule_style: ScheduleStyle,
    /// early or late start of each day
    #[serde(default)]
    pub daily_start: DailyStart,
    /// budget, mid or luxury
    #[serde(default)]
    pub budget_tier: BudgetTier,
    /// none, relax, explore or food
    #[serde(default)]
    pub goal: TravelGoal,
    /// Places that must appear on a given day
    #[serde(default, alias = "specific_places")]
    pub fixed_commitments: Vec<FixedCommitment>,
}

impl TripWindow {
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            destination: destination.into(),
            start_date,
            end_date,
            schedule_style: ScheduleStyle::default(),
            daily_start: DailyStart::default(),
            budget_tier: BudgetTier::default(),
            goal: TravelGoal::default(),
            fixed_commitments: Vec::new(),
        }
    }

    pub fn with_schedule_style(mut self, style: ScheduleStyle) -> Self {
        self.schedule_style = style;
        self
    }

    pub fn with_daily_start(mut self, daily_start: DailyStart) -> Self {
        self.daily_start = daily_start;
        self
    }

    pub fn with_budget_tier(mut self, tier: BudgetTier) -> Self {
        self.budget_tier = tier;
        self
    }

    pub fn with_goal(mut self, goal: TravelGoal) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_commitment(mut self, commitment: FixedCommitment) -> Self {
        self.fixed_commitments.push(commitment);
        self
    }

    /// Number of calendar days in the window, 0 when end precedes start.
    pub fn total_days(&self) -> u32 {
        let span = (self.end_date - self.start_date).num_days() + 1;
        u32::try_from(span.max(0)).unwrap_or(u32::MAX)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..i64::from(self.total_days())).map(move |offset| self.start_date + Duration::days(offset))
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start_date && day <= self.end_date
    }

    pub fn commitments_on(&self, day: NaiveDate) -> Vec<&FixedCommitment> {
        self.fixed_commitments
            .iter()
            .filter(|commitment| commitment.day == day)
            .collect()
    }

    /// Boundary checks the generator itself does not enforce.
    pub fn validate(&self) -> crate::Result<()> {
        if self.destination.trim().is_empty() {
            return Err(PlannerError::Validation(
                "destination is required".to_string(),
            ));
        }

        if self.end_date < self.start_date {
            return Err(PlannerError::Validation(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }

        for (idx, commitment) in self.fixed_commitments.iter().enumerate() {
            if !self.contains(commitment.day) {
                return Err(PlannerError::Validation(format!(
                    "fixed_commitments[{}] ({}) on {} is outside the trip dates",
                    idx, commitment.place, commitment.day
                )));
            }
            if let Some(cost) = commitment.cost {
                if !cost.is_finite() || cost < 0.0 {
                    return Err(PlannerError::Validation(format!(
                        "fixed_commitments[{}] has invalid cost {}",
                        idx, cost
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[test]
    fn test_total_days_is_inclusive() {
        let trip = TripWindow::new("Lisbon", date(1), date(3));
        assert_eq!(trip.total_days(), 3);
        assert_eq!(trip.days().collect::<Vec<_>>(), vec![date(1), date(2), date(3)]);
    }

    #[test]
    fn test_inverted_window_has_no_days() {
        let trip = TripWindow::new("Lisbon", date(5), date(3));
        assert_eq!(trip.total_days(), 0);
        assert_eq!(trip.days().count(), 0);
        assert!(trip.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_commitment() {
        let trip = TripWindow::new("Lisbon", date(1), date(3))
            .with_commitment(FixedCommitment::new("Belem Tower", date(9)));
        let err = trip.validate().unwrap_err();
        assert!(err.to_string().contains("outside the trip dates"));
    }

    #[test]
    fn test_commitment_defaults() {
        let commitment = FixedCommitment::new("Museum", date(2));
        assert_eq!(commitment.start_time(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(commitment.duration(), 120);
    }

    #[test]
    fn test_request_accepts_specific_places_alias() {
        let trip: TripWindow = serde_json::from_value(serde_json::json!({
            "destination": "Lisbon",
            "start_date": "2025-06-01",
            "end_date": "2025-06-02",
            "schedule_style": "busy",
            "specific_places": [{"place": "Oceanarium", "day": "2025-06-02", "time": "13:30"}]
        }))
        .unwrap();

        assert_eq!(trip.schedule_style.events_per_day(), 7);
        assert_eq!(trip.goal, TravelGoal::None);
        assert_eq!(
            trip.fixed_commitments[0].time,
            NaiveTime::from_hms_opt(13, 30, 0)
        );
    }

    #[test]
    fn test_commitment_time_schema_and_serialization() {
        let schema = serde_json::to_value(schemars::schema_for!(FixedCommitment)).unwrap();
        assert!(schema["properties"]["time"].to_string().contains("string"));

        let commitment = FixedCommitment::new("Oceanarium", date(2))
            .at(NaiveTime::from_hms_opt(13, 30, 0).unwrap());
        let value = serde_json::to_value(&commitment).unwrap();
        assert_eq!(value["time"], "13:30");

        let untimed = serde_json::to_value(FixedCommitment::new("Oceanarium", date(2))).unwrap();
        assert!(untimed["time"].is_null());
    }
}
