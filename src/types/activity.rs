use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Activity type used by the filter and the day scheduler.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Breakfast,
    MorningActivity,
    CulturalSite,
    Lunch,
    AfternoonActivity,
    OutdoorActivity,
    AfternoonRest,
    Shopping,
    Dinner,
    EveningEntertainment,
    Nightlife,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 11] = [
        ActivityCategory::Breakfast,
        ActivityCategory::MorningActivity,
        ActivityCategory::CulturalSite,
        ActivityCategory::Lunch,
        ActivityCategory::AfternoonActivity,
        ActivityCategory::OutdoorActivity,
        ActivityCategory::AfternoonRest,
        ActivityCategory::Shopping,
        ActivityCategory::Dinner,
        ActivityCategory::EveningEntertainment,
        ActivityCategory::Nightlife,
    ];

    /// Categories a candidate source is expected to return.
    /// `AfternoonRest` only ever appears as a weather backup.
    pub const SOURCED: [ActivityCategory; 10] = [
        ActivityCategory::Breakfast,
        ActivityCategory::MorningActivity,
        ActivityCategory::CulturalSite,
        ActivityCategory::Lunch,
        ActivityCategory::AfternoonActivity,
        ActivityCategory::OutdoorActivity,
        ActivityCategory::Shopping,
        ActivityCategory::Dinner,
        ActivityCategory::EveningEntertainment,
        ActivityCategory::Nightlife,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Breakfast => "breakfast",
            ActivityCategory::MorningActivity => "morning_activity",
            ActivityCategory::CulturalSite => "cultural_site",
            ActivityCategory::Lunch => "lunch",
            ActivityCategory::AfternoonActivity => "afternoon_activity",
            ActivityCategory::OutdoorActivity => "outdoor_activity",
            ActivityCategory::AfternoonRest => "afternoon_rest",
            ActivityCategory::Shopping => "shopping",
            ActivityCategory::Dinner => "dinner",
            ActivityCategory::EveningEntertainment => "evening_entertainment",
            ActivityCategory::Nightlife => "nightlife",
        }
    }

    /// Typical length of a visit, used when a source has no better estimate.
    pub fn default_duration_minutes(&self) -> u32 {
        match self {
            ActivityCategory::Breakfast => 60,
            ActivityCategory::MorningActivity => 150,
            ActivityCategory::CulturalSite => 120,
            ActivityCategory::Lunch => 90,
            ActivityCategory::AfternoonActivity => 120,
            ActivityCategory::OutdoorActivity => 180,
            ActivityCategory::AfternoonRest => 120,
            ActivityCategory::Shopping => 90,
            ActivityCategory::Dinner => 90,
            ActivityCategory::EveningEntertainment => 120,
            ActivityCategory::Nightlife => 90,
        }
    }

    /// Human readable label, e.g. `cultural site`
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A place or experience that may be scheduled into a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCandidate {
    pub category: ActivityCategory,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub estimated_cost: f64,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl ActivityCandidate {
    pub fn new(
        category: ActivityCategory,
        name: impl Into<String>,
        estimated_cost: f64,
        duration_minutes: u32,
    ) -> Self {
        Self {
            category,
            name: name.into(),
            address: String::new(),
            estimated_cost,
            duration_minutes,
            rating: None,
            external_id: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }
}

/// Candidates grouped by category, as returned by a candidate source.
pub type CandidatePool = BTreeMap<ActivityCategory, Vec<ActivityCandidate>>;

/// Flatten a pool into a single list, ordered by category.
pub fn flatten_pool(pool: &CandidatePool) -> Vec<ActivityCandidate> {
    pool.values().flatten().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_snake_case() {
        let json = serde_json::to_string(&ActivityCategory::EveningEntertainment).unwrap();
        assert_eq!(json, "\"evening_entertainment\"");
        assert_eq!(ActivityCategory::EveningEntertainment.label(), "evening entertainment");
    }

    #[test]
    fn test_sourced_excludes_afternoon_rest() {
        assert!(!ActivityCategory::SOURCED.contains(&ActivityCategory::AfternoonRest));
        assert_eq!(ActivityCategory::SOURCED.len() + 1, ActivityCategory::ALL.len());
    }

    #[test]
    fn test_flatten_pool_orders_by_category() {
        let mut pool = CandidatePool::new();
        pool.insert(
            ActivityCategory::Dinner,
            vec![ActivityCandidate::new(ActivityCategory::Dinner, "Bistro", 40.0, 90)],
        );
        pool.insert(
            ActivityCategory::Breakfast,
            vec![ActivityCandidate::new(ActivityCategory::Breakfast, "Cafe", 10.0, 60)],
        );

        let flat = flatten_pool(&pool);
        assert_eq!(flat[0].name, "Cafe");
        assert_eq!(flat[1].name, "Bistro");
    }
}
