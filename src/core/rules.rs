//! Rule tables consumed by the activity filter and the day scheduler.

use crate::types::{ActivityCategory, BudgetTier, DailyStart, DayWeatherSummary, TravelGoal};
use std::collections::BTreeMap;

use ActivityCategory::*;

const RELAX: &[ActivityCategory] = &[
    Breakfast,
    Lunch,
    Dinner,
    AfternoonRest,
    Shopping,
    MorningActivity,
    OutdoorActivity,
];
const EXPLORE: &[ActivityCategory] = &[
    Breakfast,
    Lunch,
    Dinner,
    MorningActivity,
    OutdoorActivity,
    CulturalSite,
    AfternoonActivity,
];
const FOOD: &[ActivityCategory] = &[
    Breakfast,
    Lunch,
    Dinner,
    MorningActivity,
    Shopping,
    CulturalSite,
];

/// Categories a travel goal keeps; `None` keeps everything.
pub fn goal_whitelist(goal: TravelGoal) -> Option<&'static [ActivityCategory]> {
    match goal {
        TravelGoal::None => None,
        TravelGoal::Relax => Some(RELAX),
        TravelGoal::Explore => Some(EXPLORE),
        TravelGoal::Food => Some(FOOD),
    }
}

/// Category preferences and the per-day spending ceiling of a budget tier
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetTierConfig {
    pub preferred: Vec<ActivityCategory>,
    pub avoid: Vec<ActivityCategory>,
    pub daily_ceiling: f64,
}

impl BudgetTierConfig {
    pub fn is_preferred(&self, category: ActivityCategory) -> bool {
        self.preferred.contains(&category)
    }

    pub fn is_avoided(&self, category: ActivityCategory) -> bool {
        self.avoid.contains(&category)
    }
}

/// Weather conditions that rule a category out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hazard {
    Rain,
    HeavyRain,
    Thunderstorm,
    SevereThunderstorm,
    Snow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRule {
    pub avoid: Vec<Hazard>,
    /// Inclusive Fahrenheit range
    pub preferred_temp: Option<(f64, f64)>,
    pub max_wind_speed: Option<f64>,
    /// Offered as a substitute when bad weather empties the day
    pub backup: bool,
}

impl WeatherRule {
    fn avoiding(avoid: &[Hazard]) -> Self {
        Self {
            avoid: avoid.to_vec(),
            preferred_temp: None,
            max_wind_speed: None,
            backup: false,
        }
    }

    fn temp(mut self, min: f64, max: f64) -> Self {
        self.preferred_temp = Some((min, max));
        self
    }

    fn wind(mut self, max: f64) -> Self {
        self.max_wind_speed = Some(max);
        self
    }

    fn as_backup(mut self) -> Self {
        self.backup = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterRules {
    pub budget: BudgetTierConfig,
    pub mid: BudgetTierConfig,
    pub luxury: BudgetTierConfig,
    pub weather: BTreeMap<ActivityCategory, WeatherRule>,
    /// Inches
    pub rain_threshold: f64,
    pub heavy_rain_threshold: f64,
    /// Mph above which a thunderstorm counts as severe
    pub severe_wind_speed: f64,
    /// Backups are added when fewer candidates than this survive
    pub min_survivors: usize,
    pub max_backups: usize,
}

impl Default for FilterRules {
    fn default() -> Self {
        use Hazard::*;

        let weather = BTreeMap::from([
            (
                OutdoorActivity,
                WeatherRule::avoiding(&[Rain, Thunderstorm, Snow])
                    .temp(59.0, 95.0)
                    .wind(12.0),
            ),
            (
                MorningActivity,
                WeatherRule::avoiding(&[Thunderstorm, HeavyRain]).temp(50.0, 100.0),
            ),
            (
                CulturalSite,
                WeatherRule::avoiding(&[SevereThunderstorm]).as_backup(),
            ),
            (
                Shopping,
                WeatherRule::avoiding(&[SevereThunderstorm]).as_backup(),
            ),
            (
                EveningEntertainment,
                WeatherRule::avoiding(&[SevereThunderstorm]).temp(40.0, 100.0),
            ),
            (AfternoonRest, WeatherRule::avoiding(&[]).as_backup()),
        ]);

        Self {
            budget: BudgetTierConfig {
                preferred: vec![AfternoonRest, OutdoorActivity, MorningActivity],
                avoid: vec![Shopping, EveningEntertainment, Nightlife],
                daily_ceiling: 100.0,
            },
            mid: BudgetTierConfig {
                preferred: vec![CulturalSite, MorningActivity, AfternoonActivity],
                avoid: Vec::new(),
                daily_ceiling: 250.0,
            },
            luxury: BudgetTierConfig {
                preferred: vec![EveningEntertainment, CulturalSite, Shopping, Nightlife],
                avoid: vec![AfternoonRest],
                daily_ceiling: 500.0,
            },
            weather,
            rain_threshold: 0.08,
            heavy_rain_threshold: 0.4,
            severe_wind_speed: 18.0,
            min_survivors: 3,
            max_backups: 3,
        }
    }
}

impl FilterRules {
    pub fn tier(&self, tier: BudgetTier) -> &BudgetTierConfig {
        match tier {
            BudgetTier::Budget => &self.budget,
            BudgetTier::Mid => &self.mid,
            BudgetTier::Luxury => &self.luxury,
        }
    }

    pub fn weather_rule(&self, category: ActivityCategory) -> Option<&WeatherRule> {
        self.weather.get(&category)
    }

    pub fn is_backup(&self, category: ActivityCategory) -> bool {
        self.weather_rule(category).is_some_and(|rule| rule.backup)
    }

    pub fn hazard_present(&self, hazard: Hazard, weather: &DayWeatherSummary) -> bool {
        let storm = weather.condition.contains("thunderstorm");
        match hazard {
            Hazard::Rain => weather.precipitation > self.rain_threshold,
            Hazard::HeavyRain => weather.precipitation > self.heavy_rain_threshold,
            Hazard::Thunderstorm => storm,
            Hazard::SevereThunderstorm => storm && weather.avg_wind_speed > self.severe_wind_speed,
            Hazard::Snow => weather.condition.contains("snow"),
        }
    }

    /// Whether a category may be scheduled on a day with this weather
    pub fn weather_allows(&self, category: ActivityCategory, weather: &DayWeatherSummary) -> bool {
        let Some(rule) = self.weather_rule(category) else {
            return true;
        };

        if rule
            .avoid
            .iter()
            .any(|hazard| self.hazard_present(*hazard, weather))
        {
            return false;
        }

        if let Some((min, max)) = rule.preferred_temp {
            if weather.avg_temp < min || weather.avg_temp > max {
                return false;
            }
        }

        match rule.max_wind_speed {
            Some(max) => weather.avg_wind_speed <= max,
            None => true,
        }
    }
}

/// Early and late start anchors, in minutes after midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub early: u32,
    pub late: u32,
}

impl TimeSlot {
    const fn at(early: (u32, u32), late: (u32, u32)) -> Self {
        Self {
            early: early.0 * 60 + early.1,
            late: late.0 * 60 + late.1,
        }
    }

    pub fn start_minutes(&self, daily_start: DailyStart) -> u32 {
        match daily_start {
            DailyStart::Early => self.early,
            DailyStart::Late => self.late,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRules {
    pub slots: BTreeMap<ActivityCategory, TimeSlot>,
    /// Minimum gap kept around already accepted events
    pub buffer_minutes: i64,
    /// Gap inserted when overlap resolution moves an event
    pub shift_minutes: i64,
}

impl Default for ScheduleRules {
    fn default() -> Self {
        Self {
            slots: BTreeMap::from([
                (Breakfast, TimeSlot::at((8, 0), (9, 0))),
                (MorningActivity, TimeSlot::at((9, 30), (10, 30))),
                (CulturalSite, TimeSlot::at((11, 0), (12, 0))),
                (Lunch, TimeSlot::at((13, 0), (14, 0))),
                (AfternoonActivity, TimeSlot::at((14, 30), (15, 30))),
                (OutdoorActivity, TimeSlot::at((15, 0), (16, 0))),
                (AfternoonRest, TimeSlot::at((16, 0), (17, 0))),
                (Shopping, TimeSlot::at((17, 30), (18, 30))),
                (Dinner, TimeSlot::at((19, 0), (20, 0))),
                (EveningEntertainment, TimeSlot::at((20, 30), (21, 30))),
                (Nightlife, TimeSlot::at((22, 0), (23, 0))),
            ]),
            buffer_minutes: 15,
            shift_minutes: 30,
        }
    }
}

impl ScheduleRules {
    pub fn slot(&self, category: ActivityCategory) -> Option<TimeSlot> {
        self.slots.get(&category).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(condition: &str, avg_temp: f64, wind: f64, precipitation: f64) -> DayWeatherSummary {
        DayWeatherSummary {
            condition: condition.to_string(),
            avg_temp,
            min_temp: avg_temp,
            max_temp: avg_temp,
            avg_wind_speed: wind,
            precipitation,
            is_good_weather: false,
        }
    }

    #[test]
    fn test_every_category_has_a_slot() {
        let rules = ScheduleRules::default();
        for category in ActivityCategory::ALL {
            assert!(rules.slot(category).is_some(), "{category} has no slot");
        }
        let lunch = rules.slot(Lunch).unwrap();
        assert_eq!(lunch.start_minutes(DailyStart::Early), 13 * 60);
        assert_eq!(lunch.start_minutes(DailyStart::Late), 14 * 60);
    }

    #[test]
    fn test_hazard_thresholds_are_strict() {
        let rules = FilterRules::default();
        assert!(!rules.hazard_present(Hazard::Rain, &weather("clouds", 70.0, 5.0, 0.08)));
        assert!(rules.hazard_present(Hazard::Rain, &weather("clouds", 70.0, 5.0, 0.09)));
        assert!(!rules.hazard_present(
            Hazard::SevereThunderstorm,
            &weather("thunderstorm", 70.0, 18.0, 0.0)
        ));
        assert!(rules.hazard_present(
            Hazard::SevereThunderstorm,
            &weather("thunderstorm", 70.0, 18.5, 0.0)
        ));
    }

    #[test]
    fn test_outdoor_limits_are_inclusive() {
        let rules = FilterRules::default();
        assert!(rules.weather_allows(OutdoorActivity, &weather("clear", 95.0, 12.0, 0.0)));
        assert!(!rules.weather_allows(OutdoorActivity, &weather("clear", 95.5, 5.0, 0.0)));
        assert!(!rules.weather_allows(OutdoorActivity, &weather("clear", 70.0, 12.5, 0.0)));
        assert!(rules.weather_allows(Dinner, &weather("thunderstorm", 20.0, 40.0, 3.0)));
    }

    #[test]
    fn test_goal_whitelists() {
        assert!(goal_whitelist(TravelGoal::None).is_none());
        assert!(goal_whitelist(TravelGoal::Food).unwrap().contains(&Shopping));
        assert!(!goal_whitelist(TravelGoal::Explore).unwrap().contains(&Nightlife));
    }
}
