use super::rules::{goal_whitelist, FilterRules};
use crate::types::{ActivityCandidate, BudgetTier, DayWeatherSummary, TravelGoal};
use std::cmp::Ordering;

/// Narrows and orders a day's candidates by goal, budget tier and weather.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    rules: FilterRules,
}

impl ActivityFilter {
    pub fn new(rules: FilterRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FilterRules {
        &self.rules
    }

    /// Goal whitelist followed by the tier's preference ordering
    pub fn by_goal_and_tier(
        &self,
        candidates: &[ActivityCandidate],
        goal: TravelGoal,
        tier: BudgetTier,
    ) -> Vec<ActivityCandidate> {
        let whitelist = goal_whitelist(goal);
        let config = self.rules.tier(tier);

        let mut filtered: Vec<ActivityCandidate> = candidates
            .iter()
            .filter(|candidate| whitelist.map_or(true, |allowed| allowed.contains(&candidate.category)))
            .cloned()
            .collect();

        filtered.sort_by(|a, b| {
            let preferred = config
                .is_preferred(b.category)
                .cmp(&config.is_preferred(a.category));
            let avoided = config
                .is_avoided(a.category)
                .cmp(&config.is_avoided(b.category));
            preferred.then(avoided).then_with(|| {
                a.estimated_cost
                    .partial_cmp(&b.estimated_cost)
                    .unwrap_or(Ordering::Equal)
            })
        });

        filtered
    }

    /// Full filter for one day. Without weather for the day only the goal
    /// and tier stages apply.
    pub fn filter(
        &self,
        candidates: &[ActivityCandidate],
        goal: TravelGoal,
        tier: BudgetTier,
        weather: Option<&DayWeatherSummary>,
    ) -> Vec<ActivityCandidate> {
        let filtered = self.by_goal_and_tier(candidates, goal, tier);

        let Some(weather) = weather else {
            return filtered;
        };

        let mut survivors: Vec<ActivityCandidate> = filtered
            .into_iter()
            .filter(|candidate| self.rules.weather_allows(candidate.category, weather))
            .collect();

        if !weather.is_good_weather && survivors.len() < self.rules.min_survivors {
            survivors.extend(
                candidates
                    .iter()
                    .filter(|candidate| self.rules.is_backup(candidate.category))
                    .take(self.rules.max_backups)
                    .cloned(),
            );
        }

        survivors
    }
}
