use super::source::{CandidateSource, SourceFuture};
use crate::types::{ActivityCandidate, ActivityCategory, BudgetTier, CandidatePool, TravelGoal};

/// One generic candidate per category with tier-dependent costs.
///
/// Stands in for the places lookup when it is unavailable, and fills
/// categories the lookup returned nothing for.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCandidateSource;

impl StaticCandidateSource {
    pub fn new() -> Self {
        Self
    }

    /// The full fallback pool for a tier
    pub fn pool(tier: BudgetTier) -> CandidatePool {
        ActivityCategory::SOURCED
            .iter()
            .filter_map(|category| {
                Self::candidate(*category, tier).map(|candidate| (*category, vec![candidate]))
            })
            .collect()
    }

    /// Fallback candidate for one category, `None` for non-sourced categories
    pub fn candidate(category: ActivityCategory, tier: BudgetTier) -> Option<ActivityCandidate> {
        let cost = fallback_cost(category, tier)?;
        Some(ActivityCandidate::new(
            category,
            fallback_name(category),
            cost,
            category.default_duration_minutes(),
        ))
    }
}

impl CandidateSource for StaticCandidateSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch_candidates<'a>(
        &'a self,
        _destination: &'a str,
        tier: BudgetTier,
        _goal: TravelGoal,
    ) -> SourceFuture<'a, CandidatePool> {
        Box::pin(async move { Ok(Self::pool(tier)) })
    }
}

fn fallback_name(category: ActivityCategory) -> &'static str {
    match category {
        ActivityCategory::Breakfast => "Local Breakfast Spot",
        ActivityCategory::Lunch => "Local Restaurant",
        ActivityCategory::Dinner => "Dinner Restaurant",
        ActivityCategory::CulturalSite => "Cultural Attraction",
        ActivityCategory::MorningActivity => "Morning Sightseeing",
        ActivityCategory::AfternoonActivity => "Afternoon Activity",
        ActivityCategory::OutdoorActivity => "Outdoor Activity",
        ActivityCategory::Shopping => "Shopping Area",
        ActivityCategory::EveningEntertainment => "Evening Entertainment",
        ActivityCategory::Nightlife => "Nightlife Venue",
        ActivityCategory::AfternoonRest => "Free Time",
    }
}

/// Base cost of a category at a tier. Also the anchor the places lookup
/// scales by price level.
pub fn fallback_cost(category: ActivityCategory, tier: BudgetTier) -> Option<f64> {
    use ActivityCategory::*;

    let (budget, mid, luxury) = match category {
        Breakfast => (10.0, 25.0, 50.0),
        Lunch => (15.0, 35.0, 70.0),
        Dinner => (20.0, 50.0, 120.0),
        CulturalSite => (20.0, 40.0, 80.0),
        MorningActivity => (15.0, 35.0, 75.0),
        AfternoonActivity => (20.0, 45.0, 90.0),
        OutdoorActivity => (10.0, 30.0, 60.0),
        Shopping => (25.0, 75.0, 200.0),
        EveningEntertainment => (15.0, 40.0, 100.0),
        Nightlife => (20.0, 45.0, 80.0),
        AfternoonRest => return None,
    };

    Some(match tier {
        BudgetTier::Budget => budget,
        BudgetTier::Mid => mid,
        BudgetTier::Luxury => luxury,
    })
}
