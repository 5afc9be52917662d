use super::source::{CandidateSource, SourceFuture};
use super::static_table::{fallback_cost, StaticCandidateSource};
use crate::config::SourceConfig;
use crate::services::http_client::HttpClient;
use crate::types::{ActivityCandidate, ActivityCategory, BudgetTier, CandidatePool, TravelGoal};
use crate::{PlannerError, Result};
use serde::Deserialize;
use tracing::debug;

pub const MAX_CANDIDATES_PER_CATEGORY: usize = 5;

#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub place_id: Option<String>,
    /// 0 (free) to 4 (very expensive)
    #[serde(default)]
    pub price_level: Option<u8>,
}

/// Candidate source backed by a places text search, one query per category
#[derive(Debug, Clone)]
pub struct PlacesCandidateSource {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl PlacesCandidateSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config.request_timeout, config.max_retries)?,
            base_url: config.places_base_url.trim_end_matches('/').to_string(),
            api_key: config.places_api_key.clone(),
        })
    }

    async fn search(
        &self,
        api_key: &str,
        category: ActivityCategory,
        destination: &str,
    ) -> Result<TextSearchResponse> {
        let url = format!("{}/maps/api/place/textsearch/json", self.base_url);
        let query = [
            (
                "query",
                format!("{} in {}", search_phrase(category), destination),
            ),
            ("key", api_key.to_string()),
        ];

        let body = self.http.get_json(&url, &query).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn fetch(&self, destination: &str, tier: BudgetTier) -> Result<CandidatePool> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PlannerError::Config("PLACES_API_KEY is not configured".to_string()))?;

        let mut pool = CandidatePool::new();

        for category in ActivityCategory::SOURCED {
            let response = self.search(api_key, category, destination).await?;
            let mut candidates = match response.status.as_str() {
                "OK" => to_candidates(category, tier, response.results),
                "ZERO_RESULTS" => Vec::new(),
                status => {
                    return Err(PlannerError::unavailable(
                        "places",
                        response
                            .error_message
                            .unwrap_or_else(|| format!("search returned status {status}")),
                    ))
                }
            };

            if candidates.is_empty() {
                debug!(
                    target: "tripengine::sources",
                    category = %category,
                    "no places found, filling from static table"
                );
                candidates.extend(StaticCandidateSource::candidate(category, tier));
            }

            pool.insert(category, candidates);
        }

        Ok(pool)
    }
}

impl CandidateSource for PlacesCandidateSource {
    fn name(&self) -> &'static str {
        "places"
    }

    fn fetch_candidates<'a>(
        &'a self,
        destination: &'a str,
        tier: BudgetTier,
        _goal: TravelGoal,
    ) -> SourceFuture<'a, CandidatePool> {
        Box::pin(self.fetch(destination, tier))
    }
}

fn search_phrase(category: ActivityCategory) -> &'static str {
    match category {
        ActivityCategory::Breakfast => "breakfast cafe",
        ActivityCategory::Lunch => "lunch restaurant",
        ActivityCategory::Dinner => "dinner restaurant",
        ActivityCategory::CulturalSite => "museum",
        ActivityCategory::MorningActivity => "tourist attractions",
        ActivityCategory::AfternoonActivity => "things to do",
        ActivityCategory::OutdoorActivity => "park",
        ActivityCategory::Shopping => "shopping",
        ActivityCategory::EveningEntertainment => "theater",
        ActivityCategory::Nightlife => "bar",
        ActivityCategory::AfternoonRest => "spa",
    }
}

/// Multiplier applied to the tier's base cost for a place's price level
pub fn price_level_factor(price_level: Option<u8>) -> f64 {
    match price_level {
        Some(0) => 0.5,
        Some(1) => 0.75,
        Some(2) | None => 1.0,
        Some(3) => 1.5,
        Some(_) => 2.0,
    }
}

fn to_candidates(
    category: ActivityCategory,
    tier: BudgetTier,
    results: Vec<PlaceResult>,
) -> Vec<ActivityCandidate> {
    let Some(base_cost) = fallback_cost(category, tier) else {
        return Vec::new();
    };

    results
        .into_iter()
        .take(MAX_CANDIDATES_PER_CATEGORY)
        .map(|place| {
            let cost = (base_cost * price_level_factor(place.price_level)).round();
            let mut candidate = ActivityCandidate::new(
                category,
                place.name,
                cost,
                category.default_duration_minutes(),
            )
            .with_address(place.formatted_address.unwrap_or_default());
            candidate.rating = place.rating;
            candidate.external_id = place.place_id;
            candidate
        })
        .collect()
}
