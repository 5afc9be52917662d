use super::filter::ActivityFilter;
use super::scheduler::{DayPlan, DayScheduler};
use crate::config::SourceConfig;
use crate::sources::{
    NoWeather, OpenWeatherSource, PlacesCandidateSource, ResilientCandidates, ResilientWeather,
    StaticCandidateSource,
};
use crate::types::{flatten_pool, Itinerary, TripWindow};
use crate::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Turns a trip window into a day-by-day itinerary.
///
/// Candidates and weather are fetched once per call, concurrently, and
/// shared by every day of the trip. Neither fetch can fail the call: the
/// resilient wrappers degrade to the static table and to no weather.
#[derive(Debug)]
pub struct ItineraryGenerator {
    candidates: ResilientCandidates,
    weather: ResilientWeather,
    filter: ActivityFilter,
    scheduler: DayScheduler,
    seed: Option<u64>,
}

impl ItineraryGenerator {
    pub fn new(candidates: ResilientCandidates, weather: ResilientWeather) -> Self {
        Self {
            candidates,
            weather,
            filter: ActivityFilter::default(),
            scheduler: DayScheduler::default(),
            seed: None,
        }
    }

    /// Static candidates and no weather; never touches the network
    pub fn offline() -> Self {
        Self::new(
            ResilientCandidates::new(StaticCandidateSource::new()),
            ResilientWeather::new(NoWeather),
        )
    }

    /// Live places and forecast sources configured from `config`
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let budget = config.fetch_budget();
        Ok(Self::new(
            ResilientCandidates::new(PlacesCandidateSource::new(config)?).with_timeout(budget),
            ResilientWeather::new(OpenWeatherSource::new(config)?).with_timeout(budget),
        ))
    }

    /// Fix the shuffle seed so repeated runs give the same schedule
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_filter(mut self, filter: ActivityFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_scheduler(mut self, scheduler: DayScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub async fn generate(&self, trip: &TripWindow) -> Itinerary {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with_rng(trip, &mut rng).await
    }

    pub async fn generate_with_rng<R: Rng + Send + ?Sized>(
        &self,
        trip: &TripWindow,
        rng: &mut R,
    ) -> Itinerary {
        let total_days = trip.total_days();
        if total_days == 0 {
            warn!(
                target: "tripengine::itinerary",
                start = %trip.start_date,
                end = %trip.end_date,
                "trip ends before it starts, returning empty itinerary"
            );
            return Itinerary::empty(trip.destination.clone());
        }

        for commitment in &trip.fixed_commitments {
            if !trip.contains(commitment.day) {
                warn!(
                    target: "tripengine::itinerary",
                    place = %commitment.place,
                    day = %commitment.day,
                    "fixed commitment outside trip dates, ignoring"
                );
            }
        }

        let (pool, forecast) = tokio::join!(
            self.candidates
                .fetch(&trip.destination, trip.budget_tier, trip.goal),
            self.weather
                .fetch(&trip.destination, trip.start_date, trip.end_date),
        );

        let candidates = flatten_pool(&pool);
        let tier = self.filter.rules().tier(trip.budget_tier);
        let slot_count = trip.schedule_style.events_per_day();

        let mut events = Vec::new();
        let mut weather_summary = BTreeMap::new();

        for date in trip.days() {
            let day_weather = forecast.as_ref().and_then(|forecast| forecast.get(&date));
            let slim = day_weather.map(|weather| weather.slim());

            let filtered = self
                .filter
                .filter(&candidates, trip.goal, trip.budget_tier, day_weather);

            let plan = DayPlan {
                date,
                slot_count,
                daily_start: trip.daily_start,
                commitments: trip.commitments_on(date),
                daily_ceiling: tier.daily_ceiling,
                destination: &trip.destination,
                weather: slim.as_ref(),
            };
            let day_events = self.scheduler.schedule_day(&plan, filtered, rng);

            debug!(
                target: "tripengine::itinerary",
                %date,
                events = day_events.len(),
                has_weather = slim.is_some(),
                "scheduled day"
            );

            events.extend(day_events);
            if let Some(slim) = slim {
                weather_summary.insert(date, slim);
            }
        }

        info!(
            target: "tripengine::itinerary",
            destination = %trip.destination,
            total_days,
            events = events.len(),
            candidate_source = self.candidates.source_name(),
            weather_source = self.weather.source_name(),
            "generated itinerary"
        );

        Itinerary {
            events,
            weather_summary,
            destination: trip.destination.clone(),
            total_days,
        }
    }
}
