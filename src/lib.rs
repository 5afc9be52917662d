//! trip-engine-rs: itinerary generation and budget analysis for trip planning
//!
//! Two independent engines share this crate. The itinerary generator turns a
//! trip window into a day-by-day schedule using candidate activities and a
//! weather forecast, degrading to static data when either source is down. The
//! budget advisor analyzes recorded expenses against a budget and target
//! allocations and produces ranked suggestions.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_engine_rs::{ItineraryGenerator, TripWindow};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let start = NaiveDate::from_ymd_opt(2025, 6, 1).ok_or("bad date")?;
//!     let end = NaiveDate::from_ymd_opt(2025, 6, 3).ok_or("bad date")?;
//!     let trip = TripWindow::new("Lisbon", start, end);
//!     trip.validate()?;
//!
//!     let itinerary = ItineraryGenerator::offline().with_seed(7).generate(&trip).await;
//!     println!("{}", itinerary.render_text());
//!     Ok(())
//! }
//! ```

extern crate self as trip_engine_rs;

pub mod budget;
pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub(crate) mod services;
pub mod sources;
pub mod types;

pub use budget::{BudgetAdvisor, BudgetAnalyzer, SuggestionGenerator};
pub use config::SourceConfig;
pub use self::core::{ActivityFilter, DayScheduler, ItineraryGenerator};
pub use error::{PlannerError, Result};
pub use schemas::validator::Validator;
pub use schemas::{RequestSchema, SchemaHandle};
pub use sources::{
    CandidateSource, OpenWeatherSource, PlacesCandidateSource, ResilientCandidates,
    ResilientWeather, StaticCandidateSource, WeatherSource,
};
pub use tripengine_macros::request_schema;
pub use types::{
    ActivityCandidate, ActivityCategory, BudgetReport, BudgetRequest, BudgetTier, Expense,
    ExpenseCategory, FixedCommitment, Itinerary, ScheduledEvent, TravelGoal, TripWindow,
};

pub use self::core as itinerary;
pub use schemas as schema;
pub use schemas::validator;

#[cfg(feature = "cli")]
pub mod cli;
