//! Where activity candidates and weather come from.

pub mod places;
pub mod resilient;
pub mod source;
pub mod static_table;
pub mod weather;

pub use places::PlacesCandidateSource;
pub use resilient::{ResilientCandidates, ResilientWeather};
pub use source::{CandidateSource, NoWeather, SourceFuture, WeatherSource};
pub use static_table::{fallback_cost, StaticCandidateSource};
pub use weather::{summarize_forecast, ForecastResponse, OpenWeatherSource};
