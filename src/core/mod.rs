pub mod filter;
pub mod itinerary;
pub mod rules;
pub mod scheduler;

pub use filter::ActivityFilter;
pub use itinerary::ItineraryGenerator;
pub use rules::{
    goal_whitelist, BudgetTierConfig, FilterRules, Hazard, ScheduleRules, TimeSlot, WeatherRule,
};
pub use scheduler::{DayPlan, DayScheduler};
