pub mod activity;
pub mod budget;
pub mod clock_time;
pub mod itinerary;
pub mod trip;
pub mod weather;

pub use activity::{flatten_pool, ActivityCandidate, ActivityCategory, CandidatePool};
pub use budget::{
    AlertLevel, BudgetAlert, BudgetAllocation, BudgetAnalysis, BudgetReport, BudgetRequest,
    CategorySpending, Expense, ExpenseCategory, Priority, ProjectionAlert, Suggestion,
    SuggestionKind,
};
pub use itinerary::{Itinerary, ScheduledEvent};
pub use trip::{BudgetTier, DailyStart, FixedCommitment, ScheduleStyle, TravelGoal, TripWindow};
pub use weather::{DayWeatherSlim, DayWeatherSummary, WeatherForecast};
