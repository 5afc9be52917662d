use chrono::{NaiveDate, NaiveTime};
use trip_engine_rs::{
    sources::SourceFuture,
    types::{BudgetAllocation, CandidatePool, ExpenseCategory, Priority, ScheduleStyle, SuggestionKind},
    ActivityCandidate, ActivityCategory, BudgetAdvisor, BudgetAnalyzer, BudgetRequest,
    BudgetTier, CandidateSource, Expense, FixedCommitment, ItineraryGenerator, PlannerError,
    ResilientCandidates, ResilientWeather, TravelGoal, TripWindow,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

/// Breakfast, lunch and dinner only, so the schedule is fully predictable
#[derive(Debug)]
struct MealsOnly;

impl CandidateSource for MealsOnly {
    fn name(&self) -> &'static str {
        "meals"
    }

    fn fetch_candidates<'a>(
        &'a self,
        _destination: &'a str,
        _tier: BudgetTier,
        _goal: TravelGoal,
    ) -> SourceFuture<'a, CandidatePool> {
        let pool: CandidatePool = [
            (ActivityCategory::Breakfast, 12.0),
            (ActivityCategory::Lunch, 18.0),
            (ActivityCategory::Dinner, 30.0),
        ]
        .into_iter()
        .map(|(category, cost)| {
            let candidate = ActivityCandidate::new(
                category,
                category.label(),
                cost,
                category.default_duration_minutes(),
            );
            (category, vec![candidate])
        })
        .collect();
        Box::pin(async move { Ok(pool) })
    }
}

fn meals_generator() -> ItineraryGenerator {
    ItineraryGenerator::new(
        ResilientCandidates::new(MealsOnly),
        ResilientWeather::new(trip_engine_rs::sources::NoWeather),
    )
}

#[tokio::test]
async fn test_relaxed_three_day_trip_has_nine_events() {
    let trip = TripWindow::new("Lisbon", date(1), date(3)).with_schedule_style(ScheduleStyle::Relaxed);

    let itinerary = ItineraryGenerator::offline().with_seed(11).generate(&trip).await;

    assert_eq!(itinerary.total_days, 3);
    assert_eq!(itinerary.events.len(), 9);
    for day in trip.days() {
        let events = itinerary.events_on(day);
        assert_eq!(events.len(), 3);
        for pair in events.windows(2) {
            assert!(!pair[0].overlaps(pair[1]));
        }
    }
}

#[tokio::test]
async fn test_commitment_keeps_its_time_and_blocks_lunch() {
    let trip = TripWindow::new("Lisbon", date(1), date(1))
        .with_schedule_style(ScheduleStyle::Relaxed)
        .with_commitment(
            FixedCommitment::new("Tile Museum", date(1))
                .at(NaiveTime::from_hms_opt(13, 0, 0).unwrap())
                .lasting(60),
        );

    let itinerary = meals_generator().with_seed(4).generate(&trip).await;

    let titles: Vec<&str> = itinerary.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["breakfast", "Tile Museum", "dinner"]);

    let fixed = &itinerary.events[1];
    assert!(fixed.is_fixed);
    assert_eq!(fixed.start.time(), NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    assert_eq!(fixed.location, "Tile Museum, Lisbon");
}

#[tokio::test]
async fn test_daily_costs_stay_under_tier_ceiling() {
    let trip = TripWindow::new("Lisbon", date(1), date(4))
        .with_schedule_style(ScheduleStyle::Busy)
        .with_budget_tier(BudgetTier::Budget);

    let itinerary = ItineraryGenerator::offline().with_seed(99).generate(&trip).await;

    for day in trip.days() {
        let spent: f64 = itinerary
            .events_on(day)
            .iter()
            .filter(|event| !event.is_fixed)
            .map(|event| event.estimated_cost)
            .sum();
        assert!(spent <= 100.0, "{day} spent {spent}");
        assert!(itinerary.events_on(day).len() <= 7);
    }
}

#[tokio::test]
async fn test_same_seed_gives_same_itinerary() {
    let trip = TripWindow::new("Lisbon", date(1), date(2)).with_goal(TravelGoal::Explore);
    let first = ItineraryGenerator::offline().with_seed(5).generate(&trip).await;
    let second = ItineraryGenerator::offline().with_seed(5).generate(&trip).await;
    assert_eq!(first.events, second.events);
}

#[test]
fn test_generation_from_blocking_context() {
    let trip = TripWindow::new("Porto", date(1), date(1));
    let itinerary = tokio_test::block_on(ItineraryGenerator::offline().with_seed(1).generate(&trip));
    assert_eq!(itinerary.destination, "Porto");
    assert!(itinerary.render_text().contains("=== Itinerary: Porto ==="));
}

#[test]
fn test_budget_caution_scenario() {
    let expenses = vec![Expense::new("Meals", 600.0, ExpenseCategory::Food, date(1))];
    let analysis = BudgetAnalyzer::default().analyze(&expenses, 1000.0, &ExpenseCategory::ALL);

    let alert = analysis.alert.unwrap();
    assert_eq!(alert.message, "Caution: $400.00 remaining (40.0% left)");
    assert!(analysis.should_suggest);
}

#[test]
fn test_budget_exceeded_scenario() {
    let expenses = vec![Expense::new("Meals", 1100.0, ExpenseCategory::Food, date(1))];
    let analysis = BudgetAnalyzer::default().analyze(&expenses, 1000.0, &ExpenseCategory::ALL);
    assert_eq!(analysis.alert.unwrap().message, "Budget exceeded by $100.00!");
}

#[test]
fn test_food_overspend_report() {
    let request = BudgetRequest {
        budget: 1000.0,
        expenses: vec![
            Expense::new("Groceries", 250.0, ExpenseCategory::Food, date(1)),
            Expense::new("Dinner", 250.0, ExpenseCategory::Food, date(2)),
        ],
        allocations: Some(BudgetAllocation::default()),
        categories: None,
        trip_start: None,
        trip_end: None,
    };

    let report = BudgetAdvisor::default().review(&request, date(2).and_hms_opt(9, 0, 0).unwrap());

    assert!(report.projection.is_none());
    let rebalance = report
        .suggestions
        .iter()
        .find(|s| s.kind == SuggestionKind::Rebalancing)
        .unwrap();
    assert_eq!(rebalance.priority, Priority::Medium);
    assert_eq!(rebalance.title, "Food Budget Rebalancing");
    assert!(report.suggestions.len() <= 5);
}

#[test]
fn test_default_allocation_sums_to_hundred() {
    assert!(BudgetAllocation::default().validate().is_ok());

    let lopsided: BudgetAllocation = [(ExpenseCategory::Food, 80.0), (ExpenseCategory::Other, 30.0)]
        .into_iter()
        .collect();
    let err = lopsided.validate().unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[test]
fn test_error_payload_shape() {
    let err = PlannerError::unavailable("places", "status REQUEST_DENIED");
    let payload = err.to_error_payload();
    assert_eq!(payload["error"]["code"], "SOURCE_UNAVAILABLE");
    assert_eq!(payload["error"]["retryable"], true);
    assert!(payload["error"]["message"]
        .as_str()
        .unwrap()
        .contains("REQUEST_DENIED"));
}

#[test]
fn test_trip_validation_rejects_out_of_range_commitment() {
    let trip = TripWindow::new("Lisbon", date(1), date(2))
        .with_commitment(FixedCommitment::new("Belem Tower", date(5)));
    assert!(matches!(trip.validate(), Err(PlannerError::Validation(_))));
}
