use super::rules::ScheduleRules;
use crate::types::{
    ActivityCandidate, DailyStart, DayWeatherSlim, FixedCommitment, ScheduledEvent,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Everything the scheduler needs to know about one day
#[derive(Debug, Clone)]
pub struct DayPlan<'a> {
    pub date: NaiveDate,
    pub slot_count: usize,
    pub daily_start: DailyStart,
    pub commitments: Vec<&'a FixedCommitment>,
    pub daily_ceiling: f64,
    pub destination: &'a str,
    pub weather: Option<&'a DayWeatherSlim>,
}

/// Greedy slot filler for a single day.
#[derive(Debug, Clone, Default)]
pub struct DayScheduler {
    rules: ScheduleRules,
}

impl DayScheduler {
    pub fn new(rules: ScheduleRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScheduleRules {
        &self.rules
    }

    /// Build the day's events: every fixed commitment, then shuffled
    /// candidates that fit the remaining slots, the spending ceiling and the
    /// buffer around already accepted events.
    pub fn schedule_day<R: Rng + ?Sized>(
        &self,
        plan: &DayPlan<'_>,
        mut candidates: Vec<ActivityCandidate>,
        rng: &mut R,
    ) -> Vec<ScheduledEvent> {
        let mut events: Vec<ScheduledEvent> = plan
            .commitments
            .iter()
            .map(|commitment| fixed_event(commitment, plan.date, plan.destination))
            .collect();

        let remaining = plan.slot_count.saturating_sub(events.len());
        if remaining > 0 {
            candidates.shuffle(rng);

            let buffer = Duration::minutes(self.rules.buffer_minutes);
            let mut spent = 0.0;
            let mut accepted = 0;

            for candidate in candidates {
                if accepted >= remaining {
                    break;
                }

                let Some(slot) = self.rules.slot(candidate.category) else {
                    continue;
                };
                if spent + candidate.estimated_cost > plan.daily_ceiling {
                    continue;
                }

                let start = at_minutes(plan.date, slot.start_minutes(plan.daily_start));
                let end = start + Duration::minutes(i64::from(candidate.duration_minutes));

                let conflicts = events
                    .iter()
                    .any(|event| start < event.end + buffer && end > event.start - buffer);
                if conflicts {
                    continue;
                }

                spent += candidate.estimated_cost;
                accepted += 1;
                events.push(self.generated_event(candidate, plan, start, end));
            }

            debug!(
                target: "tripengine::itinerary",
                date = %plan.date,
                requested = remaining,
                accepted,
                spent,
                "filled day slots"
            );
        }

        events.sort_by_key(|event| event.start);
        self.resolve_overlaps(&mut events);
        events
    }

    /// Push any event starting before its predecessor ends to a fixed gap
    /// after it, keeping its length.
    pub fn resolve_overlaps(&self, events: &mut [ScheduledEvent]) {
        let shift = Duration::minutes(self.rules.shift_minutes);
        for index in 1..events.len() {
            let previous_end = events[index - 1].end;
            let event = &mut events[index];
            if event.start < previous_end {
                let length = event.end - event.start;
                event.start = previous_end + shift;
                event.end = event.start + length;
            }
        }
    }

    fn generated_event(
        &self,
        candidate: ActivityCandidate,
        plan: &DayPlan<'_>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ScheduledEvent {
        let location = if candidate.address.is_empty() {
            format!("{} - {}", plan.destination, candidate.category.label())
        } else {
            candidate.address
        };
        let weather_note = plan
            .weather
            .and_then(|weather| weather.activity_note(candidate.category))
            .map(str::to_string);

        ScheduledEvent {
            title: candidate.name,
            category: Some(candidate.category),
            date: plan.date,
            start,
            end,
            location,
            estimated_cost: candidate.estimated_cost,
            is_fixed: false,
            weather_note,
        }
    }
}

fn at_minutes(date: NaiveDate, minutes: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minutes))
}

fn fixed_event(commitment: &FixedCommitment, date: NaiveDate, destination: &str) -> ScheduledEvent {
    let start = date.and_time(commitment.start_time());
    ScheduledEvent {
        title: commitment.place.clone(),
        category: None,
        date,
        start,
        end: start + Duration::minutes(i64::from(commitment.duration())),
        location: format!("{}, {}", commitment.place, destination),
        estimated_cost: commitment.cost.unwrap_or(0.0),
        is_fixed: true,
        weather_note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityCategory::{self, *};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    fn candidate(category: ActivityCategory, cost: f64) -> ActivityCandidate {
        ActivityCandidate::new(category, category.label(), cost, category.default_duration_minutes())
    }

    fn plan<'a>(slot_count: usize, ceiling: f64, commitments: Vec<&'a FixedCommitment>) -> DayPlan<'a> {
        DayPlan {
            date: day(),
            slot_count,
            daily_start: DailyStart::Early,
            commitments,
            daily_ceiling: ceiling,
            destination: "Kyoto",
            weather: None,
        }
    }

    fn assert_no_overlap(events: &[ScheduledEvent]) {
        for pair in events.windows(2) {
            assert!(!pair[0].overlaps(&pair[1]), "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_fills_slots_without_overlap() {
        let scheduler = DayScheduler::default();
        let pool = vec![
            candidate(Breakfast, 10.0),
            candidate(Lunch, 15.0),
            candidate(Dinner, 20.0),
            candidate(Nightlife, 20.0),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let events = scheduler.schedule_day(&plan(3, 250.0, vec![]), pool, &mut rng);

        assert_eq!(events.len(), 3);
        assert_no_overlap(&events);
        assert!(events.windows(2).all(|pair| pair[0].start <= pair[1].start));
    }

    #[test]
    fn test_respects_cost_ceiling() {
        let scheduler = DayScheduler::default();
        let pool = vec![
            candidate(Breakfast, 60.0),
            candidate(Lunch, 60.0),
            candidate(Dinner, 60.0),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let events = scheduler.schedule_day(&plan(3, 100.0, vec![]), pool, &mut rng);

        assert_eq!(events.len(), 1);
        assert!(events.iter().map(|e| e.estimated_cost).sum::<f64>() <= 100.0);
    }

    #[test]
    fn test_fixed_commitment_keeps_time_and_blocks_collisions() {
        let scheduler = DayScheduler::default();
        let commitment = FixedCommitment::new("Tea Ceremony", day())
            .at(NaiveTime::from_hms_opt(13, 0, 0).unwrap())
            .lasting(60)
            .costing(45.0);
        let pool = vec![candidate(Lunch, 15.0), candidate(Breakfast, 10.0), candidate(Dinner, 20.0)];
        let mut rng = StdRng::seed_from_u64(3);
        let events = scheduler.schedule_day(&plan(3, 250.0, vec![&commitment]), pool, &mut rng);

        let fixed = events.iter().find(|event| event.is_fixed).unwrap();
        assert_eq!(fixed.start, time(13, 0));
        assert_eq!(fixed.end, time(14, 0));
        assert_eq!(fixed.location, "Tea Ceremony, Kyoto");
        assert_eq!(fixed.estimated_cost, 45.0);
        assert!(events.iter().all(|event| event.category != Some(Lunch)));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_commitments_beyond_slot_count_are_all_kept() {
        let scheduler = DayScheduler::default();
        let first = FixedCommitment::new("Museum", day());
        let second = FixedCommitment::new("Garden", day()).at(NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        let mut rng = StdRng::seed_from_u64(3);
        let events = scheduler.schedule_day(
            &plan(1, 250.0, vec![&first, &second]),
            vec![candidate(Dinner, 20.0)],
            &mut rng,
        );
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| event.is_fixed));
        assert_eq!(events[0].start, time(10, 0));
        assert_eq!(events[0].end, time(12, 0));
    }

    #[test]
    fn test_resolve_overlaps_shifts_by_gap() {
        let scheduler = DayScheduler::default();
        let first = FixedCommitment::new("Museum", day()).lasting(120);
        let second = FixedCommitment::new("Garden", day())
            .at(NaiveTime::from_hms_opt(11, 0, 0).unwrap())
            .lasting(60);
        let mut rng = StdRng::seed_from_u64(3);
        let events = scheduler.schedule_day(&plan(2, 250.0, vec![&first, &second]), vec![], &mut rng);

        assert_eq!(events[1].start, time(12, 30));
        assert_eq!(events[1].end, time(13, 30));
        assert_no_overlap(&events);
    }

    #[test]
    fn test_location_and_weather_note() {
        let scheduler = DayScheduler::default();
        let slim = DayWeatherSlim {
            condition: "rain".to_string(),
            temperature: 60.0,
            precipitation: 0.3,
            recommendation: "Consider indoor alternatives".to_string(),
        };
        let mut day_plan = plan(1, 250.0, vec![]);
        day_plan.weather = Some(&slim);
        let mut rng = StdRng::seed_from_u64(3);
        let events = scheduler.schedule_day(&day_plan, vec![candidate(Shopping, 20.0)], &mut rng);

        assert_eq!(events[0].location, "Kyoto - shopping");
        assert_eq!(
            events[0].weather_note.as_deref(),
            Some("Indoor activity recommended due to rain")
        );
        assert_eq!(events[0].start, time(17, 30));
    }

    #[test]
    fn test_same_seed_same_schedule() {
        let scheduler = DayScheduler::default();
        let pool: Vec<_> = ActivityCategory::SOURCED.iter().map(|c| candidate(*c, 10.0)).collect();
        let a = scheduler.schedule_day(&plan(5, 250.0, vec![]), pool.clone(), &mut StdRng::seed_from_u64(42));
        let b = scheduler.schedule_day(&plan(5, 250.0, vec![]), pool, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
