use super::rules::BudgetRules;
use crate::types::{
    AlertLevel, BudgetAlert, BudgetAnalysis, CategorySpending, Expense, ExpenseCategory, Priority,
    ProjectionAlert,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Percentage of `budget` that `amount` represents; 0 for a non-positive budget
pub fn percentage_of(amount: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        amount / budget * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct BudgetAnalyzer {
    rules: BudgetRules,
}

impl BudgetAnalyzer {
    pub fn new(rules: BudgetRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &BudgetRules {
        &self.rules
    }

    pub fn analyze(
        &self,
        expenses: &[Expense],
        budget: f64,
        categories: &[ExpenseCategory],
    ) -> BudgetAnalysis {
        let total_spent: f64 = expenses.iter().map(|expense| expense.amount).sum();
        let remaining = budget - total_spent;
        let spent_percentage = percentage_of(total_spent, budget);

        let analysis = BudgetAnalysis {
            total_spent,
            remaining,
            spent_percentage,
            category_spending: category_spending(expenses, categories, budget),
            alert: self.alert(remaining, spent_percentage),
            should_suggest: spent_percentage >= self.rules.caution,
        };

        debug!(
            target: "tripengine::budget",
            total_spent,
            spent_percentage,
            alert = ?analysis.alert.as_ref().map(|alert| alert.level),
            "analyzed budget"
        );

        analysis
    }

    /// Alert for the highest threshold reached, if any
    pub fn alert(&self, remaining: f64, spent_percentage: f64) -> Option<BudgetAlert> {
        let left = 100.0 - spent_percentage;

        let (level, message) = if spent_percentage >= self.rules.exceeded {
            (
                AlertLevel::Exceeded,
                format!("Budget exceeded by ${:.2}!", remaining.abs()),
            )
        } else if spent_percentage >= self.rules.critical {
            (
                AlertLevel::Critical,
                format!("Critical: Only ${:.2} remaining ({:.1}% left)", remaining, left),
            )
        } else if spent_percentage >= self.rules.warning {
            (
                AlertLevel::Warning,
                format!("Warning: ${:.2} remaining ({:.1}% left)", remaining, left),
            )
        } else if spent_percentage >= self.rules.caution {
            (
                AlertLevel::Caution,
                format!("Caution: ${:.2} remaining ({:.1}% left)", remaining, left),
            )
        } else {
            return None;
        };

        Some(BudgetAlert { level, message })
    }

    /// Extrapolate the current daily spend over the whole trip.
    ///
    /// Returns an alert only when the projected total exceeds the budget.
    pub fn project_overspend(
        &self,
        expenses: &[Expense],
        budget: f64,
        trip_start: NaiveDate,
        trip_end: NaiveDate,
        now: NaiveDateTime,
    ) -> Option<ProjectionAlert> {
        if expenses.is_empty() {
            return None;
        }

        let total_days = ((trip_end - trip_start).num_days() + 1).max(1);
        let since_start = now - trip_start.and_time(NaiveTime::MIN);
        let elapsed = (since_start.num_seconds() as f64 / SECONDS_PER_DAY).ceil() as i64;
        let elapsed_days = elapsed.clamp(1, total_days);

        let total_spent: f64 = expenses.iter().map(|expense| expense.amount).sum();
        let projected_total = total_spent / elapsed_days as f64 * total_days as f64;
        let overrun = projected_total - budget;

        debug!(
            target: "tripengine::budget",
            elapsed_days,
            total_days,
            projected_total,
            "projected trip spend"
        );

        (projected_total > budget).then(|| ProjectionAlert {
            level: Priority::High,
            message: format!(
                "At your current rate, you'll exceed your budget by ${:.2}. Consider adjusting your spending pace.",
                overrun
            ),
            projected_total,
            overrun,
        })
    }
}

/// Totals per listed category, omitting categories with nothing spent
pub fn category_spending(
    expenses: &[Expense],
    categories: &[ExpenseCategory],
    budget: f64,
) -> Vec<CategorySpending> {
    categories
        .iter()
        .filter_map(|category| {
            let (total, count) = expenses
                .iter()
                .filter(|expense| expense.category == *category)
                .fold((0.0, 0), |(total, count), expense| (total + expense.amount, count + 1));

            (total > 0.0).then(|| CategorySpending {
                category: *category,
                total,
                percentage: percentage_of(total, budget),
                count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ExpenseCategory::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn expense(amount: f64, category: ExpenseCategory) -> Expense {
        Expense::new("item", amount, category, date(1))
    }

    #[test]
    fn test_caution_at_sixty_percent() {
        let analysis = BudgetAnalyzer::default().analyze(
            &[expense(600.0, Food)],
            1000.0,
            &ExpenseCategory::ALL,
        );
        assert_eq!(analysis.spent_percentage, 60.0);
        assert_eq!(analysis.remaining, 400.0);
        let alert = analysis.alert.unwrap();
        assert_eq!(alert.level, AlertLevel::Caution);
        assert_eq!(alert.message, "Caution: $400.00 remaining (40.0% left)");
        assert!(analysis.should_suggest);
    }

    #[test]
    fn test_exceeded_message_uses_absolute_overrun() {
        let analysis =
            BudgetAnalyzer::default().analyze(&[expense(1100.0, Food)], 1000.0, &ExpenseCategory::ALL);
        let alert = analysis.alert.unwrap();
        assert_eq!(alert.level, AlertLevel::Exceeded);
        assert_eq!(alert.message, "Budget exceeded by $100.00!");
    }

    #[test]
    fn test_threshold_edges() {
        let analyzer = BudgetAnalyzer::default();
        assert_eq!(analyzer.alert(100.0, 90.0).unwrap().level, AlertLevel::Critical);
        assert_eq!(analyzer.alert(250.0, 75.0).unwrap().level, AlertLevel::Warning);
        assert!(analyzer.alert(501.0, 49.9).is_none());
    }

    #[test]
    fn test_zero_budget_has_no_alert() {
        let analysis = BudgetAnalyzer::default().analyze(&[expense(50.0, Food)], 0.0, &ExpenseCategory::ALL);
        assert_eq!(analysis.spent_percentage, 0.0);
        assert!(analysis.alert.is_none());
        assert!(!analysis.should_suggest);
        assert_eq!(analysis.category_spending[0].percentage, 0.0);
    }

    #[test]
    fn test_category_spending_skips_empty_and_unlisted() {
        let spending = category_spending(
            &[expense(20.0, Food), expense(30.0, Food), expense(10.0, Other)],
            &[Food, Transport],
            200.0,
        );
        assert_eq!(spending.len(), 1);
        assert_eq!(spending[0].total, 50.0);
        assert_eq!(spending[0].count, 2);
        assert_eq!(spending[0].percentage, 25.0);
    }

    #[test]
    fn test_projection_flags_fast_pace() {
        let analyzer = BudgetAnalyzer::default();
        // 300 spent over 2 of 10 days -> 1500 projected
        let now = date(2).and_hms_opt(12, 0, 0).unwrap();
        let alert = analyzer
            .project_overspend(&[expense(300.0, Food)], 1000.0, date(1), date(10), now)
            .unwrap();
        assert_eq!(alert.projected_total, 1500.0);
        assert_eq!(alert.overrun, 500.0);
        assert_eq!(alert.level, Priority::High);
        assert!(alert.message.contains("$500.00"));
    }

    #[test]
    fn test_category_percentages_sum_to_spent_percentage() {
        let expenses = [
            expense(120.0, Food),
            expense(80.0, Transport),
            expense(250.0, Lodging),
            expense(55.5, Activities),
            expense(12.25, Other),
        ];
        let analysis = BudgetAnalyzer::default().analyze(&expenses, 1000.0, &ExpenseCategory::ALL);

        let summed: f64 = analysis
            .category_spending
            .iter()
            .map(|spending| spending.percentage)
            .sum();
        assert!((summed - analysis.spent_percentage).abs() < 1e-9);
        assert!((analysis.spent_percentage - 51.775).abs() < 1e-9);
    }

    #[test]
    fn test_projection_counts_trip_days_inclusively() {
        let analyzer = BudgetAnalyzer::default();
        // June 1-4 is four days: 300 on day one projects 1200, not 900
        let first_day = date(1).and_hms_opt(12, 0, 0).unwrap();
        let alert = analyzer
            .project_overspend(&[expense(300.0, Food)], 1000.0, date(1), date(4), first_day)
            .unwrap();
        assert_eq!(alert.projected_total, 1200.0);
        assert_eq!(alert.overrun, 200.0);

        let single_day = analyzer
            .project_overspend(&[expense(300.0, Food)], 200.0, date(1), date(1), first_day)
            .unwrap();
        assert_eq!(single_day.projected_total, 300.0);
    }

    #[test]
    fn test_projection_caps_elapsed_days() {
        let analyzer = BudgetAnalyzer::default();
        let long_after = date(30).and_hms_opt(0, 0, 0).unwrap();
        assert!(analyzer
            .project_overspend(&[expense(900.0, Food)], 1000.0, date(1), date(3), long_after)
            .is_none());
        assert!(analyzer
            .project_overspend(&[], 10.0, date(1), date(3), long_after)
            .is_none());
    }
}
