use super::rules::SuggestionRules;
use crate::types::{
    BudgetAllocation, CategorySpending, Expense, ExpenseCategory, Priority, Suggestion,
    SuggestionKind,
};
use std::cmp::Ordering;

/// An expense well above its category's average
#[derive(Debug, Clone, PartialEq)]
pub struct Outlier {
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub average: f64,
    pub potential_saving: f64,
}

/// Everything the suggestion passes read
#[derive(Debug, Clone, Copy)]
pub struct SpendingSnapshot<'a> {
    pub category_spending: &'a [CategorySpending],
    pub spent_percentage: f64,
    pub expenses: &'a [Expense],
    pub categories: &'a [ExpenseCategory],
    pub allocations: &'a BudgetAllocation,
    pub budget: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SuggestionGenerator {
    rules: SuggestionRules,
}

impl SuggestionGenerator {
    pub fn new(rules: SuggestionRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &SuggestionRules {
        &self.rules
    }

    /// Outliers, rebalancing, emergency, allocation and reallocation
    /// suggestions in that order, capped.
    pub fn generate(&self, snapshot: &SpendingSnapshot<'_>) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        let outliers = self.find_outliers(snapshot.expenses, snapshot.categories, snapshot.allocations);
        suggestions.extend(self.outlier_suggestion(&outliers));
        suggestions.extend(self.rebalancing(snapshot));
        suggestions.extend(self.emergency(snapshot));
        suggestions.extend(self.allocation(snapshot));
        suggestions.extend(self.reallocation(snapshot));

        suggestions.truncate(self.rules.max_suggestions);
        suggestions
    }

    pub fn find_outliers(
        &self,
        expenses: &[Expense],
        categories: &[ExpenseCategory],
        allocations: &BudgetAllocation,
    ) -> Vec<Outlier> {
        let mut outliers = Vec::new();

        for category in categories {
            let in_category: Vec<&Expense> = expenses
                .iter()
                .filter(|expense| expense.category == *category)
                .collect();
            if in_category.len() < self.rules.min_expenses_for_outliers {
                continue;
            }

            let average =
                in_category.iter().map(|expense| expense.amount).sum::<f64>() / in_category.len() as f64;
            let target = allocations.target_or(*category, self.rules.outlier_default_target);
            let multiplier = (target / self.rules.allocation_scaling_factor).clamp(
                self.rules.min_allocation_multiplier,
                self.rules.max_allocation_multiplier,
            );
            let threshold = average * self.rules.outlier_base_multiplier * multiplier;

            outliers.extend(
                in_category
                    .into_iter()
                    .filter(|expense| expense.amount > threshold)
                    .map(|expense| Outlier {
                        title: expense.title.clone(),
                        amount: expense.amount,
                        category: *category,
                        average,
                        potential_saving: expense.amount - average,
                    }),
            );
        }

        outliers.sort_by(|a, b| {
            b.potential_saving
                .partial_cmp(&a.potential_saving)
                .unwrap_or(Ordering::Equal)
        });
        outliers
    }

    fn outlier_suggestion(&self, outliers: &[Outlier]) -> Option<Suggestion> {
        if outliers.is_empty() {
            return None;
        }

        let total_saving: f64 = outliers.iter().map(|outlier| outlier.potential_saving).sum();

        Some(Suggestion {
            kind: SuggestionKind::Outliers,
            title: "High-Value Outliers Detected".to_string(),
            description: format!(
                "Found {} unusually high expenses that could save you ${:.2}",
                outliers.len(),
                total_saving
            ),
            items: outliers
                .iter()
                .map(|outlier| {
                    format!(
                        "{} (${:.2}) - ${:.2} above average",
                        outlier.title, outlier.amount, outlier.potential_saving
                    )
                })
                .collect(),
            priority: Priority::High,
        })
    }

    fn rebalancing(&self, snapshot: &SpendingSnapshot<'_>) -> Vec<Suggestion> {
        snapshot
            .category_spending
            .iter()
            .filter_map(|spending| {
                let category = spending.category;
                let target = snapshot.allocations.target_or(category, 0.0);
                let deviation = spending.percentage - target;
                if deviation <= self.rules.rebalance_deviation {
                    return None;
                }

                let excess = deviation / 100.0 * snapshot.budget;
                let reduction = excess * self.rules.rebalance_reduction;

                Some(Suggestion {
                    kind: SuggestionKind::Rebalancing,
                    title: format!("{} Budget Rebalancing", category),
                    description: format!(
                        "{} is {:.1}% over your target allocation ({:.1}% vs {:.1}% recommended)",
                        category, deviation, spending.percentage, target
                    ),
                    items: vec![
                        format!("Consider reducing {} spending by ${:.2}", category, reduction),
                        format!("This would bring you closer to your {:.1}% target", target),
                        format!("Look for alternatives or bundle deals in {}", category),
                    ],
                    priority: if deviation > self.rules.rebalance_high_deviation {
                        Priority::High
                    } else {
                        Priority::Medium
                    },
                })
            })
            .collect()
    }

    fn emergency(&self, snapshot: &SpendingSnapshot<'_>) -> Option<Suggestion> {
        if snapshot.spent_percentage < self.rules.emergency_spent_percentage {
            return None;
        }

        let deviation = |spending: &CategorySpending| {
            spending.percentage - snapshot.allocations.target_or(spending.category, 0.0)
        };
        let mut over: Vec<&CategorySpending> = snapshot
            .category_spending
            .iter()
            .filter(|spending| deviation(*spending) > 0.0)
            .collect();
        over.sort_by(|a, b| {
            deviation(*b)
                .partial_cmp(&deviation(*a))
                .unwrap_or(Ordering::Equal)
        });

        let mut items = vec![
            "Pause all non-essential purchases".to_string(),
            "Review and cancel any planned activities".to_string(),
            "Look for free alternatives for remaining activities".to_string(),
        ];

        if let Some(worst) = over.first() {
            items.push(format!(
                "Immediately reduce {} spending - it's your biggest overspend",
                worst.category
            ));
        }
        for spending in over.iter().take(2) {
            items.extend(self.rules.emergency_tips(spending.category));
        }
        items.truncate(self.rules.max_emergency_items);

        Some(Suggestion {
            kind: SuggestionKind::Emergency,
            title: "Emergency Budget Actions".to_string(),
            description: "Immediate actions needed to stay within budget".to_string(),
            items,
            priority: Priority::Critical,
        })
    }

    fn allocation(&self, snapshot: &SpendingSnapshot<'_>) -> Vec<Suggestion> {
        snapshot
            .category_spending
            .iter()
            .filter_map(|spending| {
                let category = spending.category;
                let target = snapshot.allocations.get(category).filter(|target| *target != 0.0)?;
                let actual = spending.percentage;
                let deviation = actual - target;
                if deviation.abs() <= self.rules.allocation_deviation {
                    return None;
                }

                let items = if deviation > 0.0 {
                    let excess = deviation / 100.0 * snapshot.budget;
                    let mut items = vec![
                        format!(
                            "You're spending ${:.2} more than your {:.1}% target",
                            excess, target
                        ),
                        format!(
                            "Consider reducing expenses by ${:.2} to get back on track",
                            excess * self.rules.allocation_reduction
                        ),
                    ];
                    items.extend(self.rules.category_tips(category).iter().take(2).cloned());
                    items
                } else {
                    let slack = (deviation / 100.0 * snapshot.budget).abs();
                    vec![
                        format!("You're {:.1}% under budget in {}", deviation.abs(), category),
                        format!(
                            "You could reallocate ${:.2} from other categories or enjoy more {} experiences",
                            slack, category
                        ),
                    ]
                };

                Some(Suggestion {
                    kind: SuggestionKind::Allocation,
                    title: format!("{} Budget Allocation Check", category),
                    description: format!("{}: {:.1}% actual vs {:.1}% target", category, actual, target),
                    items,
                    priority: if deviation.abs() > self.rules.allocation_medium_deviation {
                        Priority::Medium
                    } else {
                        Priority::Low
                    },
                })
            })
            .collect()
    }

    fn reallocation(&self, snapshot: &SpendingSnapshot<'_>) -> Option<Suggestion> {
        let margin = self.rules.reallocation_margin;
        let deviation = |spending: &CategorySpending| {
            spending.percentage - snapshot.allocations.target_or(spending.category, 0.0)
        };

        let most_over = snapshot
            .category_spending
            .iter()
            .filter(|spending| deviation(*spending) > margin)
            .max_by(|a, b| deviation(*a).partial_cmp(&deviation(*b)).unwrap_or(Ordering::Equal))?;
        let most_under = snapshot
            .category_spending
            .iter()
            .filter(|spending| deviation(*spending) < -margin)
            .min_by(|a, b| deviation(*a).partial_cmp(&deviation(*b)).unwrap_or(Ordering::Equal))?;

        let transfer = (deviation(most_over) / 2.0).min(-deviation(most_under) / 2.0);
        let amount = transfer / 100.0 * snapshot.budget;
        if amount <= self.rules.min_reallocation_amount {
            return None;
        }

        Some(Suggestion {
            kind: SuggestionKind::Reallocation,
            title: "Smart Budget Reallocation".to_string(),
            description: "Balance your spending between categories".to_string(),
            items: vec![
                format!(
                    "Consider moving ${:.2} from {} to {}",
                    amount, most_over.category, most_under.category
                ),
                "This would better align with your target allocations".to_string(),
                format!(
                    "{} would go from {:.1}% to {:.1}%",
                    most_over.category,
                    most_over.percentage,
                    most_over.percentage - transfer
                ),
                format!(
                    "{} would go from {:.1}% to {:.1}%",
                    most_under.category,
                    most_under.percentage,
                    most_under.percentage + transfer
                ),
            ],
            priority: Priority::Medium,
        })
    }
}
