//! Expense analysis and budget suggestions.

pub mod analyzer;
pub mod rules;
pub mod suggestions;

pub use analyzer::{category_spending, percentage_of, BudgetAnalyzer};
pub use rules::{BudgetRules, SuggestionRules};
pub use suggestions::{Outlier, SpendingSnapshot, SuggestionGenerator};

use crate::types::{BudgetReport, BudgetRequest};
use chrono::NaiveDateTime;
use tracing::info;

/// Runs the analyzer, the pace projection and the suggestion generator over
/// one budget request.
#[derive(Debug, Clone, Default)]
pub struct BudgetAdvisor {
    analyzer: BudgetAnalyzer,
    suggestions: SuggestionGenerator,
}

impl BudgetAdvisor {
    pub fn new(analyzer: BudgetAnalyzer, suggestions: SuggestionGenerator) -> Self {
        Self {
            analyzer,
            suggestions,
        }
    }

    /// Suggestions are only produced once spending reaches the caution level.
    /// The projection needs both trip dates.
    pub fn review(&self, request: &BudgetRequest, now: NaiveDateTime) -> BudgetReport {
        let categories = request.categories();
        let allocations = request.allocations();

        let analysis = self
            .analyzer
            .analyze(&request.expenses, request.budget, &categories);

        let projection = match (request.trip_start, request.trip_end) {
            (Some(start), Some(end)) => self.analyzer.project_overspend(
                &request.expenses,
                request.budget,
                start,
                end,
                now,
            ),
            _ => None,
        };

        let suggestions = if analysis.should_suggest {
            self.suggestions.generate(&SpendingSnapshot {
                category_spending: &analysis.category_spending,
                spent_percentage: analysis.spent_percentage,
                expenses: &request.expenses,
                categories: &categories,
                allocations: &allocations,
                budget: request.budget,
            })
        } else {
            Vec::new()
        };

        info!(
            target: "tripengine::budget",
            spent_percentage = analysis.spent_percentage,
            suggestions = suggestions.len(),
            projected_overrun = projection.is_some(),
            "reviewed budget"
        );

        BudgetReport {
            analysis,
            projection,
            suggestions,
        }
    }
}
