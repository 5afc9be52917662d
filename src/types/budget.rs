use crate::request_schema;
use crate::PlannerError;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const ALLOCATION_SUM_TOLERANCE: f64 = 0.01;

/// Expense bucket. Distinct from `ActivityCategory`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Lodging,
    Activities,
    Shopping,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Lodging,
        ExpenseCategory::Activities,
        ExpenseCategory::Shopping,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Lodging => "Lodging",
            ExpenseCategory::Activities => "Activities",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Expense {
    /// Short description, e.g. "Harbor dinner cruise"
    pub title: String,
    /// Non-negative amount in the trip currency
    pub amount: f64,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    /// Owning trip identifier, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
}

impl Expense {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            category,
            date,
            trip_id: None,
        }
    }
}

/// Target percentage of the total budget per expense category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct BudgetAllocation(BTreeMap<ExpenseCategory, f64>);

impl BudgetAllocation {
    pub fn new(targets: BTreeMap<ExpenseCategory, f64>) -> Self {
        Self(targets)
    }

    pub fn get(&self, category: ExpenseCategory) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn target_or(&self, category: ExpenseCategory, fallback: f64) -> f64 {
        self.get(category).unwrap_or(fallback)
    }

    pub fn set(&mut self, category: ExpenseCategory, percentage: f64) {
        self.0.insert(category, percentage);
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Percentages must be non-negative and sum to 100.
    pub fn validate(&self) -> crate::Result<()> {
        if let Some((category, value)) = self
            .0
            .iter()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Err(PlannerError::Validation(format!(
                "allocation for {} must be a non-negative percentage, got {}",
                category, value
            )));
        }

        let total = self.total();
        if (total - 100.0).abs() > ALLOCATION_SUM_TOLERANCE {
            return Err(PlannerError::Validation(format!(
                "budget allocations must sum to 100%, got {:.1}%",
                total
            )));
        }

        Ok(())
    }
}

impl Default for BudgetAllocation {
    fn default() -> Self {
        Self(BTreeMap::from([
            (ExpenseCategory::Food, 30.0),
            (ExpenseCategory::Transport, 10.0),
            (ExpenseCategory::Lodging, 25.0),
            (ExpenseCategory::Activities, 20.0),
            (ExpenseCategory::Shopping, 10.0),
            (ExpenseCategory::Other, 5.0),
        ]))
    }
}

impl FromIterator<(ExpenseCategory, f64)> for BudgetAllocation {
    fn from_iter<I: IntoIterator<Item = (ExpenseCategory, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Outliers,
    Rebalancing,
    /// Accepted in stored reports; no current pass emits it
    Frequency,
    Emergency,
    Allocation,
    Reallocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// An actionable, explainable budget recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub items: Vec<String>,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Caution,
    Warning,
    Critical,
    Exceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub level: AlertLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: ExpenseCategory,
    pub total: f64,
    pub percentage: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAnalysis {
    pub total_spent: f64,
    pub remaining: f64,
    pub spent_percentage: f64,
    pub category_spending: Vec<CategorySpending>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<BudgetAlert>,
    pub should_suggest: bool,
}

/// Pace-based warning that the trip will overrun its budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionAlert {
    pub level: Priority,
    pub message: String,
    pub projected_total: f64,
    pub overrun: f64,
}

/// Budget review request document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[request_schema(name = "BudgetRequest")]
pub struct BudgetRequest {
    /// Total trip budget
    pub budget: f64,
    /// Recorded expenses
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Target percentage per category; the default preset applies when absent
    #[serde(default)]
    pub allocations: Option<BudgetAllocation>,
    /// Categories to analyze; all six when absent
    #[serde(default)]
    pub categories: Option<Vec<ExpenseCategory>>,
    /// First day of the trip, enables the pace projection
    #[serde(default)]
    pub trip_start: Option<NaiveDate>,
    /// Last day of the trip, enables the pace projection
    #[serde(default)]
    pub trip_end: Option<NaiveDate>,
}

impl BudgetRequest {
    pub fn categories(&self) -> Vec<ExpenseCategory> {
        self.categories
            .clone()
            .unwrap_or_else(|| ExpenseCategory::ALL.to_vec())
    }

    pub fn allocations(&self) -> BudgetAllocation {
        self.allocations.clone().unwrap_or_default()
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(PlannerError::Validation(format!(
                "budget must be a non-negative number, got {}",
                self.budget
            )));
        }

        if let Some((idx, expense)) = self
            .expenses
            .iter()
            .enumerate()
            .find(|(_, expense)| !expense.amount.is_finite() || expense.amount < 0.0)
        {
            return Err(PlannerError::Validation(format!(
                "expenses[{}] ({}) has invalid amount {}",
                idx, expense.title, expense.amount
            )));
        }

        if let (Some(start), Some(end)) = (self.trip_start, self.trip_end) {
            if end < start {
                return Err(PlannerError::Validation(format!(
                    "trip_end {} is before trip_start {}",
                    end, start
                )));
            }
        }

        if let Some(allocations) = &self.allocations {
            allocations.validate()?;
        }

        Ok(())
    }
}

/// Analysis, pace projection and suggestions for one budget review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReport {
    pub analysis: BudgetAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<ProjectionAlert>,
    pub suggestions: Vec<Suggestion>,
}
