use crate::types::ExpenseCategory;
use std::collections::BTreeMap;

/// Spent-percentage thresholds for the budget alert levels
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRules {
    pub exceeded: f64,
    pub critical: f64,
    pub warning: f64,
    pub caution: f64,
}

impl Default for BudgetRules {
    fn default() -> Self {
        Self {
            exceeded: 100.0,
            critical: 90.0,
            warning: 75.0,
            caution: 50.0,
        }
    }
}

/// Thresholds, limits and tip tables used by the suggestion generator.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRules {
    pub category_tips: BTreeMap<ExpenseCategory, Vec<String>>,
    pub emergency_tips: BTreeMap<ExpenseCategory, Vec<String>>,

    pub min_expenses_for_outliers: usize,
    pub outlier_base_multiplier: f64,
    pub min_allocation_multiplier: f64,
    pub max_allocation_multiplier: f64,
    pub allocation_scaling_factor: f64,
    /// Target assumed for outlier detection when a category has none
    pub outlier_default_target: f64,

    /// Percentage points over target before rebalancing is suggested
    pub rebalance_deviation: f64,
    pub rebalance_high_deviation: f64,
    pub rebalance_reduction: f64,

    pub emergency_spent_percentage: f64,

    pub allocation_deviation: f64,
    pub allocation_medium_deviation: f64,
    pub allocation_reduction: f64,

    pub reallocation_margin: f64,
    /// Dollars; transfers at or below this are not worth suggesting
    pub min_reallocation_amount: f64,

    pub max_suggestions: usize,
    pub max_emergency_items: usize,
}

fn tips(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|tip| tip.to_string()).collect()
}

impl Default for SuggestionRules {
    fn default() -> Self {
        use ExpenseCategory::*;

        let category_tips = BTreeMap::from([
            (
                Food,
                tips(&[
                    "Cook meals instead of dining out",
                    "Look for lunch specials and happy hour deals",
                    "Share large portions with others",
                    "Visit local markets for affordable snacks",
                ]),
            ),
            (
                Transport,
                tips(&[
                    "Use public transportation instead of ride-hailing",
                    "Walk or bike for short distances",
                    "Look for transportation passes",
                    "Share rides with other travelers in your group",
                ]),
            ),
            (
                Lodging,
                tips(&[
                    "Consider staying slightly outside the city",
                    "Look for accommodations with kitchen facilities",
                    "Book longer stays for better rates",
                    "Check for last-minute deals",
                ]),
            ),
            (
                Activities,
                tips(&[
                    "Look for free tours and attractions",
                    "Check for student or other group discounts",
                    "Visit during off-peak hours",
                    "Look for city tourism cards with bundled attractions",
                ]),
            ),
            (
                Shopping,
                tips(&[
                    "Set a daily shopping limit",
                    "Focus on unique local items only",
                    "Compare prices at different stores",
                    "Avoid impulse purchases",
                ]),
            ),
            (
                Other,
                tips(&[
                    "Review miscellaneous expenses for necessities",
                    "Look for free alternatives",
                    "Bundle services when possible",
                ]),
            ),
        ]);

        let emergency_tips = BTreeMap::from([
            (Food, tips(&["Cook instead of dining out", "Look for happy hour specials"])),
            (Transport, tips(&["Use public transport only", "Walk when possible"])),
            (
                Lodging,
                tips(&["Avoid room service/extras", "Look for immediate check-out savings"]),
            ),
            (Activities, tips(&["Cancel paid activities", "Find free alternatives"])),
            (
                Shopping,
                tips(&["Stop all shopping immediately", "Return recent purchases if possible"]),
            ),
            (Other, tips(&["Cut all miscellaneous expenses", "Postpone non-essentials"])),
        ]);

        Self {
            category_tips,
            emergency_tips,
            min_expenses_for_outliers: 2,
            outlier_base_multiplier: 1.5,
            min_allocation_multiplier: 0.8,
            max_allocation_multiplier: 1.5,
            allocation_scaling_factor: 20.0,
            outlier_default_target: 5.0,
            rebalance_deviation: 10.0,
            rebalance_high_deviation: 20.0,
            rebalance_reduction: 0.7,
            emergency_spent_percentage: 90.0,
            allocation_deviation: 5.0,
            allocation_medium_deviation: 15.0,
            allocation_reduction: 0.6,
            reallocation_margin: 5.0,
            min_reallocation_amount: 10.0,
            max_suggestions: 5,
            max_emergency_items: 6,
        }
    }
}

impl SuggestionRules {
    pub fn category_tips(&self, category: ExpenseCategory) -> &[String] {
        self.category_tips
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn emergency_tips(&self, category: ExpenseCategory) -> Vec<String> {
        self.emergency_tips
            .get(&category)
            .cloned()
            .unwrap_or_else(|| vec![format!("Reduce {} spending immediately", category)])
    }
}
